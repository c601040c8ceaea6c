//! Typed errors and HTTP mapping.

use crate::fault::Fault;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing reference: {kind} '{id}'")]
    MissingReference { kind: &'static str, id: String },
    #[error("invalid primary key: schema {schema} property {property}")]
    InvalidPrimaryKey { schema: String, property: String },
    #[error("unknown type '{type_name}' for {schema}.{property}")]
    UnknownType {
        schema: String,
        property: String,
        type_name: String,
    },
    #[error("invalid identifier: '{0}'")]
    InvalidIdentifier(String),
    #[error("duplicate schema name: {0}")]
    DuplicateName(String),
    #[error("duplicate path segment: {0}")]
    DuplicatePathSegment(String),
    #[error("config load: {0}")]
    Load(String),
    #[error("validation: {0}")]
    Validation(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("constraint: {0}")]
    Constraint(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    /// A failure the route does not answer on purpose; surfaces as a bare 500.
    #[error("{0}")]
    Unhandled(String),
}

impl AppError {
    pub fn unhandled(self) -> AppError {
        match self {
            AppError::Unhandled(_) => self,
            other => AppError::Unhandled(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => return StatusCode::NOT_FOUND.into_response(),
            AppError::Validation(_) | AppError::Constraint(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Db(_) | AppError::Unhandled(_) => {
                tracing::error!(error = %self, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.to_string()).into_response()
    }
}

/// Why the server loop stopped with an error.
#[derive(Error, Debug)]
pub enum ServeError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("escalated fault: {0}")]
    Fault(Fault),
}
