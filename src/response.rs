//! Response helpers. Records are returned as bare JSON, not wrapped in an envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

pub fn ok_json<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// Status with an empty body.
pub fn empty(status: StatusCode) -> Response {
    status.into_response()
}

/// Status with a plain-text body.
pub fn text(status: StatusCode, message: impl Into<String>) -> Response {
    (status, message.into()).into_response()
}
