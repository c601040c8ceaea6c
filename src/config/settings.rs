//! Process settings from environment variables (`.env` is loaded by the binary).

use crate::error::ConfigError;
use crate::fault::CreateFailurePolicy;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3030;
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Clone, Debug)]
pub struct Settings {
    pub schema_path: PathBuf,
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub on_create_failure: CreateFailurePolicy,
    pub max_body_bytes: usize,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(p) => p
                .parse()
                .map_err(|_| ConfigError::Validation(format!("PORT: invalid port '{}'", p)))?,
            None => DEFAULT_PORT,
        };
        let on_create_failure = match lookup("ON_CREATE_FAILURE") {
            Some(p) => p.parse()?,
            None => CreateFailurePolicy::default(),
        };
        let max_body_bytes = match lookup("MAX_BODY_BYTES") {
            Some(n) => n
                .parse()
                .map_err(|_| ConfigError::Validation(format!("MAX_BODY_BYTES: invalid size '{}'", n)))?,
            None => DEFAULT_MAX_BODY_BYTES,
        };
        Ok(Settings {
            schema_path: lookup("SCHEMA_PATH")
                .unwrap_or_else(|| "schemas.json".into())
                .into(),
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://schemarest.db?mode=rwc".into()),
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            on_create_failure,
            max_body_bytes,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
