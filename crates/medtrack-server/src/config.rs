//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::HeaderValue;
use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "Medtrack";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const ENV_BIND: &str = "MEDTRACK_BIND";
pub const ENV_DB_PATH: &str = "MEDTRACK_DB_PATH";
pub const ENV_CORS_ORIGINS: &str = "MEDTRACK_CORS_ORIGINS";

pub const DEFAULT_BIND: &str = "127.0.0.1:8000";
pub const DEFAULT_DB_PATH: &str = "medications.db";
pub const DEFAULT_CORS_ORIGINS: &[&str] = &["http://localhost", "http://localhost:8080"];

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "medtrack_server=info,medtrack_core=info,tower_http=info"
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid bind address '{0}'")]
    InvalidBind(String),

    #[error("Invalid CORS origin '{0}'")]
    InvalidOrigin(String),
}

/// Runtime settings for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub database_path: PathBuf,
    pub cors_origins: Vec<HeaderValue>,
}

impl ServerConfig {
    /// Load from process environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = lookup(ENV_BIND).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = bind
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidBind(bind.clone()))?;

        let database_path = lookup(ENV_DB_PATH)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        let origins: Vec<String> = match lookup(ENV_CORS_ORIGINS) {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect(),
            None => DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };
        let cors_origins = origins
            .into_iter()
            .map(|o| HeaderValue::from_str(&o).map_err(|_| ConfigError::InvalidOrigin(o)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            bind_addr,
            database_path,
            cors_origins,
        })
    }
}
