//! Medtrack HTTP server.
//!
//! # Modules
//!
//! - [`api`]: axum router, handlers and error mapping
//! - [`config`]: environment-driven settings

pub mod api;
pub mod config;

pub use api::{api_router, serve};
pub use config::ServerConfig;
