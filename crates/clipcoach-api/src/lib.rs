//! Axum HTTP API server for ClipCoach.
//!
//! This crate provides:
//! - The clip feedback endpoint and the public game catalog
//! - A shared-password access gate with expiring session tokens
//! - Rate limiting and security headers
//! - Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod security;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use security::AccessGate;
pub use state::AppState;
