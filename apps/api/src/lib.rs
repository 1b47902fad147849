//! # MedLocus API
//!
//! HTTP/JSON surface of the pharmacy backend.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Dashboard ──► TraceLayer ──► CorsLayer ──► Router (/api/...)          │
//! │                                                │                        │
//! │                                                ▼                        │
//! │                          extract (ApiJson / ApiPath / ApiQuery)        │
//! │                                                │                        │
//! │                                                ▼                        │
//! │                          medlocus_core::validation                     │
//! │                                                │                        │
//! │                                                ▼                        │
//! │                          medlocus_db repositories ──► SQLite           │
//! │                                                │                        │
//! │                                                ▼                        │
//! │                          Json<T>  or  ApiError {code, message}         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

#[cfg(test)]
mod test_support;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use state::AppState;

/// Builds the application router with its middleware.
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::api_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
