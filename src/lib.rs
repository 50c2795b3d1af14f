//! Real-time chat admission gateway built with Rust.
//!
//! Guards the WebSocket entry point of a chat platform with two ordered
//! admission stages: token authentication (degrading to anonymous on any
//! failure) and chat-restriction enforcement with lazy expiry.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod models;
pub mod services;
pub mod session;
pub mod stores;

pub use config::Config;
pub use error::AppError;
pub use gateway::AdmissionPipeline;
pub use handlers::http::AppState;

use axum::routing::get;
use tower_http::trace::TraceLayer;

/// Build the gateway router (ws upgrade, health). Used by main and by
/// integration tests.
pub fn create_app(state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/ws", get(handlers::ws_handler))
        .route("/health", get(handlers::http::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
