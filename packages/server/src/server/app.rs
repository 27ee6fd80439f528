//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::routes::{health_handler, lark_webhook_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
    /// Token Lark puts in every callback; anything else is rejected
    pub verification_token: Arc<str>,
}

impl AppState {
    pub fn new(deps: ServerDeps, verification_token: impl Into<Arc<str>>) -> Self {
        Self {
            deps: Arc::new(deps),
            verification_token: verification_token.into(),
        }
    }
}

/// Build the Axum application router
pub fn build_app(state: AppState) -> Router {
    Router::new()
        // Lark pushes events and card callbacks to the same handler; the
        // card URL is kept separate so both can be configured independently
        .route("/webhooks/lark", post(lark_webhook_handler))
        .route("/webhooks/lark/card", post(lark_webhook_handler))
        .route("/health", get(health_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}
