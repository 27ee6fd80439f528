// HTTP server setup (Axum + Lark webhooks)
pub mod app;
pub mod routes;

pub use app::*;
