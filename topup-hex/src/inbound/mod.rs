//! HTTP Inbound Adapter
//!
//! Axum-based HTTP server that drives the application layer.

mod auth;
mod handlers;
mod server;

pub use auth::{CallerId, USER_ID_HEADER};
pub use handlers::ApiError;
pub use server::HttpServer;
