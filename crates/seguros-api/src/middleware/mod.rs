//! # Tower Middleware
//!
//! - `tracing_layer`: request spans via `tower_http::trace::TraceLayer`.
//! - `cors`: `tower_http::cors::CorsLayer` built from `ALLOWED_ORIGINS`.

pub mod cors;
pub mod tracing_layer;
