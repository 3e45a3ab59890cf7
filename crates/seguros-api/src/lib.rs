//! # seguros-api: Insured Person Registry Service
//!
//! Axum HTTP surface over `seguros-core`. Routes delegate to
//! [`seguros_core::InsuredService`] held in [`state::AppState`]; the backend
//! is Postgres when `DATABASE_URL` is set and the in-memory store otherwise.
//!
//! ## Module Structure
//!
//! - `config`: environment configuration.
//! - `db`: Postgres pool start-up and the `insureds` table gateway.
//! - `error`: [`error::AppError`] and the JSON error body.
//! - `extractors`: rejection-to-`AppError` helpers.
//! - `middleware`: tracing and CORS layers.
//! - `openapi`: utoipa document at `/openapi.json`.
//! - `routes`: the insured CRUD handlers.
//! - `state`: shared state and backend selection.

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::routing::get;
use axum::Router;

use crate::error::AppError;
use crate::state::AppState;

/// Build the complete application router.
///
/// Health probes sit outside the tracing layer so orchestrator polling does
/// not flood the request log.
pub fn app(state: AppState) -> Router {
    let cors = middleware::cors::layer(&state.config.allowed_origins);

    let api = Router::new()
        .merge(routes::insureds::router())
        .merge(openapi::router())
        .layer(middleware::tracing_layer::layer())
        .layer(cors)
        .with_state(state.clone());

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .with_state(state);

    Router::new().merge(health).merge(api)
}

async fn liveness() -> &'static str {
    "ok"
}

async fn readiness(State(state): State<AppState>) -> Result<&'static str, AppError> {
    if let Some(pool) = &state.db_pool {
        db::ping(pool)
            .await
            .map_err(|e| AppError::ServiceUnavailable(e.to_string()))?;
    }
    Ok("ready")
}
