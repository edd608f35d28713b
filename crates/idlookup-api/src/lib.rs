//! # idlookup-api: Identity Lookup HTTP Service
//!
//! Four read-only lookups over the eligibility and medical MySQL
//! databases, guarded by a shared API key.
//!
//! ## API Surface
//!
//! | Path | Module | Auth |
//! |------|--------|------|
//! | `/api/user/*` | [`routes::user`] | `x-api-key` |
//! | `/openapi.json` | [`openapi`] | `x-api-key` |
//! | `/health/liveness`, `/health/readiness` | this module | none |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! SetRequestId → PropagateRequestId → TraceLayer → ApiKeyGate → Handler
//! ```

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod db;
pub mod error;
pub mod lookups;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::get;
use axum::{Extension, Router};

use crate::state::AppContext;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) are mounted outside the API key gate so
/// they remain accessible without credentials.
pub fn app(ctx: AppContext) -> Router {
    // Gated API routes.
    let api = Router::new()
        .merge(routes::user::router())
        .merge(openapi::router())
        .layer(from_fn(auth::api_key_middleware))
        .layer(Extension(ctx.gate.clone()))
        .with_state(ctx.clone());

    // Unauthenticated health probes.
    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .with_state(ctx);

    Router::new()
        .merge(health)
        .merge(api)
        .layer(middleware::tracing_layer::layer())
        .layer(middleware::tracing_layer::propagate_request_id())
        .layer(middleware::tracing_layer::set_request_id())
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 200 when every database answers a ping, else 503.
async fn readiness(State(ctx): State<AppContext>) -> (StatusCode, &'static str) {
    match ctx.check_ready().await {
        Ok(()) => (StatusCode::OK, "ready"),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "not ready")
        }
    }
}
