//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The realtime coordinator is almost entirely the `/ws` endpoint. The two
//! plain HTTP routes exist for operators (`/healthz`) and for the
//! out-of-scope message store, which resolves a recipient's connection
//! handle to target its own delivery events.

pub mod presence;
pub mod ws;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

#[must_use]
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ws", get(ws::handle_ws))
        .route("/api/presence/{user_id}", get(presence::resolve_user))
        .route("/healthz", get(healthz))
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> axum::http::StatusCode {
    axum::http::StatusCode::OK
}
