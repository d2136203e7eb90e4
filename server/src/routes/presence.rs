//! Presence resolver endpoint for sibling services.
//!
//! The message store (out of scope here) needs a user's live connection
//! handle to target delivery events at one recipient. This is the REST
//! face of `PresenceRegistry::resolve`.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Serialize;
use signals::ConnectionId;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPresence {
    pub user_id: String,
    pub connection_id: ConnectionId,
}

/// Resolve a user identity to its current connection handle.
/// 404 when the user has no live connection.
pub async fn resolve_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ResolvedPresence>, StatusCode> {
    let registry = state.registry.read().await;
    registry
        .resolve(&user_id)
        .map(|connection_id| Json(ResolvedPresence { user_id, connection_id }))
        .ok_or(StatusCode::NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_helpers;
    use uuid::Uuid;

    #[tokio::test]
    async fn resolves_live_user_and_404s_unknown() {
        let state = test_helpers::test_app_state();
        let conn = Uuid::new_v4();
        state.registry.write().await.register("u1".into(), conn);

        let ok = resolve_user(State(state.clone()), Path("u1".into())).await;
        let resolved = ok.expect("resolved").0;
        assert_eq!(resolved.connection_id, conn);
        assert_eq!(resolved.user_id, "u1");

        let missing = resolve_user(State(state), Path("ghost".into())).await;
        assert_eq!(missing.err(), Some(StatusCode::NOT_FOUND));
    }
}
