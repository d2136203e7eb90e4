//! Presence service: connection lifecycle and registry broadcasts.
//!
//! DESIGN
//! ======
//! The registry itself is a passive object (`crate::registry`); this module
//! owns the orchestration around it: wiring a connection's event sender into
//! the live-client map, mutating the registry, and broadcasting the full
//! post-mutation snapshots to every connection.
//!
//! Broadcasts are fire-and-forget `try_send`s: a slow or dead recipient is
//! skipped and never blocks the others.

use signals::{ConnectionId, ServerEvent, UserId};
use tokio::sync::mpsc;
use tracing::info;

use crate::state::AppState;

/// Wire a new connection into the live-client map and send it its welcome
/// event carrying the minted handle. If the transport supplied a user
/// identity at connect time, register it and broadcast the updated
/// online-user set.
pub async fn connect(
    state: &AppState,
    conn: ConnectionId,
    user: Option<UserId>,
    tx: mpsc::Sender<ServerEvent>,
) {
    let _ = tx.try_send(ServerEvent::Connected { connection_id: conn });
    state.clients.write().await.insert(conn, tx);

    if let Some(user) = user {
        let online = {
            let mut registry = state.registry.write().await;
            registry.register(user.clone(), conn);
            registry.online_users()
        };
        info!(%conn, %user, online = online.len(), "presence: identity registered");
        broadcast(state, &ServerEvent::GetOnlineUsers(online)).await;
    }
}

/// Opt a connection into call routing under a display name, broadcasting the
/// updated registration list. A repeat registration replaces the old name.
pub async fn register_for_calling(state: &AppState, conn: ConnectionId, display_name: String) {
    let active = {
        let mut registry = state.registry.write().await;
        registry.register_for_calling(conn, display_name.clone());
        registry.active_users()
    };
    info!(%conn, display_name, "presence: registered for calling");
    broadcast(state, &ServerEvent::ActiveUsers(active)).await;
}

/// Tear down a disconnected connection: drop its sender, remove its presence
/// entry and call registration, and broadcast both snapshots exactly once,
/// reflecting the post-removal state.
///
/// Deliberately does NOT synthesize call termination for a peer mid-call
/// with the vanished connection; the survivor notices via an explicit
/// `endCall` or a peer-connection error.
pub async fn disconnect(state: &AppState, conn: ConnectionId) {
    state.clients.write().await.remove(&conn);

    let (online, active) = {
        let mut registry = state.registry.write().await;
        registry.unregister(&conn);
        (registry.online_users(), registry.active_users())
    };
    info!(%conn, online = online.len(), "presence: connection unregistered");

    broadcast(state, &ServerEvent::GetOnlineUsers(online)).await;
    broadcast(state, &ServerEvent::ActiveUsers(active)).await;
}

/// Broadcast an event to every live connection. Best-effort: if a client's
/// channel is full, skip it.
pub async fn broadcast(state: &AppState, event: &ServerEvent) {
    let clients = state.clients.read().await;
    for tx in clients.values() {
        let _ = tx.try_send(event.clone());
    }
}

/// Send an event to exactly one connection. Returns false if the connection
/// is gone or its channel is full.
pub async fn send_to(state: &AppState, conn: ConnectionId, event: ServerEvent) -> bool {
    let clients = state.clients.read().await;
    let Some(tx) = clients.get(&conn) else {
        return false;
    };
    tx.try_send(event).is_ok()
}

#[cfg(test)]
#[path = "presence_test.rs"]
mod tests;
