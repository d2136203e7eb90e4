//! WebSocket handler: bidirectional directive/event relay.
//!
//! DESIGN
//! ======
//! On upgrade, mints a connection id and enters a `select!` loop:
//! - Incoming client text frames → decode + dispatch by directive
//! - Events from the presence/signaling services → forward to the client
//!
//! Directive handling is fire-and-forget: handlers route or mutate state
//! and return nothing to the sender (except the `callFailed` notice the
//! router itself emits). Each inbound event is handled to completion before
//! the next, so registry mutations stay serialized per connection.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade with optional `user_id` query metadata → connect + presence
//!    broadcast
//! 2. Client sends directives → dispatch to presence/signaling services
//! 3. Close or socket error → disconnect cleanup + both presence broadcasts

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::Response;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use signals::{ClientDirective, ConnectionId, ServerEvent, encode_event};

use crate::services::{presence, signaling};
use crate::state::AppState;

pub async fn handle_ws(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    ws: WebSocketUpgrade,
) -> Response {
    // Connection metadata from the out-of-scope auth collaborator. Absent
    // user_id means the connection can still register for calling and be
    // addressed by raw handle.
    let user_id = params.get("user_id").cloned();
    ws.on_upgrade(move |socket| run_ws(socket, state, user_id))
}

async fn run_ws(mut socket: WebSocket, state: AppState, user_id: Option<String>) {
    let conn_id: ConnectionId = Uuid::new_v4();

    // Per-connection channel for events from the services.
    let (client_tx, mut client_rx) = mpsc::channel::<ServerEvent>(256);

    presence::connect(&state, conn_id, user_id.clone(), client_tx).await;
    info!(%conn_id, user_id = user_id.as_deref().unwrap_or("-"), "ws: client connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(msg) = msg else { break };
                let Ok(msg) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        dispatch_directive(&state, conn_id, &text).await;
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Some(event) = client_rx.recv() => {
                if send_event(&mut socket, &event).await.is_err() {
                    break;
                }
            }
        }
    }

    presence::disconnect(&state, conn_id).await;
    info!(%conn_id, "ws: client disconnected");
}

/// Decode one inbound text frame and dispatch it. Invalid frames are logged
/// and dropped; there is no acknowledgment channel to report them on.
async fn dispatch_directive(state: &AppState, conn_id: ConnectionId, text: &str) {
    let directive = match signals::decode_directive(text) {
        Ok(d) => d,
        Err(e) => {
            warn!(%conn_id, error = %e, "ws: invalid inbound directive");
            return;
        }
    };

    match directive {
        ClientDirective::Register { display_name } => {
            presence::register_for_calling(state, conn_id, display_name).await;
        }
        ClientDirective::CallUser { to, signal, .. } => {
            // Stamp the sender's own connection id as the answer-back
            // address, regardless of what the payload claimed.
            signaling::route_call(state, conn_id, &to, signal).await;
        }
        ClientDirective::AnswerCall { to, signal } => {
            signaling::route_answer(state, conn_id, to, signal).await;
        }
        ClientDirective::EndCall { to } => {
            signaling::route_end_call(state, conn_id, &to).await;
        }
    }
}

async fn send_event(socket: &mut WebSocket, event: &ServerEvent) -> Result<(), ()> {
    let json = encode_event(event);
    socket.send(Message::Text(json.into())).await.map_err(|_| ())
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
