//! Signaling router: relays call directives between exactly two parties.
//!
//! DESIGN
//! ======
//! Stateless: every routing resolves its destination through the presence
//! registry at dispatch time and forwards the payload verbatim to that one
//! connection. Directives are one-way with no acknowledgment and no
//! delivery guarantee; a call to an offline user fails, it is not queued.
//!
//! ERROR HANDLING
//! ==============
//! An unresolvable `callUser` target is answered with a `callFailed` notice
//! to the sender instead of the silent drop the original protocol had. An
//! unresolvable `endCall` stays silent: the remote is already gone and
//! nobody can act on the notice. Repeated `endCall` routing is harmless;
//! the receiving session treats teardown as idempotent.

use signals::{CallTarget, ConnectionId, ServerEvent, SignalPayload};
use tracing::{info, warn};

use crate::services::presence;
use crate::state::AppState;

/// Where a routed directive ended up. Returned for logging and tests;
/// senders never see it (directives are fire-and-forget).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Forwarded to exactly this connection.
    Delivered(ConnectionId),
    /// No live destination; the directive went nowhere.
    Unreachable,
}

/// Route a call offer to `target`, forwarding `{from, signal, callerName}`
/// to the resolved destination only. The caller's display name comes from
/// its own call registration and is absent if it never registered one.
pub async fn route_call(
    state: &AppState,
    from: ConnectionId,
    target: &CallTarget,
    signal: SignalPayload,
) -> RouteOutcome {
    let (dest, caller_name) = {
        let registry = state.registry.read().await;
        (
            registry.resolve_target(target),
            registry.display_name(&from).map(str::to_owned),
        )
    };

    let event = ServerEvent::IncomingCall { from, signal, caller_name };
    match deliver(state, dest, event).await {
        RouteOutcome::Delivered(conn) => {
            info!(%from, to = %conn, "signaling: call routed");
            RouteOutcome::Delivered(conn)
        }
        RouteOutcome::Unreachable => {
            warn!(%from, ?target, "signaling: call target unreachable");
            let notice = ServerEvent::CallFailed { reason: "target unreachable".into() };
            let _ = presence::send_to(state, from, notice).await;
            RouteOutcome::Unreachable
        }
    }
}

/// Route a call answer straight to the caller's connection handle. No
/// identity resolution: the callee learned the handle from `incomingCall`.
/// The answerer's display name comes from the sender's own registration.
pub async fn route_answer(
    state: &AppState,
    sender: ConnectionId,
    to: ConnectionId,
    signal: SignalPayload,
) -> RouteOutcome {
    let answerer_name = {
        let registry = state.registry.read().await;
        registry.display_name(&sender).map(str::to_owned)
    };

    let event = ServerEvent::CallAccepted { signal, answerer_name };
    let outcome = deliver(state, Some(to), event).await;
    match outcome {
        RouteOutcome::Delivered(conn) => info!(%sender, to = %conn, "signaling: answer routed"),
        RouteOutcome::Unreachable => warn!(%sender, %to, "signaling: answer target gone"),
    }
    outcome
}

/// Route a bare termination notice, resolving `target` the same way as
/// `route_call`.
pub async fn route_end_call(
    state: &AppState,
    sender: ConnectionId,
    target: &CallTarget,
) -> RouteOutcome {
    let dest = {
        let registry = state.registry.read().await;
        registry.resolve_target(target)
    };

    let outcome = deliver(state, dest, ServerEvent::EndCall).await;
    match outcome {
        RouteOutcome::Delivered(conn) => info!(%sender, to = %conn, "signaling: end-call routed"),
        RouteOutcome::Unreachable => warn!(%sender, ?target, "signaling: end-call target gone"),
    }
    outcome
}

/// Forward an event to the resolved destination, if any.
async fn deliver(
    state: &AppState,
    dest: Option<ConnectionId>,
    event: ServerEvent,
) -> RouteOutcome {
    let Some(conn) = dest else {
        return RouteOutcome::Unreachable;
    };
    if presence::send_to(state, conn, event).await {
        RouteOutcome::Delivered(conn)
    } else {
        RouteOutcome::Unreachable
    }
}

#[cfg(test)]
#[path = "signaling_test.rs"]
mod tests;
