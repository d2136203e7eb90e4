//! Client-side state root and server-event fan-out.
//!
//! `ClientState` bundles everything one connected client tracks: its own
//! connection handle (learned from the welcome event), the presence
//! subscriber, and the call session. `handle_event` is the single entry
//! point the transport task feeds decoded server events into.

pub mod presence;

use signals::{ConnectionId, ServerEvent};
use tracing::warn;

use crate::call::{CallSession, IncomingOffer};
use crate::net::DirectiveSink;
use presence::PresenceState;

pub struct ClientState {
    /// Handle the server minted for this connection. `None` until the
    /// welcome event arrives; required before dialing.
    pub connection_id: Option<ConnectionId>,
    pub presence: PresenceState,
    pub call: CallSession,
}

impl ClientState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            connection_id: None,
            presence: PresenceState::new(),
            call: CallSession::new(),
        }
    }

    /// Apply one decoded server event: presence broadcasts update the
    /// subscriber, call events feed the session state machine.
    pub fn handle_event(&mut self, sink: &dyn DirectiveSink, event: ServerEvent) {
        match event {
            ServerEvent::Connected { connection_id } => {
                self.connection_id = Some(connection_id);
            }
            ServerEvent::GetOnlineUsers(users) => self.presence.set_online_users(users),
            ServerEvent::ActiveUsers(users) => self.presence.set_active_users(users),
            ServerEvent::IncomingCall { from, signal, caller_name } => {
                self.call.on_incoming(sink, IncomingOffer { from, signal, caller_name });
            }
            ServerEvent::CallAccepted { signal, answerer_name } => {
                if let Err(e) = self.call.on_answer(sink, &signal, answerer_name) {
                    warn!(error = %e, "call collapsed while applying answer");
                }
            }
            ServerEvent::EndCall => self.call.on_remote_end(),
            ServerEvent::CallFailed { reason } => self.call.on_call_failed(&reason),
        }
    }
}

impl Default for ClientState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
