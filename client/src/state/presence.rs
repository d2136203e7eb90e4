//! Presence subscriber state.
//!
//! Purely reactive view of the registry broadcasts: the latest known
//! online-identity set and active-call-registration list. No business
//! logic; the call session consumes these through whatever UI sits on top.

use signals::{ActiveUser, ClientDirective, UserId};

use crate::net::DirectiveSink;

/// Latest snapshots received from the server.
#[derive(Debug, Clone, Default)]
pub struct PresenceState {
    pub online_users: Vec<UserId>,
    pub active_users: Vec<ActiveUser>,
}

impl PresenceState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the online-identity snapshot.
    pub fn set_online_users(&mut self, users: Vec<UserId>) {
        self.online_users = users;
    }

    /// Replace the call-registration snapshot.
    pub fn set_active_users(&mut self, users: Vec<ActiveUser>) {
        self.active_users = users;
    }

    /// Whether a user identity is currently online.
    #[must_use]
    pub fn is_online(&self, user: &str) -> bool {
        self.online_users.iter().any(|u| u == user)
    }

    /// Dispatch the calling registration once the transport connects.
    /// Re-sent on every reconnect since the server rebuilds from zero.
    pub fn register_on_connect(sink: &dyn DirectiveSink, display_name: &str) -> bool {
        sink.send(ClientDirective::Register { display_name: display_name.to_owned() })
    }
}

#[cfg(test)]
#[path = "presence_test.rs"]
mod tests;
