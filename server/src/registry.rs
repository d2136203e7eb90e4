//! Presence registry: who is online, and under what name they take calls.
//!
//! DESIGN
//! ======
//! One encapsulated object owns two key-unique maps:
//! - `presence`: user identity → live connection handle (last-connect-wins)
//! - `calls`: connection handle → display name (re-registration replaces)
//!
//! The registry is pure in-memory state with lifetime equal to the server
//! process; it is rebuilt from zero on restart when clients reconnect.
//! It knows nothing about sockets; orchestration and broadcasts live in
//! `services::presence`.

use std::collections::HashMap;

use signals::{ActiveUser, CallTarget, ConnectionId, UserId};

/// Registry of presence entries and call registrations.
#[derive(Debug, Default)]
pub struct PresenceRegistry {
    presence: HashMap<UserId, ConnectionId>,
    calls: HashMap<ConnectionId, String>,
}

impl PresenceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the presence entry for `user`. A later connect
    /// for the same identity silently replaces the earlier mapping.
    pub fn register(&mut self, user: UserId, conn: ConnectionId) {
        self.presence.insert(user, conn);
    }

    /// Insert or overwrite the call registration for `conn`.
    pub fn register_for_calling(&mut self, conn: ConnectionId, display_name: String) {
        self.calls.insert(conn, display_name);
    }

    /// Resolve a user identity to its current connection handle.
    #[must_use]
    pub fn resolve(&self, user: &str) -> Option<ConnectionId> {
        self.presence.get(user).copied()
    }

    /// Resolve a routing target to a connection handle.
    ///
    /// `User` targets go through the presence map first; an unknown identity
    /// that parses as a connection UUID is accepted as a literal handle (the
    /// caller may have learned a raw handle from an `incomingCall` event and
    /// echoed it back in the user position). `Connection` targets pass
    /// through untouched. Liveness is the sender's concern, not ours.
    #[must_use]
    pub fn resolve_target(&self, target: &CallTarget) -> Option<ConnectionId> {
        match target {
            CallTarget::User(user) => self.resolve(user).or_else(|| user.parse().ok()),
            CallTarget::Connection(conn) => Some(*conn),
        }
    }

    /// Display name under which `conn` registered for calling, if any.
    #[must_use]
    pub fn display_name(&self, conn: &ConnectionId) -> Option<&str> {
        self.calls.get(conn).map(String::as_str)
    }

    /// Remove every trace of a disconnected connection: presence entries
    /// pointing at it (O(n) scan, fine at this scale) and its call
    /// registration. Returns true if anything was removed.
    pub fn unregister(&mut self, conn: &ConnectionId) -> bool {
        let before = self.presence.len();
        self.presence.retain(|_, c| c != conn);
        let removed_presence = self.presence.len() != before;
        let removed_call = self.calls.remove(conn).is_some();
        removed_presence || removed_call
    }

    /// Snapshot of all online user identities, sorted so repeated broadcasts
    /// of the same membership are identical on the wire.
    #[must_use]
    pub fn online_users(&self) -> Vec<UserId> {
        let mut users: Vec<UserId> = self.presence.keys().cloned().collect();
        users.sort();
        users
    }

    /// Snapshot of all active call registrations, sorted by display name
    /// then connection for deterministic broadcasts.
    #[must_use]
    pub fn active_users(&self) -> Vec<ActiveUser> {
        let mut users: Vec<ActiveUser> = self
            .calls
            .iter()
            .map(|(conn, name)| ActiveUser { display_name: name.clone(), connection_id: *conn })
            .collect();
        users.sort_by(|a, b| {
            (&a.display_name, a.connection_id).cmp(&(&b.display_name, b.connection_id))
        });
        users
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
