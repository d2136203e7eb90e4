//! Realtime presence and call-signaling coordinator.
//!
//! Tracks which users are online, relays WebRTC call-setup payloads between
//! exactly two parties, and keeps both ends consistent across disconnects
//! and duplicate events. Exposed as a library so integration tests can
//! assemble the router against an ephemeral listener.

pub mod registry;
pub mod routes;
pub mod services;
pub mod state;
