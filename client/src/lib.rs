//! Headless client library for the presence and call-signaling coordinator.
//!
//! Owns the client-resident halves of the system: the presence subscriber
//! (latest online/active snapshots) and the call session state machine
//! (dial, ring, accept, teardown). Transport, peer-connection, and media
//! acquisition are trait seams: a UI shell plugs in a real WebSocket, a
//! real WebRTC peer, and real device capture, while tests plug in mocks.

pub mod call;
pub mod net;
pub mod state;
