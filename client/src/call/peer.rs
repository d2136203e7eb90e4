//! Peer-connection and media seams.
//!
//! DESIGN
//! ======
//! The session state machine owns exactly one peer object per call and
//! tears it down explicitly; these traits are the boundary to the actual
//! WebRTC library and device capture. Local negotiation payloads are
//! produced synchronously at creation time, before any directive is sent,
//! so the peer object always exists by the time the remote's payload
//! arrives.

use signals::SignalPayload;

/// Which side of the negotiation this peer plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerRole {
    /// Creates the offer (the dialing side).
    Initiator,
    /// Consumes the offer and creates the answer (the accepting side).
    Responder,
}

/// Camera/microphone acquisition failed: the user denied permission or no
/// device exists. Recoverable by retrying the whole call attempt.
#[derive(Debug, thiserror::Error)]
#[error("media acquisition failed: {0}")]
pub struct MediaError(pub String);

/// The peer-connection library reported an unrecoverable error. Fatal to
/// the current call; a fresh dial starts over from scratch.
#[derive(Debug, thiserror::Error)]
#[error("peer negotiation failed: {0}")]
pub struct PeerError(pub String);

/// A held camera/microphone stream. Shared between a dial attempt and a
/// subsequent answer within the same process until released.
pub trait MediaStream {
    /// Stop every track and release the devices. Called exactly once per
    /// session, on teardown; must be a no-op if already stopped.
    fn stop_tracks(&mut self);
}

/// Device capture seam.
pub trait MediaAccess {
    /// Request camera/microphone access. Suspends the initiating flow until
    /// the user grants or denies; must not block delivery of other events.
    ///
    /// # Errors
    ///
    /// [`MediaError`] on denial or missing devices.
    fn acquire(&mut self) -> Result<Box<dyn MediaStream>, MediaError>;
}

/// One live peer connection, created per call and destroyed on teardown.
pub trait PeerConnection {
    /// The local negotiation payload (offer or answer, depending on role).
    ///
    /// # Errors
    ///
    /// [`PeerError`] if negotiation data could not be produced.
    fn local_signal(&mut self) -> Result<SignalPayload, PeerError>;

    /// Feed the remote party's negotiation payload into this connection.
    ///
    /// # Errors
    ///
    /// [`PeerError`] if the payload is rejected.
    fn apply_remote(&mut self, signal: &SignalPayload) -> Result<(), PeerError>;

    /// Whether remote media has arrived. Advisory only: the session marks
    /// itself active on answer exchange, not on media flow.
    fn remote_stream_arrived(&self) -> bool;

    /// Destroy the connection. Must never panic, even if the connection
    /// never finished initializing or the remote already vanished, and must
    /// tolerate being called more than once.
    fn close(&mut self);
}

/// Peer-connection factory seam.
pub trait PeerConnector {
    /// Create a peer in `role` with the local media stream attached.
    ///
    /// # Errors
    ///
    /// [`PeerError`] if the underlying library refuses the configuration.
    fn create(
        &mut self,
        role: PeerRole,
        media: &mut dyn MediaStream,
    ) -> Result<Box<dyn PeerConnection>, PeerError>;
}
