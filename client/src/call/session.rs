//! Call session state machine.
//!
//! DESIGN
//! ======
//! One session per client, one call at a time. The phase-carrying state
//! enum owns the peer object and the local media stream, so a transition
//! out of a phase is the only way to leak-proof teardown: close the peer,
//! stop the tracks once, notify the remote party unless the teardown was
//! caused by their own notice.
//!
//! Idle ─dial→ Dialing ─answer→ Active
//! Idle ─incoming→ Ringing ─accept→ Active
//! any ─hang-up / remote end / peer error→ Idle
//!
//! "Ended" is transient: every teardown lands straight back in Idle, the
//! quiescent resting state. A failed attempt is redialed from scratch;
//! nothing is resumable.

use signals::{CallTarget, ClientDirective, ConnectionId, SignalPayload, UserId};
use tracing::{debug, warn};

use crate::call::peer::{
    MediaAccess, MediaError, MediaStream, PeerConnection, PeerConnector, PeerError, PeerRole,
};
use crate::net::DirectiveSink;

/// Externally visible lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPhase {
    Idle,
    Dialing,
    Ringing,
    Active,
}

/// A stored incoming call: everything learned from the `incomingCall` event.
#[derive(Debug, Clone)]
pub struct IncomingOffer {
    pub from: ConnectionId,
    pub signal: SignalPayload,
    pub caller_name: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CallError {
    #[error(transparent)]
    Media(#[from] MediaError),
    #[error(transparent)]
    Peer(#[from] PeerError),
    #[error("no incoming call to accept")]
    NotRinging,
    #[error("a call is already in progress")]
    Busy,
}

/// Internal state. Peer and media live inside the variants so they cannot
/// outlive the phase that owns them.
enum State {
    Idle,
    Dialing {
        remote: CallTarget,
        peer: Box<dyn PeerConnection>,
        media: Box<dyn MediaStream>,
    },
    Ringing {
        offer: IncomingOffer,
    },
    Active {
        remote: CallTarget,
        remote_name: Option<String>,
        peer: Box<dyn PeerConnection>,
        media: Box<dyn MediaStream>,
    },
}

pub struct CallSession {
    state: State,
}

impl CallSession {
    #[must_use]
    pub fn new() -> Self {
        Self { state: State::Idle }
    }

    #[must_use]
    pub fn phase(&self) -> CallPhase {
        match &self.state {
            State::Idle => CallPhase::Idle,
            State::Dialing { .. } => CallPhase::Dialing,
            State::Ringing { .. } => CallPhase::Ringing,
            State::Active { .. } => CallPhase::Active,
        }
    }

    /// Display name of the other party, once known (Ringing and Active).
    #[must_use]
    pub fn remote_name(&self) -> Option<&str> {
        match &self.state {
            State::Ringing { offer } => offer.caller_name.as_deref(),
            State::Active { remote_name, .. } => remote_name.as_deref(),
            _ => None,
        }
    }

    /// Whether remote media has arrived on the active peer. Advisory; the
    /// session is Active from answer exchange regardless.
    #[must_use]
    pub fn remote_media_arrived(&self) -> bool {
        match &self.state {
            State::Active { peer, .. } => peer.remote_stream_arrived(),
            _ => false,
        }
    }

    /// Start an outgoing call to a user identity.
    ///
    /// Acquires local media, creates an initiator peer, takes its local
    /// offer payload, and routes a `callUser` directive carrying it. Every
    /// failure unwinds fully back to Idle.
    ///
    /// # Errors
    ///
    /// [`CallError::Busy`] if a call is already in progress, otherwise the
    /// media or peer failure that aborted the attempt.
    pub fn dial(
        &mut self,
        connector: &mut dyn PeerConnector,
        media_access: &mut dyn MediaAccess,
        sink: &dyn DirectiveSink,
        self_conn: ConnectionId,
        callee: UserId,
    ) -> Result<(), CallError> {
        if !matches!(self.state, State::Idle) {
            return Err(CallError::Busy);
        }

        let mut media = media_access.acquire()?;

        let mut peer = match connector.create(PeerRole::Initiator, media.as_mut()) {
            Ok(peer) => peer,
            Err(e) => {
                media.stop_tracks();
                return Err(e.into());
            }
        };

        let signal = match peer.local_signal() {
            Ok(signal) => signal,
            Err(e) => {
                peer.close();
                media.stop_tracks();
                return Err(e.into());
            }
        };

        let remote = CallTarget::User(callee);
        sink.send(ClientDirective::CallUser { to: remote.clone(), from: self_conn, signal });
        self.state = State::Dialing { remote, peer, media };
        Ok(())
    }

    /// Handle an incoming call offer.
    ///
    /// Idle transitions to Ringing and waits for an explicit accept; no
    /// media is acquired and no peer is created yet. Any other phase means
    /// we are engaged: the new caller is rejected with an immediate
    /// `endCall` (a busy signal) and the current session is untouched.
    pub fn on_incoming(&mut self, sink: &dyn DirectiveSink, offer: IncomingOffer) {
        if matches!(self.state, State::Idle) {
            self.state = State::Ringing { offer };
        } else {
            debug!(from = %offer.from, "busy: rejecting second incoming call");
            sink.send(ClientDirective::EndCall { to: CallTarget::Connection(offer.from) });
        }
    }

    /// Accept the ringing call.
    ///
    /// Acquires media, creates a responder peer seeded with the stored
    /// offer, and routes the answer straight back to the caller's
    /// connection. The session is Active once the answer is sent, an
    /// optimistic policy; media flow is not awaited.
    ///
    /// # Errors
    ///
    /// [`CallError::NotRinging`] if there is nothing to accept, otherwise
    /// the media or peer failure that aborted the attempt (the session
    /// resets to Idle; the caller must redial).
    pub fn accept(
        &mut self,
        connector: &mut dyn PeerConnector,
        media_access: &mut dyn MediaAccess,
        sink: &dyn DirectiveSink,
    ) -> Result<(), CallError> {
        // Check the phase before swapping state out: a misplaced accept must
        // not disturb a call in any other phase.
        if !matches!(self.state, State::Ringing { .. }) {
            return Err(CallError::NotRinging);
        }
        let State::Ringing { offer } = std::mem::replace(&mut self.state, State::Idle) else {
            return Err(CallError::NotRinging);
        };

        let mut media = media_access.acquire()?;

        let mut peer = match connector.create(PeerRole::Responder, media.as_mut()) {
            Ok(peer) => peer,
            Err(e) => {
                media.stop_tracks();
                return Err(e.into());
            }
        };

        let signal = match peer
            .apply_remote(&offer.signal)
            .and_then(|()| peer.local_signal())
        {
            Ok(signal) => signal,
            Err(e) => {
                peer.close();
                media.stop_tracks();
                return Err(e.into());
            }
        };

        sink.send(ClientDirective::AnswerCall { to: offer.from, signal });
        self.state = State::Active {
            remote: CallTarget::Connection(offer.from),
            remote_name: offer.caller_name,
            peer,
            media,
        };
        Ok(())
    }

    /// Handle the remote party's answer while Dialing. Completes negotiation
    /// on the existing peer and goes Active. Stale answers in any other
    /// phase are ignored.
    ///
    /// # Errors
    ///
    /// The peer failure if the answer payload is rejected; the session is
    /// fully torn down and the remote party notified.
    pub fn on_answer(
        &mut self,
        sink: &dyn DirectiveSink,
        signal: &SignalPayload,
        answerer_name: Option<String>,
    ) -> Result<(), CallError> {
        // A stale answer (already active, already torn down) must leave the
        // current state untouched.
        if !matches!(self.state, State::Dialing { .. }) {
            debug!("ignoring answer outside of Dialing");
            return Ok(());
        }
        let State::Dialing { remote, mut peer, mut media } =
            std::mem::replace(&mut self.state, State::Idle)
        else {
            return Ok(());
        };

        if let Err(e) = peer.apply_remote(signal) {
            warn!(error = %e, "answer payload rejected; tearing down");
            peer.close();
            media.stop_tracks();
            sink.send(ClientDirective::EndCall { to: remote });
            return Err(e.into());
        }

        self.state = State::Active { remote, remote_name: answerer_name, peer, media };
        Ok(())
    }

    /// Local hang-up, valid in any phase. Tears down and notifies the
    /// remote party. A no-op when Idle.
    pub fn hang_up(&mut self, sink: &dyn DirectiveSink) {
        if let Some(remote) = self.teardown() {
            sink.send(ClientDirective::EndCall { to: remote });
        }
    }

    /// The remote party ended the call (or rejected it). Tears down without
    /// echoing a notice back; receiving a duplicate later is harmless since
    /// teardown of an Idle session is a no-op.
    pub fn on_remote_end(&mut self) {
        let _ = self.teardown();
    }

    /// The peer connection reported an unrecoverable error. Fatal to this
    /// call: full teardown, and the remote party is notified since it may
    /// not have observed the failure.
    pub fn on_peer_error(&mut self, sink: &dyn DirectiveSink) {
        if let Some(remote) = self.teardown() {
            sink.send(ClientDirective::EndCall { to: remote });
        }
    }

    /// The `callUser` routing bounced (target unreachable). Only meaningful
    /// while Dialing: unwind to Idle without notifying anyone; there is
    /// nobody on the other end.
    pub fn on_call_failed(&mut self, reason: &str) {
        if matches!(self.state, State::Dialing { .. }) {
            warn!(reason, "call failed before ringing");
            let _ = self.teardown();
        }
    }

    /// Destroy the peer, release media exactly once, reset to Idle. Returns
    /// the remote target when the remote party may still need notifying.
    /// Safe at any phase, including a peer that never finished connecting.
    fn teardown(&mut self) -> Option<CallTarget> {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle => None,
            State::Dialing { remote, mut peer, mut media }
            | State::Active { remote, mut peer, mut media, .. } => {
                peer.close();
                media.stop_tracks();
                Some(remote)
            }
            State::Ringing { offer } => {
                // Nothing allocated yet; rejecting still notifies the caller.
                Some(CallTarget::Connection(offer.from))
            }
        }
    }
}

impl Default for CallSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
