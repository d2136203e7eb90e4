//! Shared wire model for the realtime signaling transport.
//!
//! This crate owns the wire representation used by both `server` and
//! `client`: the directive and event vocabulary, the opaque signal payload,
//! and the JSON text codec. Payload field names are camelCase on the wire;
//! signaling payloads pass through byte-for-byte without interpretation.
//!
//! DESIGN
//! ======
//! - `ClientDirective` and `ServerEvent` are adjacently tagged
//!   (`{"event": ..., "data": ...}`) so the transport routes on the event
//!   name without inspecting payloads.
//! - `CallTarget` is an explicit tagged union: a directive addresses either
//!   a stable user identity or a raw connection handle, never an ambiguous
//!   dual-purpose string.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Stable application-level user id, supplied at connect time by the auth
/// collaborator. Independent of any live connection.
pub type UserId = String;

/// Opaque identifier for one live transport connection. Minted by the server
/// on connect, invalidated on disconnect, never reused.
pub type ConnectionId = Uuid;

// =============================================================================
// PAYLOAD TYPES
// =============================================================================

/// Opaque peer-connection negotiation data (offer/answer blobs).
///
/// Produced and consumed by the peer-connection library on each end; the
/// server and this crate forward it verbatim and never look inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignalPayload(pub serde_json::Value);

impl SignalPayload {
    /// Wrap an arbitrary JSON value as an opaque payload.
    #[must_use]
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// Destination of a routed directive.
///
/// `User` is resolved through the presence registry; `Connection` bypasses
/// resolution and addresses a live transport connection directly (used when
/// the handle was learned from an `incomingCall` event).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CallTarget {
    User(UserId),
    Connection(ConnectionId),
}

/// One entry in the active-call-registration list: a connection that has
/// opted into calling under a display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveUser {
    pub display_name: String,
    pub connection_id: ConnectionId,
}

// =============================================================================
// DIRECTIVES (client → server)
// =============================================================================

/// Named one-way signaling message sent by a client. Fire-and-forget: no
/// acknowledgment and no delivery guarantee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientDirective {
    /// Opt into call routing under a display name.
    Register { display_name: String },
    /// Route a call offer to `to`, carrying the caller's own connection
    /// handle so the callee can answer directly.
    CallUser {
        to: CallTarget,
        from: ConnectionId,
        signal: SignalPayload,
    },
    /// Route a call answer straight back to the caller's connection.
    AnswerCall {
        to: ConnectionId,
        signal: SignalPayload,
    },
    /// Route a termination notice. Idempotent on the receiving end.
    EndCall { to: CallTarget },
}

// =============================================================================
// EVENTS (server → client)
// =============================================================================

/// Named event delivered by the server, either broadcast to all connections
/// or targeted at exactly one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    /// Targeted welcome: the handle the server minted for this connection.
    /// Clients echo it as the answer-back address in `callUser`.
    Connected { connection_id: ConnectionId },
    /// Broadcast: the full set of currently-connected user identities.
    GetOnlineUsers(Vec<UserId>),
    /// Broadcast: the full list of active call registrations.
    ActiveUsers(Vec<ActiveUser>),
    /// Targeted: an incoming call offer.
    IncomingCall {
        from: ConnectionId,
        signal: SignalPayload,
        #[serde(skip_serializing_if = "Option::is_none")]
        caller_name: Option<String>,
    },
    /// Targeted: the remote party accepted and answered.
    CallAccepted {
        signal: SignalPayload,
        #[serde(skip_serializing_if = "Option::is_none")]
        answerer_name: Option<String>,
    },
    /// Targeted: bare termination notice.
    EndCall,
    /// Targeted: a `callUser` directive could not be delivered.
    CallFailed { reason: String },
}

// =============================================================================
// CODEC
// =============================================================================

/// Error returned by the decode functions.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The text frame is not valid JSON or names an unknown event.
    #[error("failed to decode frame: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Encode a client directive as a JSON text frame.
///
/// # Panics
///
/// Never panics: every directive variant serializes to valid JSON.
#[must_use]
pub fn encode_directive(directive: &ClientDirective) -> String {
    serde_json::to_string(directive).unwrap_or_default()
}

/// Decode a JSON text frame into a client directive.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] for malformed JSON or unknown events.
pub fn decode_directive(text: &str) -> Result<ClientDirective, CodecError> {
    Ok(serde_json::from_str(text)?)
}

/// Encode a server event as a JSON text frame.
///
/// # Panics
///
/// Never panics: every event variant serializes to valid JSON.
#[must_use]
pub fn encode_event(event: &ServerEvent) -> String {
    serde_json::to_string(event).unwrap_or_default()
}

/// Decode a JSON text frame into a server event.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] for malformed JSON or unknown events.
pub fn decode_event(text: &str) -> Result<ServerEvent, CodecError> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
