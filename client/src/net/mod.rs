//! Outbound directive plumbing.
//!
//! The client never talks to the socket directly; everything outbound goes
//! through a [`DirectiveSink`]. The production sink is the send half of the
//! transport task's channel; tests substitute a capturing sink.

use futures::channel::mpsc::UnboundedSender;
use signals::ClientDirective;

/// Send half of the signaling transport.
pub trait DirectiveSink {
    /// Queue a directive for the server. Returns `false` if the transport
    /// is gone; directives are fire-and-forget either way.
    fn send(&self, directive: ClientDirective) -> bool;
}

/// The transport task's channel sender is the production sink.
impl DirectiveSink for UnboundedSender<ClientDirective> {
    fn send(&self, directive: ClientDirective) -> bool {
        self.unbounded_send(directive).is_ok()
    }
}
