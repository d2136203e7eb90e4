pub mod peer;
pub mod session;

pub use peer::{MediaAccess, MediaError, MediaStream, PeerConnection, PeerConnector, PeerError, PeerRole};
pub use session::{CallError, CallPhase, CallSession, IncomingOffer};
