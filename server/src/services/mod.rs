pub mod presence;
pub mod signaling;
