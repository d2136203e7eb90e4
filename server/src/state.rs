//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the map of live connections (connection id → per-connection event
//! sender) and the presence registry. Both sit behind `RwLock`s so each
//! transport event mutates them to completion before the next reader sees
//! the change; there is no other synchronization.

use std::collections::HashMap;
use std::sync::Arc;

use signals::{ConnectionId, ServerEvent};
use tokio::sync::{RwLock, mpsc};

use crate::registry::PresenceRegistry;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    /// Live connections: connection id → sender for outgoing events.
    pub clients: Arc<RwLock<HashMap<ConnectionId, mpsc::Sender<ServerEvent>>>>,
    /// Presence entries and call registrations.
    pub registry: Arc<RwLock<PresenceRegistry>>,
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            clients: Arc::new(RwLock::new(HashMap::new())),
            registry: Arc::new(RwLock::new(PresenceRegistry::new())),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
