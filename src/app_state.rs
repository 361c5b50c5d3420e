//! Shared application state injected into all Axum handlers.

use crate::service::SignalingService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Signaling service: session registry plus room event bus.
    pub signaling: SignalingService,
}
