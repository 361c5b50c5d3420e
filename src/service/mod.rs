//! Service layer: signaling orchestration.

pub mod signaling_service;

pub use signaling_service::SignalingService;
