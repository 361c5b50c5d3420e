//! Domain layer: core types, session registry, and event system.
//!
//! This module contains the relay-side domain model: connection
//! identity, session records with their role slots, the session
//! registry for concurrent session storage, and the event bus that
//! fans relayed handshake messages out to session rooms.

pub mod connection_id;
pub mod event_bus;
pub mod session;
pub mod session_registry;
pub mod signal_event;

pub use connection_id::ConnectionId;
pub use event_bus::EventBus;
pub use session::{Role, Session};
pub use session_registry::SessionRegistry;
pub use signal_event::SignalEvent;
