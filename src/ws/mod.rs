//! WebSocket layer: connection handling, event dispatch, room membership.
//!
//! The WebSocket endpoint at `/ws` is the only surface peers talk to:
//! session registration and handshake relay all happen over it.

pub mod connection;
pub mod handler;
pub mod membership;
pub mod messages;
