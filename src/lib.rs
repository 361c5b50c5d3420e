//! # neurax-signaling
//!
//! WebSocket signaling relay for NeuraX peer-to-peer session setup.
//!
//! This crate pairs a "client" connection with a "compute" connection under
//! a caller-supplied session id and relays the WebRTC handshake messages
//! (SDP offers, SDP answers, ICE candidates) between them. The relay never
//! inspects, transforms, or persists the payloads it forwards — it is a
//! transparent rendezvous point, nothing more. All session state lives in
//! memory and is discarded on process restart.
//!
//! ## Architecture
//!
//! ```text
//! Peers (WebSocket)
//!     │
//!     ├── WS Connection Loop (ws/)
//!     │
//!     ├── SignalingService (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── SessionRegistry (domain/)
//!     │
//!     └── Health Endpoint (api/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod ws;
