//! WebSocket message types: inbound peer events and outbound replies.
//!
//! Every frame is a JSON envelope `{"event": "<name>", "data": {...}}`.
//! Inbound payload fields are optional at the serde level on purpose:
//! a missing `session_id` must surface as a validation error event, not
//! as a parse failure that the peer cannot distinguish from a bug.

use serde::{Deserialize, Serialize};

use crate::domain::{ConnectionId, Role};
use crate::error::SignalingError;

/// Events a peer can send to the relay.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Create a session and take its client role.
    CreateSession {
        /// Caller-supplied session identifier.
        #[serde(default)]
        session_id: Option<String>,
    },
    /// Join an existing session as its compute node.
    JoinAsCompute {
        /// Session to join.
        #[serde(default)]
        session_id: Option<String>,
    },
    /// Relay an SDP offer to the session room.
    Offer {
        /// Target session.
        #[serde(default)]
        session_id: Option<String>,
        /// Opaque SDP offer string.
        #[serde(default)]
        offer: Option<String>,
    },
    /// Relay an SDP answer to the session room.
    Answer {
        /// Target session.
        #[serde(default)]
        session_id: Option<String>,
        /// Opaque SDP answer string.
        #[serde(default)]
        answer: Option<String>,
    },
    /// Relay an ICE candidate to the session room.
    IceCandidate {
        /// Target session.
        #[serde(default)]
        session_id: Option<String>,
        /// Opaque candidate payload.
        #[serde(default)]
        candidate: Option<serde_json::Value>,
    },
}

/// Unicast replies the relay sends to a single peer.
///
/// Relayed handshake messages are not here — they are
/// [`crate::domain::SignalEvent`]s and reach peers through the room
/// broadcast instead. Both serialize into the same envelope shape.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Greeting sent once per accepted connection.
    Connected {
        /// Human-readable welcome line.
        message: String,
        /// The identifier this relay assigned to the connection.
        connection_id: ConnectionId,
    },
    /// Confirmation that a session was created by the caller.
    SessionCreated {
        /// The session id the caller now occupies as client.
        session_id: String,
    },
    /// Confirmation that the caller joined a session.
    Joined {
        /// Role the caller now occupies.
        role: Role,
        /// The joined session id.
        session_id: String,
    },
    /// A failure scoped to the caller's last event.
    Error {
        /// Numeric error code (see [`SignalingError`]).
        code: u32,
        /// Human-readable error message.
        message: String,
    },
}

impl From<SignalingError> for ServerEvent {
    fn from(err: SignalingError) -> Self {
        let body = err.into_body();
        Self::Error {
            code: body.code,
            message: body.message,
        }
    }
}
