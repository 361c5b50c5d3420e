//! Relayed signaling events.
//!
//! A [`SignalEvent`] is one handshake message in flight from one peer to
//! the other. The `offer`/`answer`/`candidate` payloads are opaque: the
//! relay forwards them exactly as submitted, byte for byte. Transparent
//! pass-through is a hard invariant — the relay's trust model depends on
//! never altering session-description content.

use serde::Serialize;

use super::ConnectionId;

/// One relayed handshake message, broadcast to the session's room.
///
/// Serializes directly into the wire envelope
/// `{"event": "<kind>", "data": {...}}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum SignalEvent {
    /// SDP offer from the client to the compute node.
    Offer {
        /// Session the offer belongs to.
        session_id: String,
        /// Opaque SDP offer string, forwarded unmodified.
        offer: String,
        /// Connection that sent the offer.
        from: ConnectionId,
    },
    /// SDP answer from the compute node back to the client.
    Answer {
        /// Session the answer belongs to.
        session_id: String,
        /// Opaque SDP answer string, forwarded unmodified.
        answer: String,
        /// Connection that sent the answer.
        from: ConnectionId,
    },
    /// ICE candidate from either peer, for NAT traversal.
    IceCandidate {
        /// Session the candidate belongs to.
        session_id: String,
        /// Opaque candidate value, forwarded structurally unmodified.
        candidate: serde_json::Value,
        /// Connection that sent the candidate.
        from: ConnectionId,
    },
}

impl SignalEvent {
    /// Returns the session id (room) this event targets.
    #[must_use]
    pub fn session_id(&self) -> &str {
        match self {
            Self::Offer { session_id, .. }
            | Self::Answer { session_id, .. }
            | Self::IceCandidate { session_id, .. } => session_id,
        }
    }
}
