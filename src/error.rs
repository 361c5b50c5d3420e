//! Signaling error types with wire-level code mapping.
//!
//! [`SignalingError`] is the central error type for the relay. Every variant
//! is recovered locally: the connection loop serializes it into a single
//! `error` event sent back to the offending connection, and nothing else —
//! no connection is closed, no other peer observes the failure, and the
//! session registry is never left in a partial state.

use serde::Serialize;

/// Structured payload of an `error` event sent back to a peer.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`SignalingError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
}

/// Relay-side error enum.
///
/// # Error Code Ranges
///
/// | Range     | Category        |
/// |-----------|-----------------|
/// | 1000–1999 | Validation      |
/// | 2000–2999 | Not Found       |
/// | 3000–3999 | Server          |
/// | 4000–4999 | Authorization   |
#[derive(Debug, thiserror::Error)]
pub enum SignalingError {
    /// A required event field was missing or empty.
    #[error("{0} required")]
    Validation(String),

    /// The referenced session does not exist.
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// The sending connection does not occupy the role required for
    /// this action in the referenced session.
    #[error("unauthorized: not {role} for session {session_id}")]
    Unauthorized {
        /// Role the action requires (e.g. `"client"`, `"compute"`,
        /// `"a peer"` for either-role actions).
        role: &'static str,
        /// Session the action targeted.
        session_id: String,
    },

    /// Unexpected fault while processing a single event. Scoped to that
    /// event only.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SignalingError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Validation(_) => 1001,
            Self::SessionNotFound(_) => 2001,
            Self::Unauthorized { .. } => 4001,
            Self::Internal(_) => 3000,
        }
    }

    /// Converts this error into the wire-level `error` event body.
    #[must_use]
    pub fn into_body(self) -> ErrorBody {
        ErrorBody {
            code: self.error_code(),
            message: self.to_string(),
        }
    }
}
