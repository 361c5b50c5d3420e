//! Session record and peer roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ConnectionId;

/// Role a connection occupies within a session.
///
/// Determines which relay operations the connection is authorized to
/// perform: only the client may send offers, only the compute node may
/// send answers, either may send ICE candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The connection that created the session (sends the SDP offer).
    Client,
    /// The compute node that joined the session (sends the SDP answer).
    Compute,
}

impl Role {
    /// Returns the wire-level name of this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Compute => "compute",
        }
    }
}

/// One pending or active pairing attempt.
///
/// At most one connection occupies each role at any time. A later
/// registration for an occupied role silently replaces the earlier
/// occupant (last-writer-wins). Note this means any connection that
/// learns a session id can take over a role — accepted for idempotent
/// reconnect attempts, since session ids are unguessable in practice.
#[derive(Debug, Clone)]
pub struct Session {
    /// Connection currently occupying the client role, if any.
    pub client: Option<ConnectionId>,
    /// Connection currently occupying the compute role, if any.
    pub compute: Option<ConnectionId>,
    /// When the session record was first created.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Creates an empty session record.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: None,
            compute: None,
            created_at: Utc::now(),
        }
    }

    /// Returns the role `conn` occupies in this session, if any.
    #[must_use]
    pub fn role_of(&self, conn: ConnectionId) -> Option<Role> {
        if self.client == Some(conn) {
            Some(Role::Client)
        } else if self.compute == Some(conn) {
            Some(Role::Compute)
        } else {
            None
        }
    }

    /// Returns `true` if `conn` occupies either role.
    #[must_use]
    pub fn contains(&self, conn: ConnectionId) -> bool {
        self.role_of(conn).is_some()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
