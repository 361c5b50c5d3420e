//! Per-connection room membership.
//!
//! Tracks which session rooms a WebSocket connection has joined and
//! provides server-side filtering of broadcast events. Membership is
//! local to the connection task and dies with it; the session record
//! itself lives in the registry.

use std::collections::HashSet;

/// Set of session rooms one connection belongs to.
///
/// A connection joins a room exactly when it registers a role in the
/// matching session (`create_session` or `join_as_compute`). There is no
/// leave operation: a room stops mattering once its session is removed,
/// because nothing can be published to it anymore.
#[derive(Debug, Default)]
pub struct RoomMembership {
    rooms: HashSet<String>,
}

impl RoomMembership {
    /// Creates an empty membership set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Joins the room for `session_id`. Joining twice is a no-op.
    pub fn join(&mut self, session_id: String) {
        self.rooms.insert(session_id);
    }

    /// Returns `true` if this connection has joined the given room.
    #[must_use]
    pub fn matches(&self, session_id: &str) -> bool {
        self.rooms.contains(session_id)
    }

    /// Returns the number of joined rooms.
    #[must_use]
    pub fn count(&self) -> usize {
        self.rooms.len()
    }
}
