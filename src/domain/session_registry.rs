//! In-memory session store.
//!
//! [`SessionRegistry`] maps caller-supplied session ids to [`Session`]
//! records behind a single [`tokio::sync::RwLock`]. A single coarse lock
//! suffices: every mutation is a short read-modify-write over a tiny
//! record, sessions exist only for the duration of a handshake, and the
//! working set is small. Relay authorization reads take the lock shared.
//!
//! Nothing here is ever persisted. A process restart discards all
//! sessions.

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::{ConnectionId, Role, Session};
use crate::error::SignalingError;

/// Central store for all active signaling sessions.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `conn` as the client of `session_id`, creating the
    /// session if it does not exist yet.
    ///
    /// A repeated call for the same session replaces the previous client
    /// occupant (last-writer-wins) rather than duplicating the entry.
    pub async fn register_client(&self, session_id: &str, conn: ConnectionId) {
        let mut map = self.sessions.write().await;
        map.entry(session_id.to_string()).or_default().client = Some(conn);
    }

    /// Registers `conn` as the compute node of an existing session.
    ///
    /// Overwrite semantics match [`Self::register_client`].
    ///
    /// # Errors
    ///
    /// Returns [`SignalingError::SessionNotFound`] if no session with the
    /// given id exists — a compute node cannot join a session no client
    /// has created. The store is not mutated on failure.
    pub async fn register_compute(
        &self,
        session_id: &str,
        conn: ConnectionId,
    ) -> Result<(), SignalingError> {
        let mut map = self.sessions.write().await;
        let session = map
            .get_mut(session_id)
            .ok_or_else(|| SignalingError::SessionNotFound(session_id.to_string()))?;
        session.compute = Some(conn);
        Ok(())
    }

    /// Returns the role `conn` occupies in `session_id`, if any.
    ///
    /// A missing session and a non-member connection are indistinguishable
    /// here (both `None`); relay authorization relies on exactly that
    /// collapse so unknown sessions fail closed.
    pub async fn role_of(&self, session_id: &str, conn: ConnectionId) -> Option<Role> {
        let map = self.sessions.read().await;
        map.get(session_id).and_then(|s| s.role_of(conn))
    }

    /// Removes every session in which `conn` occupies either role,
    /// returning the removed session ids.
    ///
    /// Disconnect cleanup is conservative: the whole record goes, even
    /// though the counterpart may still be connected. A half-open session
    /// cannot complete a handshake alone, and retaining it would leak
    /// abandoned entries. O(active sessions) scan, acceptable at signaling
    /// scale.
    pub async fn remove_connection(&self, conn: ConnectionId) -> Vec<String> {
        let mut map = self.sessions.write().await;
        let doomed: Vec<String> = map
            .iter()
            .filter(|(_, session)| session.contains(conn))
            .map(|(id, _)| id.clone())
            .collect();
        for id in &doomed {
            map.remove(id);
        }
        doomed
    }

    /// Returns `true` if a session with the given id exists.
    pub async fn contains(&self, session_id: &str) -> bool {
        self.sessions.read().await.contains_key(session_id)
    }

    /// Returns the number of active sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns `true` if the registry contains no sessions.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
