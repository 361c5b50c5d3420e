//! Signaling service: validates, authorizes, and relays handshake events.
//!
//! Every relay operation follows the same two-step contract: authorize
//! the sender against the session's recorded roles, then broadcast to
//! the session room. The relay is fail-closed — a message that cannot be
//! authorized is never forwarded, and the sender alone sees the error.

use std::sync::Arc;

use crate::domain::{ConnectionId, EventBus, Role, SessionRegistry, SignalEvent};
use crate::error::SignalingError;

/// Orchestration layer for all signaling operations.
///
/// Stateless coordinator: owns references to [`SessionRegistry`] for
/// session state and [`EventBus`] for room broadcasts. Each handler is a
/// short, non-blocking transformation: validate fields → check the
/// registry → mutate or publish → return.
#[derive(Debug, Clone)]
pub struct SignalingService {
    registry: Arc<SessionRegistry>,
    event_bus: EventBus,
}

impl SignalingService {
    /// Creates a new `SignalingService`.
    #[must_use]
    pub fn new(registry: Arc<SessionRegistry>, event_bus: EventBus) -> Self {
        Self {
            registry,
            event_bus,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns the number of active sessions (health surface).
    pub async fn active_sessions(&self) -> usize {
        self.registry.len().await
    }

    /// Registers `conn` as the client of `session_id`, creating the
    /// session on first use. Returns the session id the caller should
    /// join as a room.
    ///
    /// # Errors
    ///
    /// Returns [`SignalingError::Validation`] if `session_id` is missing
    /// or empty.
    pub async fn create_session(
        &self,
        conn: ConnectionId,
        session_id: Option<String>,
    ) -> Result<String, SignalingError> {
        let session_id = require(session_id, "session_id")?;
        self.registry.register_client(&session_id, conn).await;
        tracing::info!(%conn, session_id, "session created");
        Ok(session_id)
    }

    /// Registers `conn` as the compute node of an existing session.
    /// Returns the session id the caller should join as a room.
    ///
    /// # Errors
    ///
    /// Returns [`SignalingError::Validation`] if `session_id` is missing
    /// or empty, or [`SignalingError::SessionNotFound`] if no client has
    /// created the session.
    pub async fn join_as_compute(
        &self,
        conn: ConnectionId,
        session_id: Option<String>,
    ) -> Result<String, SignalingError> {
        let session_id = require(session_id, "session_id")?;
        self.registry.register_compute(&session_id, conn).await?;
        tracing::info!(%conn, session_id, "compute node joined session");
        Ok(session_id)
    }

    /// Relays an SDP offer from the session's client to its room.
    ///
    /// # Errors
    ///
    /// Returns [`SignalingError::Validation`] if a field is missing or
    /// empty, or [`SignalingError::Unauthorized`] if `conn` is not the
    /// recorded client (an unknown session collapses into the same
    /// failure). Nothing is broadcast on error.
    pub async fn relay_offer(
        &self,
        conn: ConnectionId,
        session_id: Option<String>,
        offer: Option<String>,
    ) -> Result<(), SignalingError> {
        let (session_id, offer) = match (non_empty(session_id), non_empty(offer)) {
            (Some(s), Some(o)) => (s, o),
            _ => return Err(SignalingError::Validation("session_id and offer".to_string())),
        };

        self.authorize(&session_id, conn, Role::Client).await?;

        self.event_bus.publish(SignalEvent::Offer {
            session_id: session_id.clone(),
            offer,
            from: conn,
        });
        tracing::info!(%conn, session_id, "offer relayed");
        Ok(())
    }

    /// Relays an SDP answer from the session's compute node to its room.
    ///
    /// # Errors
    ///
    /// As [`Self::relay_offer`], with the compute role required instead.
    pub async fn relay_answer(
        &self,
        conn: ConnectionId,
        session_id: Option<String>,
        answer: Option<String>,
    ) -> Result<(), SignalingError> {
        let (session_id, answer) = match (non_empty(session_id), non_empty(answer)) {
            (Some(s), Some(a)) => (s, a),
            _ => {
                return Err(SignalingError::Validation(
                    "session_id and answer".to_string(),
                ));
            }
        };

        self.authorize(&session_id, conn, Role::Compute).await?;

        self.event_bus.publish(SignalEvent::Answer {
            session_id: session_id.clone(),
            answer,
            from: conn,
        });
        tracing::info!(%conn, session_id, "answer relayed");
        Ok(())
    }

    /// Relays an ICE candidate from either peer of a session to its room.
    ///
    /// # Errors
    ///
    /// Returns [`SignalingError::Validation`] if a field is missing or
    /// null, or [`SignalingError::Unauthorized`] if `conn` occupies
    /// neither role of the session.
    pub async fn relay_ice_candidate(
        &self,
        conn: ConnectionId,
        session_id: Option<String>,
        candidate: Option<serde_json::Value>,
    ) -> Result<(), SignalingError> {
        let candidate = candidate.filter(|c| !c.is_null());
        let (session_id, candidate) = match (non_empty(session_id), candidate) {
            (Some(s), Some(c)) => (s, c),
            _ => {
                return Err(SignalingError::Validation(
                    "session_id and candidate".to_string(),
                ));
            }
        };

        if self.registry.role_of(&session_id, conn).await.is_none() {
            return Err(SignalingError::Unauthorized {
                role: "a peer",
                session_id,
            });
        }

        self.event_bus.publish(SignalEvent::IceCandidate {
            session_id: session_id.clone(),
            candidate,
            from: conn,
        });
        tracing::debug!(%conn, session_id, "ice candidate relayed");
        Ok(())
    }

    /// Tears down every session `conn` occupies. Called exactly once when
    /// a connection's loop exits, for any reason.
    pub async fn disconnect(&self, conn: ConnectionId) {
        let removed = self.registry.remove_connection(conn).await;
        for session_id in &removed {
            tracing::debug!(%conn, session_id, "removed session");
        }
        tracing::info!(%conn, sessions_removed = removed.len(), "connection closed");
    }

    /// Checks that `conn` occupies exactly `role` in `session_id`.
    async fn authorize(
        &self,
        session_id: &str,
        conn: ConnectionId,
        role: Role,
    ) -> Result<(), SignalingError> {
        if self.registry.role_of(session_id, conn).await == Some(role) {
            Ok(())
        } else {
            Err(SignalingError::Unauthorized {
                role: role.as_str(),
                session_id: session_id.to_string(),
            })
        }
    }
}

/// Treats an empty string the same as an absent field.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Extracts a required field or fails with a [`SignalingError::Validation`]
/// naming it.
fn require(value: Option<String>, name: &str) -> Result<String, SignalingError> {
    non_empty(value).ok_or_else(|| SignalingError::Validation(name.to_string()))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::TryRecvError;

    fn make_service() -> SignalingService {
        SignalingService::new(Arc::new(SessionRegistry::new()), EventBus::new(16))
    }

    #[tokio::test]
    async fn create_session_requires_session_id() {
        let service = make_service();
        let conn = ConnectionId::new();

        let missing = service.create_session(conn, None).await;
        assert!(matches!(missing, Err(SignalingError::Validation(_))));

        let empty = service.create_session(conn, Some(String::new())).await;
        assert!(matches!(empty, Err(SignalingError::Validation(_))));

        assert_eq!(service.active_sessions().await, 0);
    }

    #[tokio::test]
    async fn create_session_twice_overwrites_client_role() {
        let service = make_service();
        let conn = ConnectionId::new();

        let first = service.create_session(conn, Some("s1".to_string())).await;
        let second = service.create_session(conn, Some("s1".to_string())).await;
        assert!(first.is_ok());
        assert!(second.is_ok());
        assert_eq!(service.active_sessions().await, 1);
    }

    #[tokio::test]
    async fn join_unknown_session_fails_without_mutation() {
        let service = make_service();

        let result = service
            .join_as_compute(ConnectionId::new(), Some("ghost".to_string()))
            .await;
        assert!(matches!(result, Err(SignalingError::SessionNotFound(_))));
        assert_eq!(service.active_sessions().await, 0);
    }

    #[tokio::test]
    async fn offer_from_non_client_is_rejected_and_not_broadcast() {
        let service = make_service();
        let client = ConnectionId::new();
        let intruder = ConnectionId::new();
        let _ = service.create_session(client, Some("s1".to_string())).await;

        let mut rx = service.event_bus().subscribe();
        let result = service
            .relay_offer(intruder, Some("s1".to_string()), Some("SDP".to_string()))
            .await;

        assert!(matches!(result, Err(SignalingError::Unauthorized { .. })));
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn offer_for_unknown_session_collapses_into_unauthorized() {
        let service = make_service();
        let mut rx = service.event_bus().subscribe();

        let result = service
            .relay_offer(
                ConnectionId::new(),
                Some("ghost".to_string()),
                Some("SDP".to_string()),
            )
            .await;

        assert!(matches!(result, Err(SignalingError::Unauthorized { .. })));
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn offer_from_client_is_broadcast_unmodified() {
        let service = make_service();
        let client = ConnectionId::new();
        let _ = service.create_session(client, Some("s1".to_string())).await;

        let mut rx = service.event_bus().subscribe();
        let result = service
            .relay_offer(
                client,
                Some("s1".to_string()),
                Some("v=0\r\no=- 463528 2 IN IP4 127.0.0.1".to_string()),
            )
            .await;
        assert!(result.is_ok());

        let Ok(SignalEvent::Offer {
            session_id,
            offer,
            from,
        }) = rx.try_recv()
        else {
            panic!("expected an offer on the bus");
        };
        assert_eq!(session_id, "s1");
        assert_eq!(offer, "v=0\r\no=- 463528 2 IN IP4 127.0.0.1");
        assert_eq!(from, client);
    }

    #[tokio::test]
    async fn answer_requires_compute_role() {
        let service = make_service();
        let client = ConnectionId::new();
        let compute = ConnectionId::new();
        let _ = service.create_session(client, Some("s1".to_string())).await;
        let _ = service.join_as_compute(compute, Some("s1".to_string())).await;

        // The client may not answer its own offer.
        let from_client = service
            .relay_answer(client, Some("s1".to_string()), Some("SDP".to_string()))
            .await;
        assert!(matches!(
            from_client,
            Err(SignalingError::Unauthorized { .. })
        ));

        let from_compute = service
            .relay_answer(compute, Some("s1".to_string()), Some("SDP".to_string()))
            .await;
        assert!(from_compute.is_ok());
    }

    #[tokio::test]
    async fn ice_candidate_allowed_for_either_peer_only() {
        let service = make_service();
        let client = ConnectionId::new();
        let compute = ConnectionId::new();
        let stranger = ConnectionId::new();
        let _ = service.create_session(client, Some("s1".to_string())).await;
        let _ = service.join_as_compute(compute, Some("s1".to_string())).await;

        let candidate = serde_json::json!({
            "candidate": "candidate:1 1 UDP 2122252543 192.0.2.1 54400 typ host",
            "sdpMid": "0",
            "sdpMLineIndex": 0,
        });

        let mut rx = service.event_bus().subscribe();

        let from_client = service
            .relay_ice_candidate(client, Some("s1".to_string()), Some(candidate.clone()))
            .await;
        assert!(from_client.is_ok());

        let from_compute = service
            .relay_ice_candidate(compute, Some("s1".to_string()), Some(candidate.clone()))
            .await;
        assert!(from_compute.is_ok());

        let from_stranger = service
            .relay_ice_candidate(stranger, Some("s1".to_string()), Some(candidate.clone()))
            .await;
        assert!(matches!(
            from_stranger,
            Err(SignalingError::Unauthorized { .. })
        ));

        // Two broadcasts, structurally identical payloads.
        let Ok(SignalEvent::IceCandidate {
            candidate: first, ..
        }) = rx.try_recv()
        else {
            panic!("expected first candidate");
        };
        assert_eq!(first, candidate);
        assert!(rx.try_recv().is_ok());
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn null_candidate_is_a_validation_error() {
        let service = make_service();
        let client = ConnectionId::new();
        let _ = service.create_session(client, Some("s1".to_string())).await;

        let result = service
            .relay_ice_candidate(client, Some("s1".to_string()), Some(serde_json::Value::Null))
            .await;
        assert!(matches!(result, Err(SignalingError::Validation(_))));
    }

    #[tokio::test]
    async fn disconnect_invalidates_the_session_for_the_survivor() {
        let service = make_service();
        let client = ConnectionId::new();
        let compute = ConnectionId::new();
        let _ = service.create_session(client, Some("s1".to_string())).await;
        let _ = service.join_as_compute(compute, Some("s1".to_string())).await;

        service.disconnect(client).await;
        assert_eq!(service.active_sessions().await, 0);

        let rejoin = service.join_as_compute(compute, Some("s1".to_string())).await;
        assert!(matches!(rejoin, Err(SignalingError::SessionNotFound(_))));
    }
}
