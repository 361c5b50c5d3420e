//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single peer connection: inbound
//! frames are dispatched to the [`SignalingService`], and room events
//! from the [`EventBus`](crate::domain::EventBus) are forwarded when the
//! connection has joined the matching room.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::membership::RoomMembership;
use super::messages::{ClientEvent, ServerEvent};
use crate::domain::{ConnectionId, Role};
use crate::service::SignalingService;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Mints a fresh [`ConnectionId`] and greets the peer.
/// - Reads events from the peer and dispatches them to the service.
/// - Forwards room broadcasts the peer is a member of.
/// - Tears down the peer's sessions when the loop exits, for any reason.
pub async fn run_connection(socket: WebSocket, service: SignalingService) {
    let conn = ConnectionId::new();
    let mut event_rx = service.event_bus().subscribe();
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut rooms = RoomMembership::new();

    tracing::info!(%conn, "peer connected");

    let greeting = ServerEvent::Connected {
        message: "Connected to NeuraX signaling server".to_string(),
        connection_id: conn,
    };
    let greeting_json = serde_json::to_string(&greeting).unwrap_or_default();
    if ws_tx.send(Message::text(greeting_json)).await.is_err() {
        service.disconnect(conn).await;
        return;
    }

    loop {
        tokio::select! {
            // Incoming event from the peer
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = handle_text_message(&service, conn, &mut rooms, &text).await;
                        if let Some(reply_json) = reply
                            && ws_tx.send(Message::text(reply_json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    _ => {}
                }
            }
            // Relayed event from the bus
            event = event_rx.recv() => {
                match event {
                    Ok(signal) => {
                        if rooms.matches(signal.session_id()) {
                            let json = serde_json::to_string(&signal).unwrap_or_default();
                            if ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(%conn, lagged = n, "peer lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    service.disconnect(conn).await;
    tracing::debug!(%conn, "ws connection closed");
}

/// Dispatches one text frame, returning an optional JSON reply for the
/// sender. Relay successes reply with nothing — the sender sees the room
/// broadcast like any other member. Every failure becomes exactly one
/// `error` event for the sender and nothing for anyone else.
async fn handle_text_message(
    service: &SignalingService,
    conn: ConnectionId,
    rooms: &mut RoomMembership,
    text: &str,
) -> Option<String> {
    let Ok(event) = serde_json::from_str::<ClientEvent>(text) else {
        let err = ServerEvent::Error {
            code: 1000,
            message: "malformed event".to_string(),
        };
        return serde_json::to_string(&err).ok();
    };

    let outcome = match event {
        ClientEvent::CreateSession { session_id } => {
            service.create_session(conn, session_id).await.map(|sid| {
                rooms.join(sid.clone());
                Some(ServerEvent::SessionCreated { session_id: sid })
            })
        }
        ClientEvent::JoinAsCompute { session_id } => {
            service.join_as_compute(conn, session_id).await.map(|sid| {
                rooms.join(sid.clone());
                Some(ServerEvent::Joined {
                    role: Role::Compute,
                    session_id: sid,
                })
            })
        }
        ClientEvent::Offer { session_id, offer } => service
            .relay_offer(conn, session_id, offer)
            .await
            .map(|()| None),
        ClientEvent::Answer { session_id, answer } => service
            .relay_answer(conn, session_id, answer)
            .await
            .map(|()| None),
        ClientEvent::IceCandidate {
            session_id,
            candidate,
        } => service
            .relay_ice_candidate(conn, session_id, candidate)
            .await
            .map(|()| None),
    };

    match outcome {
        Ok(Some(reply)) => serde_json::to_string(&reply).ok(),
        Ok(None) => None,
        Err(err) => serde_json::to_string(&ServerEvent::from(err)).ok(),
    }
}
