//! The global chat room over WebSocket.
//!
//! Each socket gets one writer task that owns the sink and one reader task
//! that handles client frames. Direct replies (history, acks, errors) reach the
//! writer over an mpsc channel; room traffic arrives on the hub's broadcast
//! receiver once the socket has joined.

use axum::{
    Extension, Json,
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures::{Sink, SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::auth::CurrentUser;
use super::validation::validate_limit;
use crate::api::{ApiError, ApiResponse, AppState, RoomMessagesQuery};
use crate::domain::events::{ClientEvent, MessageAck, OutgoingMessage, ServerEvent};
use crate::models::RoomMessage;
use crate::services::{RoomError, RoomHub, RoomSubscription};

impl From<RoomError> for ApiError {
    fn from(err: RoomError) -> Self {
        match err {
            RoomError::Validation(msg) => Self::validation(msg),
            RoomError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

enum Outbound {
    Frame(ServerEvent),
    Joined(RoomSubscription),
}

/// `GET /api/room/messages?limit=`, oldest first.
pub async fn recent_messages(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RoomMessagesQuery>,
) -> Result<Json<ApiResponse<Vec<RoomMessage>>>, ApiError> {
    let default_limit = state.config().read().await.room.history_limit;
    let limit = query.limit.unwrap_or(default_limit);
    validate_limit(usize::try_from(limit).unwrap_or(usize::MAX))?;

    let messages = state.room().recent(limit).await?;
    Ok(Json(ApiResponse::success(messages)))
}

/// `GET /api/room/ws`
pub async fn room_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    user: Option<Extension<CurrentUser>>,
) -> impl IntoResponse {
    let socket_id = Uuid::new_v4();
    let user = user.map(|Extension(u)| u);
    let hub = state.room().clone();

    info!(%socket_id, user_id = user.as_ref().map(|u| u.id.value()), "Room socket connecting");

    ws.on_upgrade(move |socket| handle_room_socket(socket, hub, user, socket_id))
}

async fn handle_room_socket(
    socket: WebSocket,
    hub: RoomHub,
    user: Option<CurrentUser>,
    socket_id: Uuid,
) {
    let (sender, mut receiver) = socket.split();
    let (out_tx, out_rx) = mpsc::unbounded_channel::<Outbound>();

    let mut send_task = tokio::spawn(write_frames(sender, out_rx, socket_id));

    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            let text = match msg {
                Message::Text(text) => text,
                Message::Close(_) => break,
                _ => continue,
            };

            let outbound = match serde_json::from_str::<ClientEvent>(text.as_str()) {
                Ok(ClientEvent::JoinGlobal) => match hub.join().await {
                    Ok(subscription) => Outbound::Joined(subscription),
                    Err(e) => {
                        warn!(%socket_id, error = %e, "Failed to join room");
                        Outbound::Frame(ServerEvent::Error {
                            error: "Failed to join room".to_string(),
                        })
                    }
                },
                Ok(ClientEvent::SendMessage(draft)) => {
                    let draft = with_identity(draft, user.as_ref());
                    Outbound::Frame(ServerEvent::MessageAck(send_ack(&hub, draft).await))
                }
                Err(e) => {
                    debug!(%socket_id, error = %e, "Unparseable room frame");
                    Outbound::Frame(ServerEvent::Error {
                        error: format!("Invalid frame: {e}"),
                    })
                }
            };

            if out_tx.send(outbound).is_err() {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    info!(%socket_id, "Room socket disconnected");
}

/// Owns the socket sink. Direct replies come in over `out_rx`; room traffic
/// starts flowing once an [`Outbound::Joined`] arrives, minus any message the
/// joined history already replayed.
async fn write_frames<S>(
    mut sink: S,
    mut out_rx: mpsc::UnboundedReceiver<Outbound>,
    socket_id: Uuid,
) where
    S: Sink<Message> + Unpin,
{
    let mut live: Option<broadcast::Receiver<RoomMessage>> = None;
    let mut replayed_up_to = 0;

    loop {
        let frame = tokio::select! {
            outbound = out_rx.recv() => match outbound {
                Some(Outbound::Frame(frame)) => frame,
                Some(Outbound::Joined(subscription)) => {
                    replayed_up_to = subscription.replayed_up_to();
                    live = Some(subscription.receiver);
                    ServerEvent::History(subscription.history)
                }
                None => break,
            },
            message = recv_live(&mut live) => match message {
                Ok(message) if message.id > replayed_up_to => ServerEvent::ReceiveMessage(message),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!(%socket_id, "Room socket lagged by {} messages", count);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        };

        let Ok(json) = serde_json::to_string(&frame) else {
            continue;
        };
        if sink.send(Message::Text(json.into())).await.is_err() {
            break;
        }
    }
}

async fn recv_live(
    live: &mut Option<broadcast::Receiver<RoomMessage>>,
) -> Result<RoomMessage, broadcast::error::RecvError> {
    match live {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

/// An authenticated socket always speaks as its own user.
fn with_identity(mut draft: OutgoingMessage, user: Option<&CurrentUser>) -> OutgoingMessage {
    if let Some(user) = user {
        draft.user_id = Some(user.id.value());
        draft.username = Some(user.username.clone());
    }
    draft
}

async fn send_ack(hub: &RoomHub, draft: OutgoingMessage) -> MessageAck {
    match hub.send(draft).await {
        Ok(message) => MessageAck::Ok { message },
        Err(RoomError::Validation(error)) => MessageAck::Error { error },
        Err(e @ RoomError::Database(_)) => {
            warn!(error = %e, "Failed to store room message");
            MessageAck::Error {
                error: "Failed to send message".to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Role, UserId};
    use futures::channel::mpsc as frame_channel;
    use std::time::Duration;

    fn room_message(id: i32, text: &str) -> RoomMessage {
        RoomMessage {
            id,
            room: "global".to_string(),
            user_id: 1,
            username: "sam".to_string(),
            avatar: None,
            text: text.to_string(),
            created_at: "2024-03-01T10:00:00Z".to_string(),
        }
    }

    async fn next_frame(frames: &mut frame_channel::UnboundedReceiver<Message>) -> serde_json::Value {
        let msg = tokio::time::timeout(Duration::from_secs(2), frames.next())
            .await
            .expect("frame in time")
            .expect("writer still open");
        match msg {
            Message::Text(text) => serde_json::from_str(text.as_str()).unwrap(),
            other => panic!("unexpected frame {other:?}"),
        }
    }

    async fn assert_no_frame(frames: &mut frame_channel::UnboundedReceiver<Message>) {
        let next = tokio::time::timeout(Duration::from_millis(100), frames.next()).await;
        assert!(next.is_err(), "unexpected frame {next:?}");
    }

    #[tokio::test]
    async fn test_writer_skips_broadcasts_covered_by_history() {
        let (room_tx, receiver) = broadcast::channel(16);
        // Both land on the receiver before the history is delivered.
        room_tx.send(room_message(5, "already in history")).unwrap();
        room_tx.send(room_message(6, "new")).unwrap();

        let (sink, mut frames) = frame_channel::unbounded::<Message>();
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let writer = tokio::spawn(write_frames(sink, out_rx, Uuid::new_v4()));

        out_tx
            .send(Outbound::Joined(RoomSubscription {
                history: vec![room_message(4, "older"), room_message(5, "already in history")],
                receiver,
            }))
            .unwrap();

        let history = next_frame(&mut frames).await;
        assert_eq!(history["event"], "history");
        assert_eq!(history["data"].as_array().unwrap().len(), 2);

        let live = next_frame(&mut frames).await;
        assert_eq!(live["event"], "receive_message");
        assert_eq!(live["data"]["id"], 6);

        assert_no_frame(&mut frames).await;
        writer.abort();
    }

    #[tokio::test]
    async fn test_writer_ignores_room_until_joined() {
        let (room_tx, receiver) = broadcast::channel(16);
        let (sink, mut frames) = frame_channel::unbounded::<Message>();
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let writer = tokio::spawn(write_frames(sink, out_rx, Uuid::new_v4()));

        room_tx.send(room_message(1, "before join")).unwrap();
        out_tx
            .send(Outbound::Frame(ServerEvent::Error {
                error: "Invalid frame".to_string(),
            }))
            .unwrap();

        let error = next_frame(&mut frames).await;
        assert_eq!(error["event"], "error");
        assert_no_frame(&mut frames).await;

        drop(receiver);
        writer.abort();
    }

    #[test]
    fn test_authenticated_identity_overrides_draft() {
        let draft = OutgoingMessage {
            user_id: Some(99),
            username: Some("mallory".to_string()),
            avatar: None,
            text: Some("hi".to_string()),
        };
        let user = CurrentUser {
            id: UserId::new(3),
            username: "sam".to_string(),
            role: Role::User,
        };

        let draft = with_identity(draft, Some(&user));
        assert_eq!(draft.user_id, Some(3));
        assert_eq!(draft.username.as_deref(), Some("sam"));

        let anonymous = with_identity(OutgoingMessage::default(), None);
        assert_eq!(anonymous.user_id, None);
    }
}
