//! The shared chat room: persistence plus live fan-out.
//!
//! Messages are stored first and only then broadcast, so every id a
//! subscriber sees already exists in the database.

use thiserror::Error;
use tokio::sync::broadcast;
use tracing::debug;

use crate::config::RoomConfig;
use crate::db::{NewRoomMessage, Store};
use crate::domain::events::OutgoingMessage;
use crate::models::{GLOBAL_ROOM, RoomMessage};

#[derive(Debug, Error)]
pub enum RoomError {
    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for RoomError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for RoomError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// What a socket receives on joining.
pub struct RoomSubscription {
    /// Last stored messages, oldest first.
    pub history: Vec<RoomMessage>,
    pub receiver: broadcast::Receiver<RoomMessage>,
}

impl RoomSubscription {
    /// Highest id already delivered through `history`. Broadcasts at or below
    /// it raced the history query and must be skipped.
    #[must_use]
    pub fn replayed_up_to(&self) -> i32 {
        self.history.last().map_or(0, |m| m.id)
    }
}

#[derive(Clone)]
pub struct RoomHub {
    store: Store,
    sender: broadcast::Sender<RoomMessage>,
    history_limit: u64,
    max_message_length: usize,
}

impl RoomHub {
    #[must_use]
    pub fn new(store: Store, config: &RoomConfig) -> Self {
        let (sender, _) = broadcast::channel(config.channel_capacity.max(1));
        Self {
            store,
            sender,
            history_limit: config.history_limit,
            max_message_length: config.max_message_length,
        }
    }

    /// Subscribes before reading history so no message falls between the two.
    pub async fn join(&self) -> Result<RoomSubscription, RoomError> {
        let receiver = self.sender.subscribe();
        let history = self.recent(self.history_limit).await?;

        debug!(
            subscribers = self.sender.receiver_count(),
            replayed = history.len(),
            "Socket joined room"
        );

        Ok(RoomSubscription { history, receiver })
    }

    pub async fn recent(&self, limit: u64) -> Result<Vec<RoomMessage>, RoomError> {
        Ok(self.store.recent_room_messages(GLOBAL_ROOM, limit).await?)
    }

    /// Validates, stores and fans the message out to every joined socket.
    ///
    /// # Errors
    ///
    /// [`RoomError::Validation`] when the sender id or the text is missing,
    /// or the text is too long. Nothing is stored or broadcast in that case.
    pub async fn send(&self, draft: OutgoingMessage) -> Result<RoomMessage, RoomError> {
        let Some(user_id) = draft.user_id else {
            return Err(RoomError::Validation("Sender user_id is required".to_string()));
        };

        let text = draft.text.as_deref().map(str::trim).unwrap_or_default();
        if text.is_empty() {
            return Err(RoomError::Validation("Message text is required".to_string()));
        }
        if text.chars().count() > self.max_message_length {
            return Err(RoomError::Validation(format!(
                "Message must be at most {} characters",
                self.max_message_length
            )));
        }

        let username = draft
            .username
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or("anonymous");

        let message = self
            .store
            .insert_room_message(NewRoomMessage {
                room: GLOBAL_ROOM,
                user_id,
                username,
                avatar: draft.avatar.as_deref(),
                text,
            })
            .await?;

        metrics::counter!("room_messages_total").increment(1);

        // No joined sockets is not an error.
        let _ = self.sender.send(message.clone());

        Ok(message)
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
