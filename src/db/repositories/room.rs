use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entities::{prelude::*, room_messages};
use crate::models::RoomMessage;

impl From<room_messages::Model> for RoomMessage {
    fn from(model: room_messages::Model) -> Self {
        Self {
            id: model.id,
            room: model.room,
            user_id: model.user_id,
            username: model.username,
            avatar: model.avatar,
            text: model.text,
            created_at: model.created_at,
        }
    }
}

pub struct NewRoomMessage<'a> {
    pub room: &'a str,
    pub user_id: i32,
    pub username: &'a str,
    pub avatar: Option<&'a str>,
    pub text: &'a str,
}

pub struct RoomRepository {
    conn: DatabaseConnection,
}

impl RoomRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(&self, message: NewRoomMessage<'_>) -> Result<RoomMessage> {
        let model = room_messages::ActiveModel {
            room: Set(message.room.to_string()),
            user_id: Set(message.user_id),
            username: Set(message.username.to_string()),
            avatar: Set(message.avatar.map(str::to_string)),
            text: Set(message.text.to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert room message")?;

        Ok(RoomMessage::from(model))
    }

    /// The newest `limit` messages of `room`, returned oldest first.
    pub async fn recent(&self, room: &str, limit: u64) -> Result<Vec<RoomMessage>> {
        let mut rows = RoomMessages::find()
            .filter(room_messages::Column::Room.eq(room))
            .order_by_desc(room_messages::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to query room messages")?;

        rows.reverse();
        Ok(rows.into_iter().map(RoomMessage::from).collect())
    }
}
