use serde::{Deserialize, Serialize};

/// Name of the single shared room every client joins.
pub const GLOBAL_ROOM: &str = "global";

/// A persisted chat message. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomMessage {
    pub id: i32,
    pub room: String,
    pub user_id: i32,
    pub username: String,
    pub avatar: Option<String>,
    pub text: String,
    pub created_at: String,
}
