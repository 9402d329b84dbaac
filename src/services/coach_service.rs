use serde::Serialize;
use thiserror::Error;

use crate::clients::ChatMessage;
use crate::domain::UserId;

#[derive(Debug, Error)]
pub enum CoachError {
    #[error("AI coach is disabled")]
    Disabled,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Coach upstream error: {0}")]
    Upstream(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for CoachError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for CoachError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CoachReply {
    pub reply: String,
}

#[async_trait::async_trait]
pub trait CoachService: Send + Sync {
    /// Sends `message` after the prior turns in `history`. The system prompt is
    /// built server-side; system turns supplied by the client are dropped.
    async fn chat(
        &self,
        user: UserId,
        message: &str,
        history: Vec<ChatMessage>,
    ) -> Result<CoachReply, CoachError>;
}
