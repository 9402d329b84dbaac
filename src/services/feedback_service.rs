use thiserror::Error;

use crate::db::FeedbackEntry;
use crate::domain::UserId;

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for FeedbackError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for FeedbackError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait FeedbackService: Send + Sync {
    /// Saves the feedback, then tries to notify the admin. A failed
    /// notification does not fail the call.
    async fn submit(
        &self,
        user: UserId,
        category: &str,
        message: &str,
        rating: i32,
    ) -> Result<FeedbackEntry, FeedbackError>;

    /// Most recent feedback, newest first.
    async fn recent(&self, limit: u64) -> Result<Vec<FeedbackEntry>, FeedbackError>;
}
