use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, QuerySelect, Set};

use crate::entities::{feedback, prelude::*};

pub use crate::entities::feedback::Model as FeedbackEntry;

pub struct FeedbackRepository {
    conn: DatabaseConnection,
}

impl FeedbackRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(
        &self,
        user_id: i32,
        category: &str,
        message: &str,
        rating: i32,
    ) -> Result<FeedbackEntry> {
        feedback::ActiveModel {
            user_id: Set(user_id),
            category: Set(category.to_string()),
            message: Set(message.to_string()),
            rating: Set(rating),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert feedback")
    }

    /// Newest first.
    pub async fn recent(&self, limit: u64) -> Result<Vec<FeedbackEntry>> {
        Feedback::find()
            .order_by_desc(feedback::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to list feedback")
    }
}
