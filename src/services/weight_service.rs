use chrono::NaiveDate;
use thiserror::Error;

use crate::db::WeightEntry;
use crate::domain::UserId;

#[derive(Debug, Error)]
pub enum WeightError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for WeightError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for WeightError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait WeightService: Send + Sync {
    /// All entries, oldest date first.
    async fn list(&self, user: UserId) -> Result<Vec<WeightEntry>, WeightError>;

    async fn latest(&self, user: UserId) -> Result<Option<WeightEntry>, WeightError>;

    /// Overwrites the first entry recorded for `date`, or adds one.
    async fn record(
        &self,
        user: UserId,
        date: NaiveDate,
        weight: f64,
    ) -> Result<WeightEntry, WeightError>;
}
