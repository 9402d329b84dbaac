use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::domain::UserId;
use crate::stats::PersonalRecord;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("No manual record for '{0}'")]
    NotFound(String),

    /// The submitted weight does not beat the current best; nothing was written.
    #[error("{weight} does not beat the current record of {}", .current.weight)]
    NotARecord {
        weight: f64,
        current: PersonalRecord,
    },

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for RecordError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for RecordError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Best record per exercise name, as displayed.
pub type RecordBoard = BTreeMap<String, PersonalRecord>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedRecord {
    pub exercise: String,
    pub record: PersonalRecord,
    pub previous: Option<PersonalRecord>,
}

#[async_trait::async_trait]
pub trait RecordService: Send + Sync {
    /// Records for the tracked exercises and every manually recorded one.
    /// Exercises without any record are omitted.
    async fn list_records(&self, user: UserId) -> Result<RecordBoard, RecordError>;

    async fn get_record(
        &self,
        user: UserId,
        exercise: &str,
    ) -> Result<Option<PersonalRecord>, RecordError>;

    /// Stores a manual record if `weight` beats the best known one.
    ///
    /// # Errors
    ///
    /// [`RecordError::NotARecord`] when it does not; the stored state is unchanged.
    async fn record_manual_pr(
        &self,
        user: UserId,
        exercise: &str,
        weight: f64,
        reps: u32,
    ) -> Result<SavedRecord, RecordError>;

    /// Removes the manual record only. Records mined from logs stay visible.
    async fn delete_pr(&self, user: UserId, exercise: &str) -> Result<(), RecordError>;
}
