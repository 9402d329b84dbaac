use serde::Serialize;
use thiserror::Error;

use crate::domain::UserId;
use crate::stats::{ConsistencyBucket, ConsistencyRange, Leaderboard};

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for StatsError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for StatsError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreakSummary {
    pub streak: u32,
    pub visited_today: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsistencyReport {
    pub range: ConsistencyRange,
    pub buckets: Vec<ConsistencyBucket>,
    pub total_visits: u32,
}

/// Aggregations over stored logs. Nothing here is cached; every call reads the
/// current rows.
#[async_trait::async_trait]
pub trait StatsService: Send + Sync {
    async fn streak(&self, user: UserId) -> Result<StreakSummary, StatsError>;

    async fn consistency(
        &self,
        user: UserId,
        range: ConsistencyRange,
    ) -> Result<ConsistencyReport, StatsError>;

    /// Ranks every registered user. `requester` is located in the full ranking,
    /// not only in the returned top entries.
    async fn leaderboard(&self, requester: Option<UserId>) -> Result<Leaderboard, StatsError>;
}
