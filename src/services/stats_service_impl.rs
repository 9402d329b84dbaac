use async_trait::async_trait;

use crate::db::Store;
use crate::domain::{UserId, today};
use crate::services::stats_service::{
    ConsistencyReport, StatsError, StatsService, StreakSummary,
};
use crate::stats::{
    ConsistencyRange, Leaderboard, ScoringRules, UserLogs, compute_consistency,
    compute_leaderboard, compute_streak,
};

pub struct SeaOrmStatsService {
    store: Store,
    rules: ScoringRules,
}

impl SeaOrmStatsService {
    #[must_use]
    pub const fn new(store: Store, rules: ScoringRules) -> Self {
        Self { store, rules }
    }
}

#[async_trait]
impl StatsService for SeaOrmStatsService {
    async fn streak(&self, user: UserId) -> Result<StreakSummary, StatsError> {
        let history = self.store.get_history(user.value(), None).await?;
        let today = today();

        Ok(StreakSummary {
            streak: compute_streak(&history, today),
            visited_today: history.get(&today).is_some_and(|l| l.visited()),
        })
    }

    async fn consistency(
        &self,
        user: UserId,
        range: ConsistencyRange,
    ) -> Result<ConsistencyReport, StatsError> {
        let history = self.store.get_history(user.value(), None).await?;
        let buckets = compute_consistency(&history, range, today());
        let total_visits = buckets.iter().map(|b| b.visits).sum();

        Ok(ConsistencyReport {
            range,
            buckets,
            total_visits,
        })
    }

    async fn leaderboard(&self, requester: Option<UserId>) -> Result<Leaderboard, StatsError> {
        let users = self.store.list_users().await?;
        let mut histories = self.store.get_all_histories().await?;

        // Users without a single log still rank, with zero scores.
        let users: Vec<UserLogs> = users
            .into_iter()
            .map(|u| UserLogs {
                logs: histories.remove(&u.id).unwrap_or_default(),
                user_id: u.id,
                username: u.username,
                avatar: u.avatar,
            })
            .collect();

        Ok(compute_leaderboard(
            &users,
            requester.map(|id| id.value()),
            &self.rules,
        ))
    }
}
