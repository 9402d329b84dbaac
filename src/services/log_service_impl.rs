//! `SeaORM` implementation of the `LogService` trait.

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::info;

use crate::db::Store;
use crate::domain::{UserId, format_date, today, window_start};
use crate::models::{DailyLogSnapshot, History};
use crate::services::log_service::{LogError, LogService, resolve_meal_calories, validate_log};

pub struct SeaOrmLogService {
    store: Store,
    window_months: u32,
}

impl SeaOrmLogService {
    #[must_use]
    pub const fn new(store: Store, window_months: u32) -> Self {
        Self {
            store,
            window_months,
        }
    }
}

#[async_trait]
impl LogService for SeaOrmLogService {
    async fn get_history(
        &self,
        user: UserId,
        since: Option<NaiveDate>,
    ) -> Result<History, LogError> {
        let since = since.unwrap_or_else(|| window_start(today(), self.window_months));
        Ok(self.store.get_history(user.value(), Some(since)).await?)
    }

    async fn get_log(
        &self,
        user: UserId,
        date: NaiveDate,
    ) -> Result<Option<DailyLogSnapshot>, LogError> {
        Ok(self.store.get_daily_log(user.value(), date).await?)
    }

    async fn upsert_log(
        &self,
        user: UserId,
        mut log: DailyLogSnapshot,
    ) -> Result<DailyLogSnapshot, LogError> {
        validate_log(&log)?;

        for meal in &mut log.meals {
            resolve_meal_calories(meal);
        }

        let stored = self.store.replace_daily_log(user.value(), &log).await?;

        metrics::counter!("daily_log_upserts_total").increment(1);
        info!(
            event = "daily_log_replaced",
            user_id = %user,
            date = %format_date(stored.date),
            workouts = stored.workouts.len(),
            meals = stored.meals.len(),
            "Daily log saved"
        );

        Ok(stored)
    }
}
