use async_trait::async_trait;
use chrono::NaiveDate;

use crate::db::{Store, WeightEntry};
use crate::domain::UserId;
use crate::services::weight_service::{WeightError, WeightService};

pub struct SeaOrmWeightService {
    store: Store,
}

impl SeaOrmWeightService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl WeightService for SeaOrmWeightService {
    async fn list(&self, user: UserId) -> Result<Vec<WeightEntry>, WeightError> {
        Ok(self.store.list_weight_entries(user.value()).await?)
    }

    async fn latest(&self, user: UserId) -> Result<Option<WeightEntry>, WeightError> {
        Ok(self.store.latest_weight_entry(user.value()).await?)
    }

    async fn record(
        &self,
        user: UserId,
        date: NaiveDate,
        weight: f64,
    ) -> Result<WeightEntry, WeightError> {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(WeightError::Validation(
                "Weight must be a positive number".to_string(),
            ));
        }

        Ok(self.store.record_weight(user.value(), date, weight).await?)
    }
}
