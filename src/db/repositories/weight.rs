use anyhow::{Context, Result};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Serialize;

use crate::domain::{format_date, parse_date};
use crate::entities::{prelude::*, weight_entries};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightEntry {
    pub id: i32,
    pub date: NaiveDate,
    pub weight: f64,
    pub created_at: String,
}

impl TryFrom<weight_entries::Model> for WeightEntry {
    type Error = anyhow::Error;

    fn try_from(model: weight_entries::Model) -> Result<Self> {
        let date = parse_date(&model.date)
            .with_context(|| format!("Corrupt date in weight entry {}", model.id))?;

        Ok(Self {
            id: model.id,
            date,
            weight: model.weight,
            created_at: model.created_at,
        })
    }
}

pub struct WeightRepository {
    conn: DatabaseConnection,
}

impl WeightRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Ascending by date, then by insertion order.
    pub async fn list(&self, user_id: i32) -> Result<Vec<WeightEntry>> {
        WeightEntries::find()
            .filter(weight_entries::Column::UserId.eq(user_id))
            .order_by_asc(weight_entries::Column::Date)
            .order_by_asc(weight_entries::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list weight entries")?
            .into_iter()
            .map(WeightEntry::try_from)
            .collect()
    }

    pub async fn latest(&self, user_id: i32) -> Result<Option<WeightEntry>> {
        WeightEntries::find()
            .filter(weight_entries::Column::UserId.eq(user_id))
            .order_by_desc(weight_entries::Column::Date)
            .order_by_asc(weight_entries::Column::Id)
            .one(&self.conn)
            .await
            .context("Failed to query latest weight entry")?
            .map(WeightEntry::try_from)
            .transpose()
    }

    /// Updates the first entry recorded for `date`, or inserts one.
    pub async fn record(&self, user_id: i32, date: NaiveDate, weight: f64) -> Result<WeightEntry> {
        let date = format_date(date);

        let existing = WeightEntries::find()
            .filter(weight_entries::Column::UserId.eq(user_id))
            .filter(weight_entries::Column::Date.eq(date.clone()))
            .order_by_asc(weight_entries::Column::Id)
            .one(&self.conn)
            .await
            .context("Failed to query weight entry")?;

        let model = if let Some(existing) = existing {
            let mut active: weight_entries::ActiveModel = existing.into();
            active.weight = Set(weight);
            active.update(&self.conn).await?
        } else {
            weight_entries::ActiveModel {
                user_id: Set(user_id),
                date: Set(date),
                weight: Set(weight),
                created_at: Set(chrono::Utc::now().to_rfc3339()),
                ..Default::default()
            }
            .insert(&self.conn)
            .await
            .context("Failed to insert weight entry")?
        };

        WeightEntry::try_from(model)
    }
}
