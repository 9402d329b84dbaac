use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{manual_prs, prelude::*};
use crate::stats::ManualRecord;

impl From<manual_prs::Model> for ManualRecord {
    fn from(model: manual_prs::Model) -> Self {
        Self {
            exercise: model.exercise,
            weight: model.weight,
            reps: u32::try_from(model.reps).unwrap_or_default(),
        }
    }
}

pub struct RecordRepository {
    conn: DatabaseConnection,
}

impl RecordRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    async fn find_row(&self, user_id: i32, exercise: &str) -> Result<Option<manual_prs::Model>> {
        let wanted = exercise.trim();
        let rows = ManualPrs::find()
            .filter(manual_prs::Column::UserId.eq(user_id))
            .order_by_asc(manual_prs::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query manual records")?;

        Ok(rows
            .into_iter()
            .find(|r| r.exercise.trim().eq_ignore_ascii_case(wanted)))
    }

    pub async fn list(&self, user_id: i32) -> Result<Vec<ManualRecord>> {
        let rows = ManualPrs::find()
            .filter(manual_prs::Column::UserId.eq(user_id))
            .order_by_asc(manual_prs::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list manual records")?;

        Ok(rows.into_iter().map(ManualRecord::from).collect())
    }

    pub async fn get(&self, user_id: i32, exercise: &str) -> Result<Option<ManualRecord>> {
        Ok(self
            .find_row(user_id, exercise)
            .await?
            .map(ManualRecord::from))
    }

    /// Writes the manual record for an exercise, replacing any previous value.
    pub async fn upsert(
        &self,
        user_id: i32,
        exercise: &str,
        weight: f64,
        reps: u32,
    ) -> Result<ManualRecord> {
        let now = chrono::Utc::now().to_rfc3339();
        let reps = i32::try_from(reps).unwrap_or(i32::MAX);

        let model = if let Some(existing) = self.find_row(user_id, exercise).await? {
            let mut active: manual_prs::ActiveModel = existing.into();
            active.weight = Set(weight);
            active.reps = Set(reps);
            active.updated_at = Set(now);
            active.update(&self.conn).await?
        } else {
            manual_prs::ActiveModel {
                user_id: Set(user_id),
                exercise: Set(exercise.trim().to_string()),
                weight: Set(weight),
                reps: Set(reps),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&self.conn)
            .await
            .context("Failed to insert manual record")?
        };

        Ok(ManualRecord::from(model))
    }

    /// Returns false when there was nothing to delete.
    pub async fn delete(&self, user_id: i32, exercise: &str) -> Result<bool> {
        let Some(row) = self.find_row(user_id, exercise).await? else {
            return Ok(false);
        };

        let result = ManualPrs::delete_by_id(row.id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}
