use anyhow::{Context, Result};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, LoaderTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::collections::BTreeMap;

use crate::domain::{format_date, parse_date};
use crate::entities::{daily_logs, meal_entries, prelude::*, workout_entries};
use crate::models::{DailyLogSnapshot, History, LegacySets, MealEntry, WorkoutEntry, WorkoutSet};

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn to_u32(value: i32) -> Option<u32> {
    u32::try_from(value).ok()
}

fn position(index: usize) -> i32 {
    i32::try_from(index).unwrap_or(i32::MAX)
}

fn workout_row(
    daily_log_id: i32,
    index: usize,
    entry: &WorkoutEntry,
) -> Result<workout_entries::ActiveModel> {
    let legacy = entry.legacy.unwrap_or_default();

    Ok(workout_entries::ActiveModel {
        daily_log_id: Set(daily_log_id),
        position: Set(position(index)),
        client_id: Set(entry.client_id.clone()),
        exercise_name: Set(entry.exercise_name.clone()),
        sets: Set(serde_json::to_string(&entry.sets).context("Failed to encode workout sets")?),
        legacy_sets: Set(legacy.sets.map(to_i32)),
        legacy_reps: Set(legacy.reps.map(to_i32)),
        legacy_weight: Set(legacy.weight),
        category: Set(entry.category.clone()),
        completed: Set(entry.completed),
        ..Default::default()
    })
}

fn meal_row(daily_log_id: i32, index: usize, entry: &MealEntry) -> meal_entries::ActiveModel {
    meal_entries::ActiveModel {
        daily_log_id: Set(daily_log_id),
        position: Set(position(index)),
        client_id: Set(entry.client_id.clone()),
        meal_type: Set(entry.meal_type.clone()),
        food_name: Set(entry.food_name.clone()),
        quantity: Set(entry.quantity),
        unit: Set(entry.unit.as_str().to_string()),
        calories: Set(entry.calories.map(to_i32)),
        completed: Set(entry.completed),
        ..Default::default()
    }
}

fn workout_from_row(row: workout_entries::Model) -> Result<WorkoutEntry> {
    let sets: Vec<WorkoutSet> = serde_json::from_str(&row.sets)
        .with_context(|| format!("Corrupt sets in workout entry {}", row.id))?;

    let legacy = LegacySets {
        sets: row.legacy_sets.and_then(to_u32),
        reps: row.legacy_reps.and_then(to_u32),
        weight: row.legacy_weight,
    };
    let has_legacy = legacy.sets.is_some() || legacy.reps.is_some() || legacy.weight.is_some();

    Ok(WorkoutEntry {
        client_id: row.client_id,
        exercise_name: row.exercise_name,
        sets,
        legacy: has_legacy.then_some(legacy),
        category: row.category,
        completed: row.completed,
    })
}

fn meal_from_row(row: meal_entries::Model) -> Result<MealEntry> {
    let unit = row
        .unit
        .parse()
        .map_err(|e: String| anyhow::anyhow!("Corrupt unit in meal entry {}: {e}", row.id))?;

    Ok(MealEntry {
        client_id: row.client_id,
        meal_type: row.meal_type,
        food_name: row.food_name,
        quantity: row.quantity,
        unit,
        calories: row.calories.and_then(to_u32),
        completed: row.completed,
    })
}

fn snapshot(
    log: daily_logs::Model,
    mut workouts: Vec<workout_entries::Model>,
    mut meals: Vec<meal_entries::Model>,
) -> Result<DailyLogSnapshot> {
    let date = parse_date(&log.date)
        .with_context(|| format!("Corrupt date '{}' in daily log {}", log.date, log.id))?;

    workouts.sort_by_key(|w| (w.position, w.id));
    meals.sort_by_key(|m| (m.position, m.id));

    Ok(DailyLogSnapshot {
        date,
        gym_visited: log.gym_visited,
        workouts: workouts
            .into_iter()
            .map(workout_from_row)
            .collect::<Result<_>>()?,
        meals: meals.into_iter().map(meal_from_row).collect::<Result<_>>()?,
    })
}

pub struct DailyLogRepository {
    conn: DatabaseConnection,
}

impl DailyLogRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Replaces the user's log for `log.date` with `log`.
    ///
    /// The row is found or created, `gym_visited` is overwritten, and every
    /// linked workout and meal row is deleted and re-inserted from the payload.
    /// All of it happens in one transaction, so readers never observe the
    /// emptied sub-lists. Entry row ids change on every call.
    pub async fn replace(&self, user_id: i32, log: &DailyLogSnapshot) -> Result<DailyLogSnapshot> {
        let date = format_date(log.date);
        let now = chrono::Utc::now().to_rfc3339();

        let txn = self.conn.begin().await?;

        let existing = DailyLogs::find()
            .filter(daily_logs::Column::UserId.eq(user_id))
            .filter(daily_logs::Column::Date.eq(date.clone()))
            .one(&txn)
            .await
            .context("Failed to query daily log")?;

        let row = if let Some(existing) = existing {
            let mut active: daily_logs::ActiveModel = existing.into();
            active.gym_visited = Set(log.gym_visited);
            active.updated_at = Set(now);
            active.update(&txn).await?
        } else {
            daily_logs::ActiveModel {
                user_id: Set(user_id),
                date: Set(date),
                gym_visited: Set(log.gym_visited),
                created_at: Set(now.clone()),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .context("Failed to insert daily log")?
        };

        WorkoutEntries::delete_many()
            .filter(workout_entries::Column::DailyLogId.eq(row.id))
            .exec(&txn)
            .await?;
        MealEntries::delete_many()
            .filter(meal_entries::Column::DailyLogId.eq(row.id))
            .exec(&txn)
            .await?;

        if !log.workouts.is_empty() {
            let rows = log
                .workouts
                .iter()
                .enumerate()
                .map(|(i, w)| workout_row(row.id, i, w))
                .collect::<Result<Vec<_>>>()?;
            WorkoutEntries::insert_many(rows).exec(&txn).await?;
        }

        if !log.meals.is_empty() {
            let rows: Vec<_> = log
                .meals
                .iter()
                .enumerate()
                .map(|(i, m)| meal_row(row.id, i, m))
                .collect();
            MealEntries::insert_many(rows).exec(&txn).await?;
        }

        let stored = load_one(&txn, row).await?;
        txn.commit().await?;

        Ok(stored)
    }

    pub async fn get(&self, user_id: i32, date: NaiveDate) -> Result<Option<DailyLogSnapshot>> {
        let row = DailyLogs::find()
            .filter(daily_logs::Column::UserId.eq(user_id))
            .filter(daily_logs::Column::Date.eq(format_date(date)))
            .one(&self.conn)
            .await
            .context("Failed to query daily log")?;

        match row {
            Some(row) => Ok(Some(load_one(&self.conn, row).await?)),
            None => Ok(None),
        }
    }

    /// Logs dated on or after `since`; every log when `since` is `None`.
    pub async fn history(&self, user_id: i32, since: Option<NaiveDate>) -> Result<History> {
        let mut query = DailyLogs::find().filter(daily_logs::Column::UserId.eq(user_id));
        if let Some(since) = since {
            query = query.filter(daily_logs::Column::Date.gte(format_date(since)));
        }

        let rows = query
            .order_by_asc(daily_logs::Column::Date)
            .all(&self.conn)
            .await
            .context("Failed to query history")?;

        let logs = load_many(&self.conn, rows).await?;
        Ok(logs.into_iter().map(|l| (l.date, l)).collect())
    }

    /// Every user's complete history keyed by user id.
    pub async fn all_by_user(&self) -> Result<BTreeMap<i32, History>> {
        let rows = DailyLogs::find()
            .order_by_asc(daily_logs::Column::UserId)
            .order_by_asc(daily_logs::Column::Date)
            .all(&self.conn)
            .await
            .context("Failed to query all daily logs")?;

        let owners: Vec<i32> = rows.iter().map(|r| r.user_id).collect();
        let logs = load_many(&self.conn, rows).await?;

        let mut grouped: BTreeMap<i32, History> = BTreeMap::new();
        for (user_id, log) in owners.into_iter().zip(logs) {
            grouped.entry(user_id).or_default().insert(log.date, log);
        }

        Ok(grouped)
    }
}

async fn load_one<C: ConnectionTrait>(conn: &C, row: daily_logs::Model) -> Result<DailyLogSnapshot> {
    let workouts = WorkoutEntries::find()
        .filter(workout_entries::Column::DailyLogId.eq(row.id))
        .all(conn)
        .await?;
    let meals = MealEntries::find()
        .filter(meal_entries::Column::DailyLogId.eq(row.id))
        .all(conn)
        .await?;

    snapshot(row, workouts, meals)
}

async fn load_many<C: ConnectionTrait>(
    conn: &C,
    rows: Vec<daily_logs::Model>,
) -> Result<Vec<DailyLogSnapshot>> {
    let workouts = rows.load_many(WorkoutEntries, conn).await?;
    let meals = rows.load_many(MealEntries, conn).await?;

    rows.into_iter()
        .zip(workouts)
        .zip(meals)
        .map(|((row, w), m)| snapshot(row, w, m))
        .collect()
}
