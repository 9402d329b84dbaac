//! Domain service for the daily log store.
//!
//! A log is always written as a whole: the stored workouts and meals mirror
//! exactly the last payload submitted for that day.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::UserId;
use crate::models::{DailyLogSnapshot, History, MealEntry};
use crate::nutrition;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for LogError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for LogError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait LogService: Send + Sync {
    /// Logs dated on or after `since`, defaulting to the configured trailing window.
    async fn get_history(
        &self,
        user: UserId,
        since: Option<NaiveDate>,
    ) -> Result<History, LogError>;

    async fn get_log(
        &self,
        user: UserId,
        date: NaiveDate,
    ) -> Result<Option<DailyLogSnapshot>, LogError>;

    /// Replaces the stored log for `log.date`. Meals without calories are
    /// estimated from the food table first.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Validation`] for blank names or invalid quantities.
    async fn upsert_log(
        &self,
        user: UserId,
        log: DailyLogSnapshot,
    ) -> Result<DailyLogSnapshot, LogError>;
}

pub fn validate_log(log: &DailyLogSnapshot) -> Result<(), LogError> {
    for (i, workout) in log.workouts.iter().enumerate() {
        if workout.exercise_name.trim().is_empty() {
            return Err(LogError::Validation(format!(
                "Workout {} is missing an exercise name",
                i + 1
            )));
        }
        let weights = workout
            .sets
            .iter()
            .filter_map(|s| s.weight)
            .chain(workout.legacy.and_then(|l| l.weight));
        for weight in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(LogError::Validation(format!(
                    "Workout '{}' has an invalid weight",
                    workout.exercise_name
                )));
            }
        }
    }

    for (i, meal) in log.meals.iter().enumerate() {
        if meal.food_name.trim().is_empty() {
            return Err(LogError::Validation(format!(
                "Meal {} is missing a food name",
                i + 1
            )));
        }
        if !meal.quantity.is_finite() || meal.quantity < 0.0 {
            return Err(LogError::Validation(format!(
                "Meal '{}' has an invalid quantity",
                meal.food_name
            )));
        }
    }

    Ok(())
}

/// Fills in calories the client did not resolve itself.
pub fn resolve_meal_calories(meal: &mut MealEntry) {
    if meal.calories.is_none() {
        meal.calories = Some(nutrition::resolve_calories(
            &meal.food_name,
            meal.quantity,
            meal.unit,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{WorkoutEntry, WorkoutSet};
    use crate::nutrition::BaseUnit;

    fn meal(name: &str, quantity: f64, calories: Option<u32>) -> MealEntry {
        MealEntry {
            client_id: None,
            meal_type: Some("breakfast".to_string()),
            food_name: name.to_string(),
            quantity,
            unit: BaseUnit::PerUnit,
            calories,
            completed: true,
        }
    }

    fn log() -> DailyLogSnapshot {
        DailyLogSnapshot::empty(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    }

    #[test]
    fn test_missing_calories_are_resolved() {
        let mut m = meal("Banana", 1.0, None);
        resolve_meal_calories(&mut m);
        assert_eq!(m.calories, Some(89));

        // Resolving again leaves the value alone.
        resolve_meal_calories(&mut m);
        assert_eq!(m.calories, Some(89));
    }

    #[test]
    fn test_client_calories_are_kept() {
        let mut m = meal("Banana", 1.0, Some(120));
        resolve_meal_calories(&mut m);
        assert_eq!(m.calories, Some(120));
    }

    #[test]
    fn test_validation() {
        let mut l = log();
        l.meals.push(meal("  ", 1.0, None));
        assert!(matches!(validate_log(&l), Err(LogError::Validation(_))));

        let mut l = log();
        l.meals.push(meal("Banana", f64::NAN, None));
        assert!(validate_log(&l).is_err());

        let mut l = log();
        l.workouts.push(WorkoutEntry {
            client_id: None,
            exercise_name: "Squat".to_string(),
            sets: vec![WorkoutSet {
                weight: Some(-5.0),
                reps: Some(5),
            }],
            legacy: None,
            category: None,
            completed: false,
        });
        assert!(validate_log(&l).is_err());

        assert!(validate_log(&log()).is_ok());
    }
}
