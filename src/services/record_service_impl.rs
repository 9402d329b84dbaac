use async_trait::async_trait;
use tracing::info;

use crate::db::Store;
use crate::domain::UserId;
use crate::services::record_service::{RecordBoard, RecordError, RecordService, SavedRecord};
use crate::stats::{PersonalRecord, best_record, find_manual, is_new_record};

pub struct SeaOrmRecordService {
    store: Store,
    tracked_exercises: Vec<String>,
}

impl SeaOrmRecordService {
    #[must_use]
    pub const fn new(store: Store, tracked_exercises: Vec<String>) -> Self {
        Self {
            store,
            tracked_exercises,
        }
    }
}

fn normalize_exercise(exercise: &str) -> Result<&str, RecordError> {
    let exercise = exercise.trim();
    if exercise.is_empty() {
        return Err(RecordError::Validation(
            "Exercise name is required".to_string(),
        ));
    }
    Ok(exercise)
}

#[async_trait]
impl RecordService for SeaOrmRecordService {
    async fn list_records(&self, user: UserId) -> Result<RecordBoard, RecordError> {
        let history = self.store.get_history(user.value(), None).await?;
        let manual = self.store.list_manual_records(user.value()).await?;

        let mut exercises: Vec<&str> = self.tracked_exercises.iter().map(String::as_str).collect();
        for record in &manual {
            if !exercises
                .iter()
                .any(|e| e.eq_ignore_ascii_case(record.exercise.trim()))
            {
                exercises.push(record.exercise.trim());
            }
        }

        let board = exercises
            .into_iter()
            .filter_map(|exercise| {
                best_record(exercise, &history, find_manual(&manual, exercise))
                    .map(|record| (exercise.to_string(), record))
            })
            .collect();

        Ok(board)
    }

    async fn get_record(
        &self,
        user: UserId,
        exercise: &str,
    ) -> Result<Option<PersonalRecord>, RecordError> {
        let exercise = normalize_exercise(exercise)?;
        let history = self.store.get_history(user.value(), None).await?;
        let manual = self.store.get_manual_record(user.value(), exercise).await?;

        Ok(best_record(exercise, &history, manual.as_ref()))
    }

    async fn record_manual_pr(
        &self,
        user: UserId,
        exercise: &str,
        weight: f64,
        reps: u32,
    ) -> Result<SavedRecord, RecordError> {
        let exercise = normalize_exercise(exercise)?;
        if !weight.is_finite() || weight <= 0.0 {
            return Err(RecordError::Validation(
                "Weight must be a positive number".to_string(),
            ));
        }

        let current = self.get_record(user, exercise).await?;
        if !is_new_record(weight, current.as_ref()) {
            return Err(match current {
                Some(current) => RecordError::NotARecord { weight, current },
                None => RecordError::Validation("Weight must be a positive number".to_string()),
            });
        }

        let saved = self
            .store
            .upsert_manual_record(user.value(), exercise, weight, reps)
            .await?;

        info!(
            event = "manual_record_saved",
            user_id = %user,
            exercise = %saved.exercise,
            weight,
            reps,
            "New personal record"
        );

        Ok(SavedRecord {
            exercise: saved.exercise.clone(),
            record: PersonalRecord::from(&saved),
            previous: current,
        })
    }

    async fn delete_pr(&self, user: UserId, exercise: &str) -> Result<(), RecordError> {
        let exercise = normalize_exercise(exercise)?;
        if self
            .store
            .delete_manual_record(user.value(), exercise)
            .await?
        {
            Ok(())
        } else {
            Err(RecordError::NotFound(exercise.to_string()))
        }
    }
}
