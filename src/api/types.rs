use serde::{Deserialize, Serialize};

use crate::clients::ChatMessage;
use crate::db::{FeedbackEntry, WeightEntry};
use crate::models::{DailyLogSnapshot, LegacySets, MealEntry, WorkoutEntry, WorkoutSet};
use crate::nutrition::BaseUnit;
use crate::stats::PersonalRecord;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Daily logs
// ============================================================================

/// `sets` is either a list of structured sets or, from older clients, a plain
/// set count accompanied by flat `reps`/`weight` fields.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SetsPayload {
    List(Vec<WorkoutSet>),
    Count(u32),
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkoutPayload {
    #[serde(default, alias = "id")]
    pub client_id: Option<String>,
    #[serde(alias = "name")]
    pub exercise_name: String,
    #[serde(default)]
    pub sets: Option<SetsPayload>,
    #[serde(default)]
    pub reps: Option<u32>,
    #[serde(default)]
    pub weight: Option<f64>,
    /// Legacy fields as the server returns them. Takes precedence over the
    /// top-level `sets`/`reps`/`weight` so a log can be saved back unchanged.
    #[serde(default)]
    pub legacy: Option<LegacySets>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl From<WorkoutPayload> for WorkoutEntry {
    fn from(payload: WorkoutPayload) -> Self {
        let flat = (payload.reps.is_some() || payload.weight.is_some()).then_some(LegacySets {
            sets: None,
            reps: payload.reps,
            weight: payload.weight,
        });

        let (sets, legacy) = match payload.sets {
            Some(SetsPayload::List(sets)) => (sets, flat),
            Some(SetsPayload::Count(count)) => (
                Vec::new(),
                Some(LegacySets {
                    sets: Some(count),
                    reps: payload.reps,
                    weight: payload.weight,
                }),
            ),
            None => (Vec::new(), flat),
        };

        let explicit = payload
            .legacy
            .filter(|l| l.sets.is_some() || l.reps.is_some() || l.weight.is_some());

        Self {
            client_id: payload.client_id,
            exercise_name: payload.exercise_name.trim().to_string(),
            sets,
            legacy: explicit.or(legacy),
            category: payload.category,
            completed: payload.completed,
        }
    }
}

const fn default_quantity() -> f64 {
    1.0
}

const fn default_unit() -> BaseUnit {
    BaseUnit::PerUnit
}

#[derive(Debug, Clone, Deserialize)]
pub struct MealPayload {
    #[serde(default, alias = "id")]
    pub client_id: Option<String>,
    #[serde(default, alias = "type")]
    pub meal_type: Option<String>,
    #[serde(alias = "name")]
    pub food_name: String,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    #[serde(default = "default_unit")]
    pub unit: BaseUnit,
    #[serde(default)]
    pub calories: Option<u32>,
    #[serde(default)]
    pub completed: bool,
}

impl From<MealPayload> for MealEntry {
    fn from(payload: MealPayload) -> Self {
        Self {
            client_id: payload.client_id,
            meal_type: payload.meal_type,
            food_name: payload.food_name.trim().to_string(),
            quantity: payload.quantity,
            unit: payload.unit,
            calories: payload.calories,
            completed: payload.completed,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogRequest {
    pub date: String,
    #[serde(default)]
    pub gym_visited: Option<bool>,
    #[serde(default)]
    pub workouts: Vec<WorkoutPayload>,
    #[serde(default)]
    pub meals: Vec<MealPayload>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub since: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DailyLogDto {
    #[serde(flatten)]
    pub log: DailyLogSnapshot,
    pub total_calories: u32,
}

impl From<DailyLogSnapshot> for DailyLogDto {
    fn from(log: DailyLogSnapshot) -> Self {
        Self {
            total_calories: log.total_calories(),
            log,
        }
    }
}

// ============================================================================
// Weight, records
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct WeightRequest {
    pub date: String,
    pub weight: f64,
}

#[derive(Debug, Serialize)]
pub struct WeightDto {
    pub id: i32,
    pub date: String,
    pub weight: f64,
}

impl From<WeightEntry> for WeightDto {
    fn from(entry: WeightEntry) -> Self {
        Self {
            id: entry.id,
            date: crate::domain::format_date(entry.date),
            weight: entry.weight,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RecordRequest {
    pub exercise: String,
    pub weight: f64,
    #[serde(default)]
    pub reps: u32,
}

#[derive(Debug, Serialize)]
pub struct RecordRejection {
    pub exercise: String,
    pub current: PersonalRecord,
}

// ============================================================================
// Stats
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ConsistencyQuery {
    #[serde(default)]
    pub range: crate::stats::ConsistencyRange,
}

// ============================================================================
// Foods
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct FoodSearchQuery {
    #[serde(default)]
    pub q: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    #[serde(default = "default_unit")]
    pub unit: BaseUnit,
}

#[derive(Debug, Serialize)]
pub struct ResolvedCalories {
    pub name: String,
    pub quantity: f64,
    pub unit: BaseUnit,
    pub calories: u32,
    pub matched: Option<String>,
    pub match_kind: Option<crate::nutrition::MatchKind>,
}

// ============================================================================
// Feedback, coach, room
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    #[serde(default)]
    pub category: String,
    pub message: String,
    pub rating: i32,
}

#[derive(Debug, Serialize)]
pub struct FeedbackDto {
    pub id: i32,
    pub category: String,
    pub message: String,
    pub rating: i32,
    pub created_at: String,
}

impl From<FeedbackEntry> for FeedbackDto {
    fn from(entry: FeedbackEntry) -> Self {
        Self {
            id: entry.id,
            category: entry.category,
            message: entry.message,
            rating: entry.rating,
            created_at: entry.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FeedbackListQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct CoachRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
pub struct RoomMessagesQuery {
    pub limit: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_structured_sets() {
        let payload: WorkoutPayload = serde_json::from_value(json!({
            "exercise_name": "Bench Press",
            "sets": [{"weight": 80.0, "reps": 5}, {"weight": 85.0, "reps": 3}],
            "completed": true
        }))
        .unwrap();

        let entry = WorkoutEntry::from(payload);
        assert_eq!(entry.sets.len(), 2);
        assert_eq!(entry.legacy, None);
    }

    #[test]
    fn test_legacy_set_count() {
        let payload: WorkoutPayload = serde_json::from_value(json!({
            "name": "Squat",
            "sets": 3,
            "reps": 5,
            "weight": 100.0
        }))
        .unwrap();
        assert_eq!(payload.sets, Some(SetsPayload::Count(3)));

        let entry = WorkoutEntry::from(payload);
        assert!(entry.sets.is_empty());
        assert_eq!(
            entry.legacy,
            Some(LegacySets {
                sets: Some(3),
                reps: Some(5),
                weight: Some(100.0)
            })
        );
        assert!(!entry.completed);
    }

    #[test]
    fn test_returned_legacy_shape_is_accepted() {
        let payload: WorkoutPayload = serde_json::from_value(json!({
            "exercise_name": "Squat",
            "sets": [],
            "legacy": {"sets": 3, "reps": 5, "weight": 140.0},
            "reps": 1,
            "completed": true
        }))
        .unwrap();

        let entry = WorkoutEntry::from(payload);
        assert!(entry.sets.is_empty());
        assert_eq!(
            entry.legacy,
            Some(LegacySets {
                sets: Some(3),
                reps: Some(5),
                weight: Some(140.0)
            })
        );

        let empty: WorkoutPayload = serde_json::from_value(json!({
            "name": "Plank",
            "legacy": {"sets": null, "reps": null, "weight": null}
        }))
        .unwrap();
        assert_eq!(WorkoutEntry::from(empty).legacy, None);
    }

    #[test]
    fn test_meal_defaults() {
        let payload: MealPayload =
            serde_json::from_value(json!({"food_name": " Banana ", "completed": true})).unwrap();
        let meal = MealEntry::from(payload);
        assert_eq!(meal.food_name, "Banana");
        assert!((meal.quantity - 1.0).abs() < f64::EPSILON);
        assert_eq!(meal.unit, BaseUnit::PerUnit);
        assert_eq!(meal.calories, None);

        let payload: MealPayload =
            serde_json::from_value(json!({"name": "Rice", "quantity": 150, "unit": "100g"}))
                .unwrap();
        assert_eq!(payload.unit, BaseUnit::Per100g);
    }
}
