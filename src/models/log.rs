use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::nutrition::BaseUnit;

/// One user's logs keyed by calendar date, oldest first.
pub type History = BTreeMap<NaiveDate, DailyLogSnapshot>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSet {
    pub weight: Option<f64>,
    pub reps: Option<u32>,
}

/// Flat `{sets, reps, weight}` shape written by older clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacySets {
    pub sets: Option<u32>,
    pub reps: Option<u32>,
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutEntry {
    /// Opaque correlation id chosen by the client.
    pub client_id: Option<String>,
    pub exercise_name: String,
    pub sets: Vec<WorkoutSet>,
    pub legacy: Option<LegacySets>,
    pub category: Option<String>,
    pub completed: bool,
}

impl WorkoutEntry {
    /// Heaviest weighted set and the reps performed with it. Structured sets take
    /// precedence over the legacy fields; the first set wins on equal weight.
    #[must_use]
    pub fn top_set(&self) -> Option<WorkoutSet> {
        let best = self
            .sets
            .iter()
            .filter(|s| s.weight.is_some_and(f64::is_finite))
            .fold(None::<WorkoutSet>, |best, set| match best {
                Some(b) if b.weight >= set.weight => Some(b),
                _ => Some(*set),
            });

        best.or_else(|| {
            self.legacy
                .filter(|l| l.weight.is_some_and(f64::is_finite))
                .map(|l| WorkoutSet {
                    weight: l.weight,
                    reps: l.reps,
                })
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealEntry {
    pub client_id: Option<String>,
    pub meal_type: Option<String>,
    pub food_name: String,
    pub quantity: f64,
    pub unit: BaseUnit,
    pub calories: Option<u32>,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLogSnapshot {
    pub date: NaiveDate,
    pub gym_visited: Option<bool>,
    pub workouts: Vec<WorkoutEntry>,
    pub meals: Vec<MealEntry>,
}

impl DailyLogSnapshot {
    #[must_use]
    pub const fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            gym_visited: None,
            workouts: Vec::new(),
            meals: Vec::new(),
        }
    }

    #[must_use]
    pub fn visited(&self) -> bool {
        self.gym_visited == Some(true)
    }

    #[must_use]
    pub fn completed_meals(&self) -> usize {
        self.meals.iter().filter(|m| m.completed).count()
    }

    #[must_use]
    pub fn completed_workouts(&self) -> usize {
        self.workouts.iter().filter(|w| w.completed).count()
    }

    #[must_use]
    pub fn total_calories(&self) -> u32 {
        self.meals.iter().filter_map(|m| m.calories).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(sets: Vec<WorkoutSet>, legacy: Option<LegacySets>) -> WorkoutEntry {
        WorkoutEntry {
            client_id: None,
            exercise_name: "Bench Press".to_string(),
            sets,
            legacy,
            category: None,
            completed: true,
        }
    }

    #[test]
    fn test_top_set_takes_reps_from_heaviest_set() {
        let e = entry(
            vec![
                WorkoutSet {
                    weight: Some(80.0),
                    reps: Some(10),
                },
                WorkoutSet {
                    weight: Some(100.0),
                    reps: Some(3),
                },
                WorkoutSet {
                    weight: None,
                    reps: Some(20),
                },
            ],
            None,
        );

        let top = e.top_set().unwrap();
        assert_eq!(top.weight, Some(100.0));
        assert_eq!(top.reps, Some(3));
    }

    #[test]
    fn test_top_set_falls_back_to_legacy_fields() {
        let e = entry(
            vec![],
            Some(LegacySets {
                sets: Some(3),
                reps: Some(8),
                weight: Some(60.0),
            }),
        );
        assert_eq!(
            e.top_set(),
            Some(WorkoutSet {
                weight: Some(60.0),
                reps: Some(8)
            })
        );

        assert_eq!(entry(vec![], None).top_set(), None);
    }
}
