use chrono::NaiveDate;
use serde::Serialize;

use crate::models::History;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSource {
    /// Entered explicitly by the user.
    Manual,
    /// Mined from logged workouts.
    History,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonalRecord {
    pub weight: f64,
    pub reps: Option<u32>,
    pub source: RecordSource,
    /// Day of the workout a mined record came from.
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ManualRecord {
    pub exercise: String,
    pub weight: f64,
    pub reps: u32,
}

impl From<&ManualRecord> for PersonalRecord {
    fn from(manual: &ManualRecord) -> Self {
        Self {
            weight: manual.weight,
            reps: Some(manual.reps),
            source: RecordSource::Manual,
            date: None,
        }
    }
}

/// Heaviest logged set of any workout whose name contains `exercise`, ignoring
/// case. The earliest occurrence wins when the same weight appears again.
#[must_use]
pub fn mine_best(exercise: &str, history: &History) -> Option<PersonalRecord> {
    let needle = exercise.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    let mut best: Option<PersonalRecord> = None;

    for (date, log) in history {
        for entry in &log.workouts {
            if !entry.exercise_name.to_lowercase().contains(&needle) {
                continue;
            }

            let Some(set) = entry.top_set() else {
                continue;
            };
            // Bodyweight sets are logged at 0 and still count.
            let Some(weight) = set.weight.filter(|w| *w >= 0.0) else {
                continue;
            };

            if best.as_ref().is_none_or(|b| weight > b.weight) {
                best = Some(PersonalRecord {
                    weight,
                    reps: set.reps,
                    source: RecordSource::History,
                    date: Some(*date),
                });
            }
        }
    }

    best
}

/// The better of the manual record and the mined one. Ties keep the manual record.
#[must_use]
pub fn best_record(
    exercise: &str,
    history: &History,
    manual: Option<&ManualRecord>,
) -> Option<PersonalRecord> {
    let manual = manual.map(PersonalRecord::from);
    let mined = mine_best(exercise, history);

    match (manual, mined) {
        (Some(m), Some(h)) if h.weight > m.weight => Some(h),
        (Some(m), _) => Some(m),
        (None, mined) => mined,
    }
}

/// Whether `weight` would beat the current best. Anything positive beats no record.
#[must_use]
pub fn is_new_record(weight: f64, current: Option<&PersonalRecord>) -> bool {
    weight.is_finite() && weight > 0.0 && current.is_none_or(|c| weight > c.weight)
}

/// Manual record for `exercise`, matched ignoring case and surrounding whitespace.
#[must_use]
pub fn find_manual<'a>(records: &'a [ManualRecord], exercise: &str) -> Option<&'a ManualRecord> {
    let wanted = exercise.trim();
    records
        .iter()
        .find(|r| r.exercise.trim().eq_ignore_ascii_case(wanted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyLogSnapshot, LegacySets, WorkoutEntry, WorkoutSet};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn workout(name: &str, weight: Option<f64>, reps: u32) -> WorkoutEntry {
        WorkoutEntry {
            client_id: None,
            exercise_name: name.to_string(),
            sets: vec![WorkoutSet {
                weight,
                reps: Some(reps),
            }],
            legacy: None,
            category: None,
            completed: true,
        }
    }

    fn history(days: Vec<(&str, Vec<WorkoutEntry>)>) -> History {
        days.into_iter()
            .map(|(d, workouts)| {
                let mut log = DailyLogSnapshot::empty(date(d));
                log.workouts = workouts;
                (log.date, log)
            })
            .collect()
    }

    fn manual(weight: f64, reps: u32) -> ManualRecord {
        ManualRecord {
            exercise: "Bench Press".to_string(),
            weight,
            reps,
        }
    }

    #[test]
    fn test_mining_uses_substring_and_ignores_case() {
        let h = history(vec![
            ("2024-01-01", vec![workout("Incline BENCH PRESS", Some(70.0), 8)]),
            ("2024-01-02", vec![workout("bench press", Some(90.0), 3)]),
            ("2024-01-03", vec![workout("Squat", Some(140.0), 5)]),
        ]);

        let best = mine_best("Bench Press", &h).unwrap();
        assert!((best.weight - 90.0).abs() < f64::EPSILON);
        assert_eq!(best.reps, Some(3));
        assert_eq!(best.source, RecordSource::History);
        assert_eq!(best.date, Some(date("2024-01-02")));
    }

    #[test]
    fn test_mining_skips_entries_without_weight() {
        let h = history(vec![(
            "2024-01-01",
            vec![
                workout("Bench Press", None, 20),
                WorkoutEntry {
                    legacy: Some(LegacySets {
                        sets: Some(3),
                        reps: Some(5),
                        weight: Some(60.0),
                    }),
                    sets: vec![],
                    ..workout("Bench Press", None, 0)
                },
            ],
        )]);

        let best = mine_best("bench", &h).unwrap();
        assert!((best.weight - 60.0).abs() < f64::EPSILON);
        assert_eq!(best.reps, Some(5));
    }

    #[test]
    fn test_bodyweight_sets_are_mined() {
        let h = history(vec![("2024-01-01", vec![workout("Pull Up", Some(0.0), 12)])]);

        let best = mine_best("pull up", &h).unwrap();
        assert!(best.weight.abs() < f64::EPSILON);
        assert_eq!(best.reps, Some(12));
    }

    #[test]
    fn test_earliest_occurrence_wins_ties() {
        let h = history(vec![
            ("2024-01-01", vec![workout("Deadlift", Some(180.0), 1)]),
            ("2024-02-01", vec![workout("Deadlift", Some(180.0), 2)]),
        ]);
        let best = mine_best("deadlift", &h).unwrap();
        assert_eq!(best.date, Some(date("2024-01-01")));
        assert_eq!(best.reps, Some(1));
    }

    #[test]
    fn test_higher_mined_value_beats_manual() {
        let h = history(vec![("2024-01-01", vec![workout("Bench Press", Some(105.0), 1)])]);
        let best = best_record("Bench Press", &h, Some(&manual(100.0, 2))).unwrap();
        assert_eq!(best.source, RecordSource::History);
        assert!((best.weight - 105.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tie_keeps_manual_record() {
        let h = history(vec![("2024-01-01", vec![workout("Bench Press", Some(100.0), 5)])]);
        let best = best_record("Bench Press", &h, Some(&manual(100.0, 2))).unwrap();
        assert_eq!(best.source, RecordSource::Manual);
        assert_eq!(best.reps, Some(2));
    }

    #[test]
    fn test_never_below_manual() {
        let m = manual(120.0, 1);
        for mined_weight in [0.0, 50.0, 119.9, 120.0] {
            let h = history(vec![(
                "2024-01-01",
                vec![workout("Bench Press", Some(mined_weight), 1)],
            )]);
            let best = best_record("Bench Press", &h, Some(&m)).unwrap();
            assert!(best.weight >= m.weight);
        }
    }

    #[test]
    fn test_no_data_means_no_record() {
        assert!(best_record("Bench Press", &History::new(), None).is_none());
        assert!(mine_best("   ", &History::new()).is_none());
    }

    #[test]
    fn test_is_new_record() {
        let current = PersonalRecord::from(&manual(100.0, 1));
        assert!(is_new_record(100.5, Some(&current)));
        assert!(!is_new_record(100.0, Some(&current)));
        assert!(!is_new_record(90.0, Some(&current)));
        assert!(is_new_record(20.0, None));
        assert!(!is_new_record(0.0, None));
    }

    #[test]
    fn test_find_manual_ignores_case() {
        let records = vec![manual(100.0, 1)];
        assert!(find_manual(&records, "  bench press ").is_some());
        assert!(find_manual(&records, "Squat").is_none());
    }
}
