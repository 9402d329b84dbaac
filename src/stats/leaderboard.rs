use serde::Serialize;

use crate::config::LeaderboardConfig;
use crate::models::History;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringRules {
    pub top_n: usize,
    pub diet_meal_threshold: usize,
    pub workout_entry_threshold: usize,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self::from(&LeaderboardConfig::default())
    }
}

impl From<&LeaderboardConfig> for ScoringRules {
    fn from(config: &LeaderboardConfig) -> Self {
        Self {
            top_n: config.top_n,
            diet_meal_threshold: config.diet_meal_threshold,
            workout_entry_threshold: config.workout_entry_threshold,
        }
    }
}

/// A user together with every log they have, in source order.
#[derive(Debug, Clone)]
pub struct UserLogs {
    pub user_id: i32,
    pub username: String,
    pub avatar: Option<String>,
    pub logs: History,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Scores {
    pub gym_score: u32,
    pub diet_score: u32,
    pub workout_score: u32,
    pub total_score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    /// 1-based position in the full sorted list.
    pub rank: usize,
    pub user_id: i32,
    pub username: String,
    pub avatar: Option<String>,
    #[serde(flatten)]
    pub scores: Scores,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
    pub requester: Option<LeaderboardEntry>,
    pub total_users: usize,
}

/// Counts are per day: one day contributes at most one point to each sub-score.
#[must_use]
pub fn score_logs(logs: &History, rules: &ScoringRules) -> Scores {
    let mut scores = Scores::default();

    // History is keyed by date, so every iteration step is a distinct day.
    for log in logs.values() {
        if log.visited() {
            scores.gym_score += 1;
        }
        if log.completed_meals() >= rules.diet_meal_threshold {
            scores.diet_score += 1;
        }
        if log.completed_workouts() >= rules.workout_entry_threshold {
            scores.workout_score += 1;
        }
    }

    scores.total_score = scores.gym_score + scores.diet_score + scores.workout_score;
    scores
}

/// Ranks `users` by total score, highest first. Equal totals keep the order the
/// users were supplied in.
#[must_use]
pub fn compute_leaderboard(
    users: &[UserLogs],
    requester: Option<i32>,
    rules: &ScoringRules,
) -> Leaderboard {
    let mut ranked: Vec<(&UserLogs, Scores)> = users
        .iter()
        .map(|u| (u, score_logs(&u.logs, rules)))
        .collect();

    // `sort_by` is stable.
    ranked.sort_by(|a, b| b.1.total_score.cmp(&a.1.total_score));

    let entry = |index: usize, (user, scores): &(&UserLogs, Scores)| LeaderboardEntry {
        rank: index + 1,
        user_id: user.user_id,
        username: user.username.clone(),
        avatar: user.avatar.clone(),
        scores: *scores,
    };

    let requester = requester.and_then(|id| {
        ranked
            .iter()
            .position(|(u, _)| u.user_id == id)
            .map(|index| entry(index, &ranked[index]))
    });

    let entries = ranked
        .iter()
        .take(rules.top_n)
        .enumerate()
        .map(|(index, row)| entry(index, row))
        .collect();

    Leaderboard {
        entries,
        requester,
        total_users: ranked.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyLogSnapshot, MealEntry, WorkoutEntry};
    use crate::nutrition::BaseUnit;
    use chrono::{Days, NaiveDate};

    fn day(offset: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .checked_add_days(Days::new(offset))
            .unwrap()
    }

    fn meal(completed: bool) -> MealEntry {
        MealEntry {
            client_id: None,
            meal_type: None,
            food_name: "Oats".to_string(),
            quantity: 50.0,
            unit: BaseUnit::Per100g,
            calories: Some(195),
            completed,
        }
    }

    fn workout(completed: bool) -> WorkoutEntry {
        WorkoutEntry {
            client_id: None,
            exercise_name: "Squat".to_string(),
            sets: vec![],
            legacy: None,
            category: None,
            completed,
        }
    }

    fn log(offset: u64, visited: bool, meals: usize, workouts: usize) -> DailyLogSnapshot {
        DailyLogSnapshot {
            date: day(offset),
            gym_visited: Some(visited),
            workouts: (0..workouts).map(|_| workout(true)).collect(),
            meals: (0..meals).map(|_| meal(true)).collect(),
        }
    }

    fn user(user_id: i32, logs: Vec<DailyLogSnapshot>) -> UserLogs {
        UserLogs {
            user_id,
            username: format!("user{user_id}"),
            avatar: None,
            logs: logs.into_iter().map(|l| (l.date, l)).collect(),
        }
    }

    /// User `i` has visited the gym on `i` distinct days.
    fn synthetic_users(count: i32) -> Vec<UserLogs> {
        (1..=count)
            .map(|id| {
                let logs = (0..u64::try_from(id).unwrap())
                    .map(|d| log(d, true, 0, 0))
                    .collect();
                user(id, logs)
            })
            .collect()
    }

    #[test]
    fn test_diet_counts_day_once() {
        let rules = ScoringRules::default();
        let scores = score_logs(&user(1, vec![log(0, false, 10, 0)]).logs, &rules);
        assert_eq!(scores.diet_score, 1);
        assert_eq!(scores.total_score, 1);
    }

    #[test]
    fn test_thresholds_only_count_completed_entries() {
        let rules = ScoringRules::default();
        let mut day_log = log(0, true, 2, 3);
        day_log.meals.push(meal(false));
        day_log.workouts.push(workout(false));

        let scores = score_logs(&user(1, vec![day_log]).logs, &rules);
        assert_eq!(scores.gym_score, 1);
        assert_eq!(scores.diet_score, 0);
        assert_eq!(scores.workout_score, 0);

        let scores = score_logs(&user(1, vec![log(0, true, 3, 4)]).logs, &rules);
        assert_eq!(scores.diet_score, 1);
        assert_eq!(scores.workout_score, 1);
        assert_eq!(scores.total_score, 3);
    }

    #[test]
    fn test_total_is_sum_of_sub_scores() {
        let rules = ScoringRules::default();
        for seed in 0..50_u64 {
            let logs: Vec<_> = (0..seed % 9)
                .map(|d| {
                    let n = usize::try_from((seed + d) % 6).unwrap();
                    log(d, (seed + d) % 2 == 0, n, n)
                })
                .collect();
            let s = score_logs(&user(1, logs).logs, &rules);
            assert_eq!(s.total_score, s.gym_score + s.diet_score + s.workout_score);
        }
    }

    #[test]
    fn test_requester_outside_top_n_still_ranked() {
        let users = synthetic_users(150);
        let board = compute_leaderboard(&users, Some(10), &ScoringRules::default());

        assert_eq!(board.total_users, 150);
        assert_eq!(board.entries.len(), 100);
        assert_eq!(board.entries[0].user_id, 150);
        assert_eq!(board.entries[99].user_id, 51);

        // Users 11..=150 score higher than user 10.
        let me = board.requester.unwrap();
        assert_eq!(me.user_id, 10);
        assert_eq!(me.rank, 141);
        assert_eq!(me.scores.gym_score, 10);
    }

    #[test]
    fn test_ties_keep_source_order() {
        let users = vec![
            user(3, vec![log(0, true, 0, 0)]),
            user(1, vec![log(0, true, 0, 0), log(1, true, 0, 0)]),
            user(2, vec![log(0, true, 0, 0)]),
            user(4, vec![log(0, false, 3, 0)]),
        ];
        let board = compute_leaderboard(&users, None, &ScoringRules::default());

        let order: Vec<i32> = board.entries.iter().map(|e| e.user_id).collect();
        assert_eq!(order, vec![1, 3, 2, 4]);
        let ranks: Vec<usize> = board.entries.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_unknown_requester() {
        let users = synthetic_users(3);
        let board = compute_leaderboard(&users, Some(99), &ScoringRules::default());
        assert!(board.requester.is_none());

        let board = compute_leaderboard(&[], Some(1), &ScoringRules::default());
        assert!(board.entries.is_empty());
        assert_eq!(board.total_users, 0);
    }
}
