use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::{DailyLogSnapshot, History};

fn visited_on(history: &History, day: NaiveDate) -> bool {
    history.get(&day).is_some_and(DailyLogSnapshot::visited)
}

/// Consecutive visited days ending today, or ending yesterday when today has no
/// recorded visit yet. The walk stops at the first day that is not a visit and
/// never goes past the earliest logged date.
#[must_use]
pub fn compute_streak(history: &History, today: NaiveDate) -> u32 {
    let Some(earliest) = history.keys().next().copied() else {
        return 0;
    };

    let start = if visited_on(history, today) {
        Some(today)
    } else {
        today.pred_opt()
    };

    let mut streak = 0;
    let mut cursor = start;

    while let Some(day) = cursor {
        if day < earliest || !visited_on(history, day) {
            break;
        }
        streak += 1;
        cursor = day.pred_opt();
    }

    streak
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsistencyRange {
    #[default]
    Week,
    Month,
    Year,
    All,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsistencyBucket {
    /// `YYYY-MM-DD` for daily buckets, `YYYY-MM` for months, `YYYY` for years.
    pub label: String,
    pub start: NaiveDate,
    pub visits: u32,
}

/// Visit counts bucketed over a trailing range, oldest bucket first.
#[must_use]
pub fn compute_consistency(
    history: &History,
    range: ConsistencyRange,
    today: NaiveDate,
) -> Vec<ConsistencyBucket> {
    match range {
        ConsistencyRange::Week => daily_buckets(history, today, 7),
        ConsistencyRange::Month => daily_buckets(history, today, 30),
        ConsistencyRange::Year => monthly_buckets(history, today),
        ConsistencyRange::All => yearly_buckets(history, today),
    }
}

fn daily_buckets(history: &History, today: NaiveDate, days: u64) -> Vec<ConsistencyBucket> {
    (0..days)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
        .map(|day| ConsistencyBucket {
            label: day.format("%Y-%m-%d").to_string(),
            start: day,
            visits: u32::from(visited_on(history, day)),
        })
        .collect()
}

fn count_visits(history: &History, belongs: impl Fn(NaiveDate) -> bool) -> u32 {
    let count = history
        .values()
        .filter(|log| log.visited() && belongs(log.date))
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

fn monthly_buckets(history: &History, today: NaiveDate) -> Vec<ConsistencyBucket> {
    let Some(this_month) = today.with_day(1) else {
        return Vec::new();
    };

    (0..12)
        .rev()
        .filter_map(|back| this_month.checked_sub_months(Months::new(back)))
        .map(|month| ConsistencyBucket {
            label: month.format("%Y-%m").to_string(),
            start: month,
            visits: count_visits(history, |d| {
                d.year() == month.year() && d.month() == month.month()
            }),
        })
        .collect()
}

fn yearly_buckets(history: &History, today: NaiveDate) -> Vec<ConsistencyBucket> {
    let mut years: BTreeSet<i32> = history.keys().map(Datelike::year).collect();
    years.insert(today.year());

    years
        .into_iter()
        .filter_map(|year| NaiveDate::from_ymd_opt(year, 1, 1))
        .map(|start| ConsistencyBucket {
            label: start.year().to_string(),
            start,
            visits: count_visits(history, |d| d.year() == start.year()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn history(days: &[(&str, Option<bool>)]) -> History {
        days.iter()
            .map(|(d, visited)| {
                let mut log = DailyLogSnapshot::empty(date(d));
                log.gym_visited = *visited;
                (log.date, log)
            })
            .collect()
    }

    #[test]
    fn test_gap_the_day_before_today_breaks_streak() {
        let h = history(&[
            ("2024-01-01", Some(true)),
            ("2024-01-02", Some(true)),
            ("2024-01-03", Some(true)),
            ("2024-01-04", Some(true)),
            ("2024-01-05", Some(true)),
        ]);

        // Today (01-07) is unset, so the walk starts at 01-06, which is absent.
        assert_eq!(compute_streak(&h, date("2024-01-07")), 0);
        // Seen from 01-06 the same data is a live five-day streak.
        assert_eq!(compute_streak(&h, date("2024-01-06")), 5);
    }

    #[test]
    fn test_unlogged_today_does_not_break_streak() {
        let h = history(&[
            ("2024-01-01", Some(true)),
            ("2024-01-02", Some(true)),
            ("2024-01-03", Some(true)),
            ("2024-01-04", Some(true)),
            ("2024-01-05", Some(true)),
            ("2024-01-06", Some(true)),
        ]);
        assert_eq!(compute_streak(&h, date("2024-01-07")), 6);
    }

    #[test]
    fn test_visit_today_counts() {
        let h = history(&[
            ("2024-01-05", Some(true)),
            ("2024-01-06", Some(true)),
            ("2024-01-07", Some(true)),
        ]);
        assert_eq!(compute_streak(&h, date("2024-01-07")), 3);
    }

    #[test]
    fn test_explicit_false_stops_walk() {
        let h = history(&[
            ("2024-01-03", Some(true)),
            ("2024-01-04", Some(false)),
            ("2024-01-05", Some(true)),
            ("2024-01-06", Some(true)),
            ("2024-01-07", None),
        ]);
        assert_eq!(compute_streak(&h, date("2024-01-07")), 2);
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(compute_streak(&History::new(), date("2024-01-07")), 0);
    }

    #[test]
    fn test_streak_grows_with_trailing_visits() {
        let today = date("2024-03-31");
        let mut h = History::new();
        let mut previous = compute_streak(&h, today);

        for back in 1..=40 {
            let day = today.checked_sub_days(Days::new(back)).unwrap();
            let mut log = DailyLogSnapshot::empty(day);
            log.gym_visited = Some(true);
            h.insert(day, log);

            let current = compute_streak(&h, today);
            assert!(current >= previous);
            previous = current;
        }

        assert_eq!(previous, 40);
    }

    #[test]
    fn test_week_buckets_oldest_first() {
        let h = history(&[("2024-01-01", Some(true)), ("2024-01-07", Some(true))]);
        let buckets = compute_consistency(&h, ConsistencyRange::Week, date("2024-01-07"));

        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets[0].label, "2024-01-01");
        assert_eq!(buckets[6].label, "2024-01-07");
        let visits: Vec<u32> = buckets.iter().map(|b| b.visits).collect();
        assert_eq!(visits, vec![1, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_month_range_has_thirty_daily_buckets() {
        let buckets = compute_consistency(&History::new(), ConsistencyRange::Month, date("2024-03-01"));
        assert_eq!(buckets.len(), 30);
        assert_eq!(buckets[29].start, date("2024-03-01"));
        assert!(buckets.iter().all(|b| b.visits == 0));
    }

    #[test]
    fn test_year_buckets_count_visits_per_month() {
        let h = history(&[
            ("2023-02-10", Some(true)),
            ("2023-03-01", Some(true)),
            ("2023-03-02", Some(true)),
            ("2023-03-03", Some(false)),
            ("2024-01-15", Some(true)),
        ]);
        let buckets = compute_consistency(&h, ConsistencyRange::Year, date("2024-01-20"));

        assert_eq!(buckets.len(), 12);
        assert_eq!(buckets[0].label, "2023-02");
        assert_eq!(buckets[0].visits, 1);
        assert_eq!(buckets[1].label, "2023-03");
        assert_eq!(buckets[1].visits, 2);
        assert_eq!(buckets[11].label, "2024-01");
        assert_eq!(buckets[11].visits, 1);
    }

    #[test]
    fn test_all_range_includes_current_year() {
        let h = history(&[
            ("2021-05-01", Some(true)),
            ("2021-05-02", Some(true)),
            ("2022-07-01", Some(false)),
        ]);
        let buckets = compute_consistency(&h, ConsistencyRange::All, date("2024-06-01"));

        let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["2021", "2022", "2024"]);
        assert_eq!(buckets[0].visits, 2);
        assert_eq!(buckets[1].visits, 0);
        assert_eq!(buckets[2].visits, 0);
    }
}
