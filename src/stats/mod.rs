//! Read-side aggregations over daily logs. Everything here is pure and is
//! recomputed from stored rows on every request.

pub mod leaderboard;
pub mod records;
pub mod streak;

pub use leaderboard::{
    Leaderboard, LeaderboardEntry, Scores, ScoringRules, UserLogs, compute_leaderboard,
    score_logs,
};
pub use records::{
    ManualRecord, PersonalRecord, RecordSource, best_record, find_manual, is_new_record,
    mine_best,
};
pub use streak::{ConsistencyBucket, ConsistencyRange, compute_consistency, compute_streak};
