pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, CodeIssued, LoginResult, UserInfo};
pub use auth_service_impl::SeaOrmAuthService;

pub mod log_service;
pub mod log_service_impl;
pub use log_service::{LogError, LogService};
pub use log_service_impl::SeaOrmLogService;

pub mod stats_service;
pub mod stats_service_impl;
pub use stats_service::{ConsistencyReport, StatsError, StatsService, StreakSummary};
pub use stats_service_impl::SeaOrmStatsService;

pub mod record_service;
pub mod record_service_impl;
pub use record_service::{RecordBoard, RecordError, RecordService, SavedRecord};
pub use record_service_impl::SeaOrmRecordService;

pub mod weight_service;
pub mod weight_service_impl;
pub use weight_service::{WeightError, WeightService};
pub use weight_service_impl::SeaOrmWeightService;

pub mod feedback_service;
pub mod feedback_service_impl;
pub use feedback_service::{FeedbackError, FeedbackService};
pub use feedback_service_impl::SeaOrmFeedbackService;

pub mod coach_service;
pub mod coach_service_impl;
pub use coach_service::{CoachError, CoachReply, CoachService};
pub use coach_service_impl::SeaOrmCoachService;

pub mod room;
pub use room::{RoomError, RoomHub, RoomSubscription};
