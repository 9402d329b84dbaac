use std::sync::Arc;
use tokio::sync::RwLock;

use crate::clients::{CoachClient, NotifyClient, build_http_client};
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, CoachService, FeedbackService, LogService, RecordService, RoomHub,
    SeaOrmAuthService, SeaOrmCoachService, SeaOrmFeedbackService, SeaOrmLogService,
    SeaOrmRecordService, SeaOrmStatsService, SeaOrmWeightService, StatsService, WeightService,
};
use crate::stats::ScoringRules;

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub log_service: Arc<dyn LogService>,

    pub stats_service: Arc<dyn StatsService>,

    pub record_service: Arc<dyn RecordService>,

    pub weight_service: Arc<dyn WeightService>,

    pub feedback_service: Arc<dyn FeedbackService>,

    pub coach_service: Arc<dyn CoachService>,

    pub room: RoomHub,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Self::with_store(config, store)
    }

    /// Wires every service on top of an already connected store.
    pub fn with_store(config: Config, store: Store) -> anyhow::Result<Self> {
        let notify_http = build_http_client(config.notifications.timeout_seconds)?;
        let coach_http = build_http_client(config.coach.timeout_seconds)?;

        let notifier = NotifyClient::new(notify_http, config.notifications.clone());
        let coach_client = CoachClient::new(coach_http, config.coach.clone());

        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.clone(),
            config.otp.clone(),
            notifier.clone(),
        )) as Arc<dyn AuthService + Send + Sync + 'static>;

        let log_service = Arc::new(SeaOrmLogService::new(
            store.clone(),
            config.history.window_months,
        )) as Arc<dyn LogService + Send + Sync + 'static>;

        let stats_service = Arc::new(SeaOrmStatsService::new(
            store.clone(),
            ScoringRules::from(&config.leaderboard),
        )) as Arc<dyn StatsService + Send + Sync + 'static>;

        let record_service = Arc::new(SeaOrmRecordService::new(
            store.clone(),
            config.records.tracked_exercises.clone(),
        )) as Arc<dyn RecordService + Send + Sync + 'static>;

        let weight_service = Arc::new(SeaOrmWeightService::new(store.clone()))
            as Arc<dyn WeightService + Send + Sync + 'static>;

        let feedback_service = Arc::new(SeaOrmFeedbackService::new(store.clone(), notifier))
            as Arc<dyn FeedbackService + Send + Sync + 'static>;

        let coach_service = Arc::new(SeaOrmCoachService::new(store.clone(), coach_client))
            as Arc<dyn CoachService + Send + Sync + 'static>;

        let room = RoomHub::new(store.clone(), &config.room);

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            auth_service,
            log_service,
            stats_service,
            record_service,
            weight_service,
            feedback_service,
            coach_service,
            room,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
