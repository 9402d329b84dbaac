use anyhow::Result;
use chrono::NaiveDate;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::models::{DailyLogSnapshot, History, RoomMessage};
use crate::stats::ManualRecord;

pub mod migrator;
pub mod repositories;

pub use repositories::feedback::FeedbackEntry;
pub use repositories::otp::OneTimeCode;
pub use repositories::room::NewRoomMessage;
pub use repositories::user::{NewUser, User};
pub use repositories::weight::WeightEntry;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn daily_log_repo(&self) -> repositories::daily_log::DailyLogRepository {
        repositories::daily_log::DailyLogRepository::new(self.conn.clone())
    }

    fn weight_repo(&self) -> repositories::weight::WeightRepository {
        repositories::weight::WeightRepository::new(self.conn.clone())
    }

    fn record_repo(&self) -> repositories::record::RecordRepository {
        repositories::record::RecordRepository::new(self.conn.clone())
    }

    fn otp_repo(&self) -> repositories::otp::OtpRepository {
        repositories::otp::OtpRepository::new(self.conn.clone())
    }

    fn room_repo(&self) -> repositories::room::RoomRepository {
        repositories::room::RoomRepository::new(self.conn.clone())
    }

    fn feedback_repo(&self) -> repositories::feedback::FeedbackRepository {
        repositories::feedback::FeedbackRepository::new(self.conn.clone())
    }

    // Users

    pub async fn create_user(&self, new_user: NewUser<'_>, config: &SecurityConfig) -> Result<User> {
        self.user_repo().create(new_user, config).await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn user_exists(&self, username: &str, email: &str) -> Result<bool> {
        self.user_repo().is_taken(username, email).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repo().list_all().await
    }

    pub async fn verify_user_password(&self, login: &str, password: &str) -> Result<Option<User>> {
        self.user_repo().verify_password(login, password).await
    }

    pub async fn update_user_password(
        &self,
        id: i32,
        new_password: &str,
        config: &SecurityConfig,
    ) -> Result<()> {
        self.user_repo()
            .update_password(id, new_password, config)
            .await
    }

    pub async fn update_user_avatar(&self, id: i32, avatar: Option<String>) -> Result<User> {
        self.user_repo().update_avatar(id, avatar).await
    }

    pub async fn verify_api_key(&self, api_key: &str) -> Result<Option<User>> {
        self.user_repo().verify_api_key(api_key).await
    }

    // Daily logs

    pub async fn replace_daily_log(
        &self,
        user_id: i32,
        log: &DailyLogSnapshot,
    ) -> Result<DailyLogSnapshot> {
        self.daily_log_repo().replace(user_id, log).await
    }

    pub async fn get_daily_log(
        &self,
        user_id: i32,
        date: NaiveDate,
    ) -> Result<Option<DailyLogSnapshot>> {
        self.daily_log_repo().get(user_id, date).await
    }

    pub async fn get_history(&self, user_id: i32, since: Option<NaiveDate>) -> Result<History> {
        self.daily_log_repo().history(user_id, since).await
    }

    pub async fn get_all_histories(&self) -> Result<BTreeMap<i32, History>> {
        self.daily_log_repo().all_by_user().await
    }

    // Weight

    pub async fn list_weight_entries(&self, user_id: i32) -> Result<Vec<WeightEntry>> {
        self.weight_repo().list(user_id).await
    }

    pub async fn latest_weight_entry(&self, user_id: i32) -> Result<Option<WeightEntry>> {
        self.weight_repo().latest(user_id).await
    }

    pub async fn record_weight(
        &self,
        user_id: i32,
        date: NaiveDate,
        weight: f64,
    ) -> Result<WeightEntry> {
        self.weight_repo().record(user_id, date, weight).await
    }

    // Manual records

    pub async fn list_manual_records(&self, user_id: i32) -> Result<Vec<ManualRecord>> {
        self.record_repo().list(user_id).await
    }

    pub async fn get_manual_record(
        &self,
        user_id: i32,
        exercise: &str,
    ) -> Result<Option<ManualRecord>> {
        self.record_repo().get(user_id, exercise).await
    }

    pub async fn upsert_manual_record(
        &self,
        user_id: i32,
        exercise: &str,
        weight: f64,
        reps: u32,
    ) -> Result<ManualRecord> {
        self.record_repo()
            .upsert(user_id, exercise, weight, reps)
            .await
    }

    pub async fn delete_manual_record(&self, user_id: i32, exercise: &str) -> Result<bool> {
        self.record_repo().delete(user_id, exercise).await
    }

    // One-time codes

    pub async fn replace_one_time_code(
        &self,
        identifier: &str,
        code: &str,
        expires_at: &str,
    ) -> Result<()> {
        self.otp_repo().replace(identifier, code, expires_at).await
    }

    pub async fn get_one_time_code(&self, identifier: &str) -> Result<Option<OneTimeCode>> {
        self.otp_repo().get(identifier).await
    }

    pub async fn delete_one_time_code(&self, identifier: &str) -> Result<()> {
        self.otp_repo().delete(identifier).await
    }

    // Room

    pub async fn insert_room_message(&self, message: NewRoomMessage<'_>) -> Result<RoomMessage> {
        self.room_repo().insert(message).await
    }

    pub async fn recent_room_messages(&self, room: &str, limit: u64) -> Result<Vec<RoomMessage>> {
        self.room_repo().recent(room, limit).await
    }

    // Feedback

    pub async fn insert_feedback(
        &self,
        user_id: i32,
        category: &str,
        message: &str,
        rating: i32,
    ) -> Result<FeedbackEntry> {
        self.feedback_repo()
            .insert(user_id, category, message, rating)
            .await
    }

    pub async fn recent_feedback(&self, limit: u64) -> Result<Vec<FeedbackEntry>> {
        self.feedback_repo().recent(limit).await
    }
}
