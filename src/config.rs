use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub observability: ObservabilityConfig,

    pub security: SecurityConfig,

    pub history: HistoryConfig,

    pub leaderboard: LeaderboardConfig,

    pub records: RecordsConfig,

    pub room: RoomConfig,

    pub otp: OtpConfig,

    pub notifications: NotificationConfig,

    pub coach: CoachConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Directory holding the built single-page frontend. Served as a fallback
    /// when it exists.
    pub frontend_path: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    pub max_db_connections: u32,

    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/liftlog.db".to_string(),
            log_level: "info".to_string(),
            frontend_path: "frontend/dist".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub enabled: bool,

    pub port: u16,

    pub cors_allowed_origins: Vec<String>,

    /// Whether to set the Secure flag on session cookies.
    pub secure_cookies: bool,

    pub session_inactivity_minutes: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 5080,
            cors_allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ],
            secure_cookies: false,
            session_inactivity_minutes: 60 * 24,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub loki_enabled: bool,

    pub loki_url: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Argon2 memory cost in KiB
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations)
    pub argon2_time_cost: u32,

    pub argon2_parallelism: u32,

    pub min_password_length: usize,

    /// Largest accepted avatar payload (data URI or URL), in bytes.
    pub max_avatar_bytes: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            argon2_memory_cost_kib: 8192,
            argon2_time_cost: 3,
            argon2_parallelism: 1,
            min_password_length: 8,
            max_avatar_bytes: 512 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Trailing window returned by the default history query.
    pub window_months: u32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { window_months: 6 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardConfig {
    pub top_n: usize,

    /// Completed meals needed for a day to count toward the diet score.
    pub diet_meal_threshold: usize,

    /// Completed workout entries needed for a day to count toward the workout score.
    pub workout_entry_threshold: usize,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            top_n: 100,
            diet_meal_threshold: 3,
            workout_entry_threshold: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordsConfig {
    /// Exercises always reported by `GET /api/prs`, in addition to any the
    /// user has recorded manually.
    pub tracked_exercises: Vec<String>,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            tracked_exercises: vec![
                "Bench Press".to_string(),
                "Squat".to_string(),
                "Deadlift".to_string(),
                "Overhead Press".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Messages replayed to a socket when it joins.
    pub history_limit: u64,

    pub channel_capacity: usize,

    pub max_message_length: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            history_limit: 50,
            channel_capacity: 256,
            max_message_length: 2000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OtpConfig {
    pub ttl_seconds: i64,

    pub code_length: usize,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 5 * 60,
            code_length: 6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// When disabled, outgoing notifications are only written to the log.
    pub enabled: bool,

    /// HTTP endpoint of the email/SMS gateway.
    pub gateway_url: String,

    /// Bearer token for the gateway. `LIFTLOG_NOTIFY_TOKEN` overrides it.
    pub token: Option<String>,

    /// Recipient of feedback notifications.
    pub admin_email: Option<String>,

    pub timeout_seconds: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            gateway_url: "http://localhost:8025/send".to_string(),
            token: None,
            admin_email: None,
            timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoachConfig {
    pub enabled: bool,

    /// Base URL of an OpenAI-compatible API (without `/chat/completions`).
    pub base_url: String,

    /// `LIFTLOG_COACH_API_KEY` overrides it.
    pub api_key: Option<String>,

    pub model: String,

    pub timeout_seconds: u64,

    pub system_prompt: String,
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            timeout_seconds: 60,
            system_prompt: "You are a friendly, practical fitness coach. Keep answers short \
                            and specific to the user's training and nutrition."
                .to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path).map(Self::with_env_overrides);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default().with_env_overrides())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var("LIFTLOG_COACH_API_KEY")
            && !key.is_empty()
        {
            self.coach.api_key = Some(key);
        }

        if let Ok(token) = std::env::var("LIFTLOG_NOTIFY_TOKEN")
            && !token.is_empty()
        {
            self.notifications.token = Some(token);
        }

        self
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("liftlog").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".liftlog").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            Self::default().save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.general.database_path.is_empty() {
            anyhow::bail!("Database path cannot be empty");
        }

        if self.leaderboard.top_n == 0 {
            anyhow::bail!("Leaderboard top_n must be > 0");
        }

        if self.leaderboard.diet_meal_threshold == 0 || self.leaderboard.workout_entry_threshold == 0
        {
            anyhow::bail!("Leaderboard thresholds must be > 0");
        }

        if self.history.window_months == 0 {
            anyhow::bail!("History window must be at least one month");
        }

        if self.otp.ttl_seconds <= 0 {
            anyhow::bail!("OTP ttl_seconds must be > 0");
        }

        if !(4..=10).contains(&self.otp.code_length) {
            anyhow::bail!("OTP code_length must be between 4 and 10");
        }

        if self.room.channel_capacity == 0 {
            anyhow::bail!("Room channel capacity must be > 0");
        }

        if self.coach.enabled && self.coach.base_url.is_empty() {
            anyhow::bail!("Coach base URL cannot be empty when enabled");
        }

        if self.notifications.enabled && self.notifications.gateway_url.is_empty() {
            anyhow::bail!("Notification gateway URL cannot be empty when enabled");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.history.window_months, 6);
        assert_eq!(config.leaderboard.top_n, 100);
        assert_eq!(config.leaderboard.diet_meal_threshold, 3);
        assert_eq!(config.leaderboard.workout_entry_threshold, 4);
        assert_eq!(config.room.history_limit, 50);
        assert_eq!(config.otp.ttl_seconds, 300);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[leaderboard]"));
        assert!(toml_str.contains("[coach]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [leaderboard]
            top_n = 10
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.leaderboard.top_n, 10);

        assert_eq!(config.leaderboard.diet_meal_threshold, 3);
        assert_eq!(config.server.port, 5080);
    }

    #[test]
    fn test_validate_rejects_zero_thresholds() {
        let mut config = Config::default();
        config.leaderboard.workout_entry_threshold = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.coach.enabled = true;
        config.coach.base_url.clear();
        assert!(config.validate().is_err());
    }
}
