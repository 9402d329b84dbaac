pub mod coach;
pub mod notify;

pub use coach::{ChatMessage, ChatRole, CoachClient};
pub use notify::{Notification, NotifyClient};

use std::time::Duration;

/// Shared HTTP client so outbound calls reuse pooled connections.
pub fn build_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(concat!("liftlog/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}
