use anyhow::{Context, Result, bail};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::NotificationConfig;

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    /// Email address or phone number
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Delivers email/SMS through an HTTP gateway.
#[derive(Clone)]
pub struct NotifyClient {
    client: Client,
    config: NotificationConfig,
}

impl NotifyClient {
    #[must_use]
    pub const fn new(client: Client, config: NotificationConfig) -> Self {
        Self { client, config }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    #[must_use]
    pub fn admin_email(&self) -> Option<&str> {
        self.config.admin_email.as_deref()
    }

    /// Posts the notification to the gateway. When notifications are disabled
    /// the message is logged instead and the call succeeds.
    pub async fn send(&self, notification: &Notification) -> Result<()> {
        if !self.config.enabled {
            info!(
                to = %notification.to,
                subject = %notification.subject,
                body = %notification.body,
                "Notifications disabled, message not delivered"
            );
            return Ok(());
        }

        let mut request = self
            .client
            .post(&self.config.gateway_url)
            .timeout(Duration::from_secs(self.config.timeout_seconds))
            .json(notification);

        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .context("Failed to reach notification gateway")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Notification gateway rejected message: status={status}, body={body}");
        }

        debug!(to = %notification.to, "Notification delivered");
        Ok(())
    }
}
