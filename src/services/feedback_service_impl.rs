use async_trait::async_trait;
use tracing::{info, warn};

use crate::clients::{Notification, NotifyClient};
use crate::db::{FeedbackEntry, Store};
use crate::domain::UserId;
use crate::services::feedback_service::{FeedbackError, FeedbackService};

const MAX_MESSAGE_CHARS: usize = 4000;

pub struct SeaOrmFeedbackService {
    store: Store,
    notifier: NotifyClient,
}

impl SeaOrmFeedbackService {
    #[must_use]
    pub const fn new(store: Store, notifier: NotifyClient) -> Self {
        Self { store, notifier }
    }

    async fn notify_admin(&self, entry: &FeedbackEntry, username: &str) {
        let Some(admin) = self.notifier.admin_email() else {
            return;
        };

        let notification = Notification {
            to: admin.to_string(),
            subject: format!("New feedback: {} ({}/5)", entry.category, entry.rating),
            body: format!("From {username}:\n\n{}", entry.message),
        };

        if let Err(e) = self.notifier.send(&notification).await {
            warn!(feedback_id = entry.id, error = %e, "Failed to notify admin about feedback");
        }
    }
}

#[async_trait]
impl FeedbackService for SeaOrmFeedbackService {
    async fn submit(
        &self,
        user: UserId,
        category: &str,
        message: &str,
        rating: i32,
    ) -> Result<FeedbackEntry, FeedbackError> {
        if !(1..=5).contains(&rating) {
            return Err(FeedbackError::Validation(
                "Rating must be between 1 and 5".to_string(),
            ));
        }

        let message = message.trim();
        if message.is_empty() {
            return Err(FeedbackError::Validation("Message is required".to_string()));
        }
        if message.chars().count() > MAX_MESSAGE_CHARS {
            return Err(FeedbackError::Validation(format!(
                "Message must be at most {MAX_MESSAGE_CHARS} characters"
            )));
        }

        let category = match category.trim() {
            "" => "general",
            c => c,
        };

        let entry = self
            .store
            .insert_feedback(user.value(), category, message, rating)
            .await?;

        info!(event = "feedback_saved", feedback_id = entry.id, user_id = %user, rating, "Feedback saved");

        let username = self
            .store
            .get_user(user.value())
            .await
            .ok()
            .flatten()
            .map_or_else(|| user.to_string(), |u| u.username);
        self.notify_admin(&entry, &username).await;

        Ok(entry)
    }

    async fn recent(&self, limit: u64) -> Result<Vec<FeedbackEntry>, FeedbackError> {
        Ok(self.store.recent_feedback(limit).await?)
    }
}
