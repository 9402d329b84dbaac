use async_trait::async_trait;
use std::fmt::Write;
use tracing::warn;

use crate::clients::{ChatMessage, ChatRole, CoachClient};
use crate::db::{Store, WeightEntry};
use crate::domain::{UserId, format_date, today};
use crate::services::coach_service::{CoachError, CoachReply, CoachService};
use crate::stats::compute_streak;

/// Prior turns forwarded upstream; older ones are dropped.
const MAX_HISTORY_TURNS: usize = 20;
const MAX_MESSAGE_CHARS: usize = 2000;

pub struct SeaOrmCoachService {
    store: Store,
    client: CoachClient,
}

impl SeaOrmCoachService {
    #[must_use]
    pub const fn new(store: Store, client: CoachClient) -> Self {
        Self { store, client }
    }
}

pub fn build_system_prompt(base: &str, streak: u32, latest: Option<&WeightEntry>) -> String {
    let mut prompt = base.trim().to_string();
    let _ = write!(
        prompt,
        "\n\nThe user's current gym streak is {streak} day{}.",
        if streak == 1 { "" } else { "s" }
    );
    match latest {
        Some(w) => {
            let _ = write!(
                prompt,
                " Their latest recorded body weight is {} kg ({}).",
                w.weight,
                format_date(w.date)
            );
        }
        None => prompt.push_str(" They have not recorded their body weight yet."),
    }
    prompt
}

#[async_trait]
impl CoachService for SeaOrmCoachService {
    async fn chat(
        &self,
        user: UserId,
        message: &str,
        history: Vec<ChatMessage>,
    ) -> Result<CoachReply, CoachError> {
        if !self.client.is_enabled() {
            return Err(CoachError::Disabled);
        }

        let message = message.trim();
        if message.is_empty() {
            return Err(CoachError::Validation("Message is required".to_string()));
        }
        if message.chars().count() > MAX_MESSAGE_CHARS {
            return Err(CoachError::Validation(format!(
                "Message must be at most {MAX_MESSAGE_CHARS} characters"
            )));
        }

        let logs = self.store.get_history(user.value(), None).await?;
        let latest = self.store.latest_weight_entry(user.value()).await?;
        let streak = compute_streak(&logs, today());

        let prior: Vec<ChatMessage> = history
            .into_iter()
            .filter(|m| m.role != ChatRole::System)
            .collect();
        let skip = prior.len().saturating_sub(MAX_HISTORY_TURNS);

        let mut messages = Vec::with_capacity(prior.len() - skip + 2);
        messages.push(ChatMessage::new(
            ChatRole::System,
            build_system_prompt(self.client.system_prompt(), streak, latest.as_ref()),
        ));
        messages.extend(prior.into_iter().skip(skip));
        messages.push(ChatMessage::new(ChatRole::User, message));

        let reply = self.client.complete(&messages).await.map_err(|e| {
            warn!(user_id = %user, error = %e, "Coach completion failed");
            CoachError::Upstream(e.to_string())
        })?;

        Ok(CoachReply { reply })
    }
}
