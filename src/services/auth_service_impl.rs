//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use tracing::{info, warn};

use crate::clients::{Notification, NotifyClient};
use crate::config::{OtpConfig, SecurityConfig};
use crate::db::{NewUser, Store};
use crate::domain::{Role, UserId};
use crate::services::auth_service::{AuthError, AuthService, CodeIssued, LoginResult, UserInfo};

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
    otp: OtpConfig,
    notifier: NotifyClient,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(
        store: Store,
        security: SecurityConfig,
        otp: OtpConfig,
        notifier: NotifyClient,
    ) -> Self {
        Self {
            store,
            security,
            otp,
            notifier,
        }
    }

    fn check_password(&self, password: &str) -> Result<(), AuthError> {
        if password.chars().count() < self.security.min_password_length {
            return Err(AuthError::Validation(format!(
                "Password must be at least {} characters",
                self.security.min_password_length
            )));
        }
        Ok(())
    }

    fn check_avatar(&self, avatar: &str) -> Result<(), AuthError> {
        if avatar.len() > self.security.max_avatar_bytes {
            return Err(AuthError::Validation(format!(
                "Avatar must be at most {} bytes",
                self.security.max_avatar_bytes
            )));
        }

        let accepted = avatar.starts_with("data:image/")
            || avatar.starts_with("https://")
            || avatar.starts_with("http://");
        if !accepted {
            return Err(AuthError::Validation(
                "Avatar must be an image data URI or an http(s) URL".to_string(),
            ));
        }
        Ok(())
    }
}

/// Random numeric code with `length` digits; leading zeros allowed.
#[must_use]
pub fn generate_code(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

fn is_expired(expires_at: &str, now: DateTime<Utc>) -> bool {
    // An unparseable expiry is treated as already expired.
    DateTime::parse_from_rfc3339(expires_at).map_or(true, |t| now > t)
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<LoginResult, AuthError> {
        let username = username.trim();
        let email = email.trim().to_lowercase();
        self.check_password(password)?;

        if self.store.user_exists(username, &email).await? {
            return Err(AuthError::Conflict(
                "Username or email is already registered".to_string(),
            ));
        }

        let user = self
            .store
            .create_user(
                NewUser {
                    username,
                    email: &email,
                    password,
                    role: Role::User,
                },
                &self.security,
            )
            .await?;

        info!(event = "user_registered", user_id = user.id, username = %user.username, "User registered");

        Ok(LoginResult {
            api_key: user.api_key.clone(),
            user: UserInfo::from(user),
        })
    }

    async fn login(&self, login: &str, password: &str) -> Result<LoginResult, AuthError> {
        let login = login.trim();
        // Emails are stored lowercased.
        let login = if login.contains('@') {
            login.to_lowercase()
        } else {
            login.to_string()
        };

        let user = self
            .store
            .verify_user_password(&login, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        Ok(LoginResult {
            api_key: user.api_key.clone(),
            user: UserInfo::from(user),
        })
    }

    async fn verify_api_key(&self, api_key: &str) -> Result<Option<UserInfo>, AuthError> {
        let user = self.store.verify_api_key(api_key).await?;
        Ok(user.map(UserInfo::from))
    }

    async fn get_user(&self, user: UserId) -> Result<UserInfo, AuthError> {
        self.store
            .get_user(user.value())
            .await?
            .map(UserInfo::from)
            .ok_or(AuthError::UserNotFound)
    }

    async fn update_avatar(
        &self,
        user: UserId,
        avatar: Option<String>,
    ) -> Result<UserInfo, AuthError> {
        let avatar = avatar
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());
        if let Some(avatar) = &avatar {
            self.check_avatar(avatar)?;
        }

        if self.store.get_user(user.value()).await?.is_none() {
            return Err(AuthError::UserNotFound);
        }

        let updated = self.store.update_user_avatar(user.value(), avatar).await?;
        Ok(UserInfo::from(updated))
    }

    async fn request_code(&self, identifier: &str) -> Result<CodeIssued, AuthError> {
        let identifier = identifier.trim().to_lowercase();
        if identifier.is_empty() {
            return Err(AuthError::Validation("Identifier is required".to_string()));
        }

        let code = generate_code(self.otp.code_length);
        let expires_at = (Utc::now() + Duration::seconds(self.otp.ttl_seconds)).to_rfc3339();

        self.store
            .replace_one_time_code(&identifier, &code, &expires_at)
            .await?;

        let notification = Notification {
            to: identifier.clone(),
            subject: "Your liftlog code".to_string(),
            body: format!(
                "Your code is {code}. It expires in {} minutes.",
                self.otp.ttl_seconds / 60
            ),
        };

        if let Err(e) = self.notifier.send(&notification).await {
            warn!(identifier = %identifier, error = %e, "One-time code delivery failed");
            self.store.delete_one_time_code(&identifier).await?;
            return Err(AuthError::Delivery(e.to_string()));
        }

        info!(event = "otp_issued", identifier = %identifier, "One-time code sent");

        Ok(CodeIssued {
            identifier,
            expires_at,
        })
    }

    async fn verify_code(&self, identifier: &str, code: &str) -> Result<(), AuthError> {
        let identifier = identifier.trim().to_lowercase();

        let stored = self
            .store
            .get_one_time_code(&identifier)
            .await?
            .ok_or(AuthError::CodeNotFound)?;

        if is_expired(&stored.expires_at, Utc::now()) {
            self.store.delete_one_time_code(&identifier).await?;
            return Err(AuthError::CodeExpired);
        }

        if stored.code != code.trim() {
            return Err(AuthError::CodeNotFound);
        }

        self.store.delete_one_time_code(&identifier).await?;
        Ok(())
    }

    async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        self.check_password(new_password)?;

        let email = email.trim().to_lowercase();
        let user = self
            .store
            .get_user_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        self.verify_code(&email, code).await?;

        self.store
            .update_user_password(user.id, new_password, &self.security)
            .await?;

        info!(event = "password_reset", user_id = user.id, "Password reset");
        Ok(())
    }
}
