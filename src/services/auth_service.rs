//! Domain service for accounts and one-time codes.
//!
//! Handles registration, login, API key lookup, avatars, and the
//! request/verify flow for emailed codes used by password reset.

use serde::Serialize;
use thiserror::Error;

use crate::db::User;
use crate::domain::{Role, UserId};

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("{0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    /// No live code for the identifier, or the submitted code does not match.
    #[error("Invalid or unknown code")]
    CodeNotFound,

    /// The code was deleted before this was returned.
    #[error("Code has expired")]
    CodeExpired,

    /// The code could not be delivered and was discarded.
    #[error("Failed to deliver code: {0}")]
    Delivery(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// User info DTO for responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
    pub role: Role,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: UserId::new(user.id),
            username: user.username,
            email: user.email,
            avatar: user.avatar,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Login result containing user info and API key.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub user: UserInfo,
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CodeIssued {
    pub identifier: String,
    pub expires_at: String,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates an account with the `user` role.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Conflict`] if the username or email is taken.
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<LoginResult, AuthError>;

    /// Verifies credentials. `login` may be either the username or the email.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login(&self, login: &str, password: &str) -> Result<LoginResult, AuthError>;

    async fn verify_api_key(&self, api_key: &str) -> Result<Option<UserInfo>, AuthError>;

    async fn get_user(&self, user: UserId) -> Result<UserInfo, AuthError>;

    /// Sets or clears the avatar. Accepts an image data URI or an http(s) URL.
    async fn update_avatar(
        &self,
        user: UserId,
        avatar: Option<String>,
    ) -> Result<UserInfo, AuthError>;

    /// Issues a fresh code for `identifier`, replacing any earlier one, and
    /// delivers it.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Delivery`] when sending fails; the code is not kept.
    async fn request_code(&self, identifier: &str) -> Result<CodeIssued, AuthError>;

    /// Checks and consumes the code for `identifier`.
    ///
    /// # Errors
    ///
    /// [`AuthError::CodeNotFound`] for a missing or wrong code,
    /// [`AuthError::CodeExpired`] once the code is past its expiry.
    async fn verify_code(&self, identifier: &str, code: &str) -> Result<(), AuthError>;

    /// Verifies the code sent to `email` and sets a new password.
    async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), AuthError>;
}
