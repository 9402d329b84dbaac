use axum::{
    Extension, Json,
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_sessions::Session;

use super::validation::{validate_email, validate_username};
use super::{ApiError, ApiResponse, AppState, MessageResponse};
use crate::domain::{Role, UserId};
use crate::services::{AuthError, CodeIssued, LoginResult, UserInfo};

const SESSION_USER_KEY: &str = "user_id";

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::unauthorized("Invalid credentials"),
            AuthError::UserNotFound => ApiError::NotFound("User not found".to_string()),
            AuthError::Conflict(msg) => ApiError::Conflict(msg),
            AuthError::Validation(msg) => ApiError::ValidationError(msg),
            AuthError::CodeNotFound => ApiError::NotFound("Invalid or unknown code".to_string()),
            AuthError::CodeExpired => ApiError::Gone("Code has expired".to_string()),
            AuthError::Delivery(msg) => ApiError::gateway_error("Notification", msg),
            AuthError::Database(msg) => ApiError::DatabaseError(msg),
            AuthError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// The authenticated caller, resolved once per request by [`auth_middleware`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub username: String,
    pub role: Role,
}

impl CurrentUser {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&UserInfo> for CurrentUser {
    fn from(user: &UserInfo) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
        }
    }
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    /// Username or email.
    #[serde(alias = "username", alias = "email")]
    pub login: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct AvatarRequest {
    pub avatar: Option<String>,
}

#[derive(Deserialize)]
pub struct CodeRequest {
    pub identifier: String,
}

#[derive(Deserialize)]
pub struct VerifyCodeRequest {
    pub identifier: String,
    pub code: String,
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

// ============================================================================
// Middleware
// ============================================================================

/// Resolves the caller from, in order:
/// 1. Session cookie (from login)
/// 2. `X-Api-Key` header
/// 3. `Authorization: Bearer <api_key>` header
async fn resolve_user(
    state: &AppState,
    headers: &HeaderMap,
    session: &Session,
) -> Result<Option<CurrentUser>, ApiError> {
    if let Ok(Some(id)) = session.get::<i32>(SESSION_USER_KEY).await {
        match state.auth_service().get_user(UserId::new(id)).await {
            Ok(user) => return Ok(Some(CurrentUser::from(&user))),
            // Account removed since login.
            Err(AuthError::UserNotFound) => {
                let _ = session.flush().await;
            }
            Err(e) => return Err(e.into()),
        }
    }

    if let Some(key) = extract_api_key(headers)
        && let Some(user) = state.auth_service().verify_api_key(&key).await?
    {
        return Ok(Some(CurrentUser::from(&user)));
    }

    Ok(None)
}

pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let Some(user) = resolve_user(&state, &headers, &session).await? else {
        return Err(ApiError::unauthorized("Not authenticated"));
    };

    tracing::Span::current().record("user_id", user.id.value());
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Like [`auth_middleware`], but lets anonymous requests through without a
/// [`CurrentUser`] extension.
pub async fn optional_auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(user) = resolve_user(&state, &headers, &session).await? {
        tracing::Span::current().record("user_id", user.id.value());
        request.extensions_mut().insert(user);
    }
    Ok(next.run(request).await)
}

fn extract_api_key(headers: &HeaderMap) -> Option<String> {
    if let Some(api_key) = headers.get("X-Api-Key")
        && let Ok(key_str) = api_key.to_str()
    {
        return Some(key_str.trim().to_string());
    }

    if let Some(auth_header) = headers.get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    None
}

async fn start_session(session: &Session, user: &UserInfo) -> Result<(), ApiError> {
    session
        .insert(SESSION_USER_KEY, user.id.value())
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<LoginResult>>, ApiError> {
    let username = validate_username(&payload.username)?;
    let email = validate_email(&payload.email)?;

    let result = state
        .auth_service()
        .register(username, email, &payload.password)
        .await?;

    start_session(&session, &result.user).await?;

    Ok(Json(ApiResponse::success(result)))
}

/// POST /auth/login
/// Authenticate with username (or email) and password, returns API key on success
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResult>>, ApiError> {
    if payload.login.trim().is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let result = state
        .auth_service()
        .login(&payload.login, &payload.password)
        .await?;

    start_session(&session, &result.user).await?;
    tracing::info!(user_id = %result.user.id, "User logged in");

    Ok(Json(ApiResponse::success(result)))
}

/// POST /auth/logout
pub async fn logout(session: Session) -> Json<ApiResponse<MessageResponse>> {
    let _ = session.flush().await;
    Json(ApiResponse::success(MessageResponse::new("Logged out")))
}

/// GET /auth/me
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let info = state.auth_service().get_user(user.id).await?;
    Ok(Json(ApiResponse::success(info)))
}

/// PUT /auth/avatar
/// A `null` or empty avatar clears it.
pub async fn update_avatar(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<AvatarRequest>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let info = state
        .auth_service()
        .update_avatar(user.id, payload.avatar)
        .await?;
    Ok(Json(ApiResponse::success(info)))
}

/// POST /auth/otp/request
pub async fn request_code(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CodeRequest>,
) -> Result<Json<ApiResponse<CodeIssued>>, ApiError> {
    let issued = state
        .auth_service()
        .request_code(&payload.identifier)
        .await?;
    Ok(Json(ApiResponse::success(issued)))
}

/// POST /auth/otp/verify
pub async fn verify_code(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<VerifyCodeRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .auth_service()
        .verify_code(&payload.identifier, &payload.code)
        .await?;
    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Code verified",
    ))))
}

/// POST /auth/password/reset
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let email = validate_email(&payload.email)?;
    state
        .auth_service()
        .reset_password(email, &payload.code, &payload.new_password)
        .await?;
    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Password updated successfully",
    ))))
}
