use axum::{
    Extension, Json,
    extract::{Query, State},
};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::{validate_limit, validate_rating};
use crate::api::{ApiError, ApiResponse, AppState, FeedbackDto, FeedbackListQuery, FeedbackRequest};
use crate::services::FeedbackError;

impl From<FeedbackError> for ApiError {
    fn from(err: FeedbackError) -> Self {
        match err {
            FeedbackError::Validation(msg) => Self::validation(msg),
            FeedbackError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

/// `POST /api/feedback`
///
/// Succeeds once the feedback is stored, even if the admin could not be notified.
pub async fn submit_feedback(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<FeedbackRequest>,
) -> Result<Json<ApiResponse<FeedbackDto>>, ApiError> {
    let rating = validate_rating(payload.rating)?;

    let entry = state
        .feedback_service()
        .submit(user.id, &payload.category, &payload.message, rating)
        .await?;

    Ok(Json(ApiResponse::success(FeedbackDto::from(entry))))
}

/// `GET /api/admin/feedback?limit=`, admins only.
pub async fn list_feedback(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<FeedbackListQuery>,
) -> Result<Json<ApiResponse<Vec<FeedbackDto>>>, ApiError> {
    if !user.is_admin() {
        return Err(ApiError::Forbidden("Admin role required".to_string()));
    }

    let limit = validate_limit(query.limit.unwrap_or(50))?;
    let entries = state
        .feedback_service()
        .recent(u64::try_from(limit).unwrap_or(u64::MAX))
        .await?;

    Ok(Json(ApiResponse::success(
        entries.into_iter().map(FeedbackDto::from).collect(),
    )))
}
