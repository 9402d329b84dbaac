use axum::{Extension, Json, extract::State};
use std::sync::Arc;

use super::auth::CurrentUser;
use crate::api::{ApiError, ApiResponse, AppState, CoachRequest};
use crate::services::{CoachError, CoachReply};

impl From<CoachError> for ApiError {
    fn from(err: CoachError) -> Self {
        match err {
            CoachError::Disabled => Self::not_implemented("AI coach"),
            CoachError::Validation(msg) => Self::validation(msg),
            CoachError::Upstream(msg) => Self::gateway_error("AI coach", msg),
            CoachError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

/// `POST /api/coach/chat`
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CoachRequest>,
) -> Result<Json<ApiResponse<CoachReply>>, ApiError> {
    let reply = state
        .coach_service()
        .chat(user.id, &payload.message, payload.history)
        .await?;
    Ok(Json(ApiResponse::success(reply)))
}
