//! Personal record endpoints.
//!
//! A record is the better of the manually entered value and the heaviest set
//! found in the caller's logs.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::{validate_exercise, validate_weight};
use crate::api::{ApiError, ApiResponse, AppState, MessageResponse, RecordRejection, RecordRequest};
use crate::services::{RecordBoard, RecordError, SavedRecord};

impl From<RecordError> for ApiError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::Validation(msg) => Self::validation(msg),
            RecordError::NotFound(exercise) => Self::not_found("Manual record for", exercise),
            err @ RecordError::NotARecord { .. } => Self::Conflict(err.to_string()),
            RecordError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

/// `GET /api/prs`
pub async fn list_records(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<RecordBoard>>, ApiError> {
    let board = state.record_service().list_records(user.id).await?;
    Ok(Json(ApiResponse::success(board)))
}

/// Saves a manual record if it beats the current best.
///
/// # Endpoint
/// `POST /api/prs`
///
/// # Response
/// The saved record, or a 409 carrying the record it failed to beat:
/// `{"success": false, "error": "...", "data": {"exercise", "current"}}`.
pub async fn record_pr(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<RecordRequest>,
) -> Result<Response, ApiError> {
    let exercise = validate_exercise(&payload.exercise)?;
    let weight = validate_weight(payload.weight)?;

    match state
        .record_service()
        .record_manual_pr(user.id, exercise, weight, payload.reps)
        .await
    {
        Ok(saved) => Ok(Json(ApiResponse::<SavedRecord>::success(saved)).into_response()),
        Err(RecordError::NotARecord { weight, current }) => {
            let body = ApiResponse {
                success: false,
                error: Some(format!(
                    "{weight} does not beat the current record of {}",
                    current.weight
                )),
                data: Some(RecordRejection {
                    exercise: exercise.to_string(),
                    current,
                }),
            };
            Ok((StatusCode::CONFLICT, Json(body)).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

/// `DELETE /api/prs/{exercise}`
pub async fn delete_record(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(exercise): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let exercise = validate_exercise(&exercise)?;
    state.record_service().delete_pr(user.id, exercise).await?;
    Ok(Json(ApiResponse::success(MessageResponse::new(format!(
        "Manual record for '{exercise}' deleted"
    )))))
}
