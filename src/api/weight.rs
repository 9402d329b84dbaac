use axum::{Extension, Json, extract::State};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::{validate_date, validate_weight};
use crate::api::{ApiError, ApiResponse, AppState, WeightDto, WeightRequest};
use crate::services::WeightError;

impl From<WeightError> for ApiError {
    fn from(err: WeightError) -> Self {
        match err {
            WeightError::Validation(msg) => Self::validation(msg),
            WeightError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

/// `GET /api/weight`, oldest first.
pub async fn list_weight(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<WeightDto>>>, ApiError> {
    let entries = state.weight_service().list(user.id).await?;
    Ok(Json(ApiResponse::success(
        entries.into_iter().map(WeightDto::from).collect(),
    )))
}

/// `POST /api/weight`
pub async fn record_weight(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<WeightRequest>,
) -> Result<Json<ApiResponse<WeightDto>>, ApiError> {
    let date = validate_date(&payload.date)?;
    let weight = validate_weight(payload.weight)?;

    let entry = state.weight_service().record(user.id, date, weight).await?;
    Ok(Json(ApiResponse::success(WeightDto::from(entry))))
}
