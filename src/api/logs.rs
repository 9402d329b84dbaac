//! Daily log endpoints.
//!
//! All business logic is delegated to [`LogService`](crate::services::LogService);
//! handlers only parse the boundary types and map errors.
//!
//! # Principal Notes
//! - **Full replace**: `POST /log` overwrites the day's workouts and meals with
//!   exactly what was sent.
//! - **Strong Typing**: request bodies are decoded into [`LogRequest`] before
//!   anything reaches the service.

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::validation::validate_date;
use crate::api::{ApiError, ApiResponse, AppState, DailyLogDto, HistoryQuery, LogRequest};
use crate::domain::format_date;
use crate::models::DailyLogSnapshot;
use crate::services::LogError;

impl From<LogError> for ApiError {
    fn from(err: LogError) -> Self {
        match err {
            LogError::Validation(msg) => Self::validation(msg),
            LogError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

/// Returns the caller's logs keyed by date.
///
/// # Endpoint
/// `GET /api/history`
///
/// # Query Parameters
/// - `since`: first date to include (default: six months ago)
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<BTreeMap<String, DailyLogDto>>>, ApiError> {
    let since = query.since.as_deref().map(validate_date).transpose()?;

    let history = state.log_service().get_history(user.id, since).await?;

    let body = history
        .into_iter()
        .map(|(date, log)| (format_date(date), DailyLogDto::from(log)))
        .collect();

    Ok(Json(ApiResponse::success(body)))
}

/// Replaces the caller's log for one day.
///
/// # Endpoint
/// `POST /api/log`
///
/// # Response
/// The stored log, with calories filled in for meals that arrived without them.
///
/// # Errors
/// Returns [`ApiError::ValidationError`] for malformed dates, blank names, or
/// invalid quantities.
pub async fn upsert_log(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<LogRequest>,
) -> Result<Json<ApiResponse<DailyLogDto>>, ApiError> {
    let date = validate_date(&payload.date)?;

    let log = DailyLogSnapshot {
        date,
        gym_visited: payload.gym_visited,
        workouts: payload.workouts.into_iter().map(Into::into).collect(),
        meals: payload.meals.into_iter().map(Into::into).collect(),
    };

    let stored = state.log_service().upsert_log(user.id, log).await?;
    Ok(Json(ApiResponse::success(DailyLogDto::from(stored))))
}

/// `GET /api/log/{date}`
pub async fn get_log(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    axum::extract::Path(date): axum::extract::Path<String>,
) -> Result<Json<ApiResponse<DailyLogDto>>, ApiError> {
    let date = validate_date(&date)?;

    let log = state
        .log_service()
        .get_log(user.id, date)
        .await?
        .ok_or_else(|| ApiError::not_found("Log for", format_date(date)))?;

    Ok(Json(ApiResponse::success(DailyLogDto::from(log))))
}
