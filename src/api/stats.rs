use axum::{
    Extension, Json,
    extract::{Query, State},
};
use std::sync::Arc;

use super::auth::CurrentUser;
use crate::api::{ApiError, ApiResponse, AppState, ConsistencyQuery};
use crate::services::{ConsistencyReport, StatsError, StreakSummary};
use crate::stats::Leaderboard;

impl From<StatsError> for ApiError {
    fn from(err: StatsError) -> Self {
        match err {
            StatsError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

/// `GET /api/stats/streak`
pub async fn get_streak(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<StreakSummary>>, ApiError> {
    let summary = state.stats_service().streak(user.id).await?;
    Ok(Json(ApiResponse::success(summary)))
}

/// `GET /api/stats/consistency?range=week|month|year|all`
pub async fn get_consistency(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ConsistencyQuery>,
) -> Result<Json<ApiResponse<ConsistencyReport>>, ApiError> {
    let report = state
        .stats_service()
        .consistency(user.id, query.range)
        .await?;
    Ok(Json(ApiResponse::success(report)))
}

/// Top entries plus the caller's own position in the full ranking.
///
/// # Endpoint
/// `GET /api/leaderboard`
///
/// Anonymous callers get the board with `requester: null`.
pub async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
    user: Option<Extension<CurrentUser>>,
) -> Result<Json<ApiResponse<Leaderboard>>, ApiError> {
    let requester = user.map(|Extension(u)| u.id);
    let board = state.stats_service().leaderboard(requester).await?;
    Ok(Json(ApiResponse::success(board)))
}
