//! Food reference lookups backing meal autocomplete.

use axum::{
    Json,
    extract::Query,
};

use super::validation::validate_limit;
use crate::api::{ApiError, ApiResponse, FoodSearchQuery, ResolveQuery, ResolvedCalories};
use crate::nutrition::{self, FoodReference};

const DEFAULT_SEARCH_LIMIT: usize = 20;

/// `GET /api/foods?q=&limit=`
pub async fn search_foods(
    Query(query): Query<FoodSearchQuery>,
) -> Result<Json<ApiResponse<Vec<FoodReference>>>, ApiError> {
    let limit = validate_limit(query.limit.unwrap_or(DEFAULT_SEARCH_LIMIT))?;
    let foods = nutrition::search_foods(&query.q, limit)
        .into_iter()
        .copied()
        .collect();
    Ok(Json(ApiResponse::success(foods)))
}

/// `GET /api/foods/resolve?name=&quantity=&unit=`
///
/// Unknown foods resolve to 0 calories with no match.
pub async fn resolve_food(
    Query(query): Query<ResolveQuery>,
) -> Result<Json<ApiResponse<ResolvedCalories>>, ApiError> {
    if !query.quantity.is_finite() || query.quantity < 0.0 {
        return Err(ApiError::validation("Quantity must be a non-negative number"));
    }

    let found = nutrition::find_food(&query.name);
    let calories = found.map_or(0, |m| {
        nutrition::calories_for(m.food, query.quantity, query.unit)
    });

    Ok(Json(ApiResponse::success(ResolvedCalories {
        name: query.name.trim().to_string(),
        quantity: query.quantity,
        unit: query.unit,
        calories,
        matched: found.map(|m| m.food.name.to_string()),
        match_kind: found.map(|m| m.kind),
    })))
}
