use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{error::AppError, state::AppState};

use super::dto::{CreateMealRequest, MealsQuery};
use super::repo_types::Meal;
use super::services;

pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals))
        .route("/meal", post(create_meal))
        .route("/meal/:meal_id", delete(delete_meal))
}

/// GET /api/meals?from=<RFC3339>&to=<RFC3339>
#[instrument(skip(state, query))]
pub async fn list_meals(
    State(state): State<AppState>,
    query: Result<Query<MealsQuery>, QueryRejection>,
) -> Result<Json<Vec<Meal>>, AppError> {
    let Query(query) = query.map_err(|e| {
        warn!(error = %e, "bad meals query");
        AppError::BadRequest("Invalid query parameters".into())
    })?;
    let range = query.into_range().map_err(AppError::BadRequest)?;

    let meals = services::list_meals(state.meals.as_ref(), range).await?;
    Ok(Json(meals))
}

/// POST /api/meal { id, comment? }
#[instrument(skip(state, payload))]
pub async fn create_meal(
    State(state): State<AppState>,
    payload: Result<Json<CreateMealRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Meal>), AppError> {
    let Json(req) = payload.map_err(|e| {
        warn!(error = %e, "bad meal payload");
        AppError::BadRequest("Invalid request payload".into())
    })?;

    let meal = services::create_meal(state.meals.as_ref(), req).await?;
    Ok((StatusCode::CREATED, Json(meal)))
}

/// DELETE /api/meal/{id}
#[instrument(skip(state))]
pub async fn delete_meal(
    State(state): State<AppState>,
    Path(meal_id): Path<String>,
) -> Result<StatusCode, AppError> {
    services::delete_meal(state.meals.as_ref(), &meal_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
