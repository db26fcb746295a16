use axum::{
    extract::{DefaultBodyLimit, Path, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use tracing::{instrument, warn};

use crate::{error::AppError, meals::repo_types::MealPhoto, state::AppState};

use super::services::DetachOutcome;

pub fn photo_routes(max_photo_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/meal/:meal_id/photo/:photo_id",
            post(attach_photo).delete(detach_photo),
        )
        .layer(DefaultBodyLimit::max(max_photo_bytes))
}

/// POST /api/meal/{meal_id}/photo/{photo_id} with the raw image as body
#[instrument(skip(state, headers, body), fields(size = body.len()))]
pub async fn attach_photo(
    State(state): State<AppState>,
    Path((meal_id, photo_id)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<MealPhoto>), AppError> {
    if meal_id.trim().is_empty() || photo_id.trim().is_empty() {
        return Err(AppError::BadRequest("Meal ID and photo ID are required".into()));
    }
    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());

    state
        .photos
        .attach(&meal_id, &photo_id, body, content_type)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MealPhoto {
            id: photo_id,
            meal_id,
        }),
    ))
}

/// DELETE /api/meal/{meal_id}/photo/{photo_id}
///
/// The photo id alone identifies the association; `meal_id` is only logged.
#[instrument(skip(state))]
pub async fn detach_photo(
    State(state): State<AppState>,
    Path((meal_id, photo_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    if let DetachOutcome::OrphanedBlob = state.photos.detach(&photo_id).await? {
        warn!(%photo_id, "photo detached, object left for cleanup");
    }
    Ok(StatusCode::NO_CONTENT)
}
