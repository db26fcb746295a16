pub mod handlers;
pub mod repo;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub fn router(max_photo_bytes: usize) -> Router<AppState> {
    Router::new().merge(handlers::photo_routes(max_photo_bytes))
}
