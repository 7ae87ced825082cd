//! HTTP surface: route table and shared state.

mod api;
mod error;

pub use api::ApiState;

use axum::Router;
use axum::routing::{get, post};

/// Public catalog API router.
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/editions", get(api::list_editions))
        .route("/api/editions/{id}", get(api::edition_detail))
        .route("/api/editions/{id}/{year}", get(api::edition_year))
        .route("/api/editions/{id}/{year}/{month}", get(api::edition_month))
        .route("/api/editions/cache/invalidate", post(api::invalidate_cache))
        .with_state(state)
}
