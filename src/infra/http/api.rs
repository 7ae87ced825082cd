//! Public catalog API handlers.
//!
//! Handlers stay thin: parse parameters, call the catalog service, emit the
//! result shape as JSON. Envelope decoration beyond the result shapes is
//! left to downstream response formatting.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use crate::application::catalog::listing::ListingQuery;
use crate::application::catalog::service::{CatalogError, CatalogService};
use crate::application::catalog::types::{ArchiveView, EditionDetail, ListingResult};
use crate::application::repos::RepoError;

use super::error::ApiError;

#[derive(Clone)]
pub struct ApiState {
    pub catalog: Arc<CatalogService>,
}

#[derive(Debug, Deserialize)]
pub struct ListingParams {
    #[serde(rename = "type")]
    pub edition_type: Option<String>,
    pub letter: Option<String>,
    pub page: Option<u32>,
}

pub async fn list_editions(
    State(state): State<ApiState>,
    Query(params): Query<ListingParams>,
) -> Result<Json<ListingResult>, ApiError> {
    // Empty filter values read as no filter, like absent parameters.
    let query = ListingQuery {
        edition_type: params.edition_type.filter(|value| !value.is_empty()),
        letter: params.letter.filter(|value| !value.is_empty()),
        page: params.page.unwrap_or(1),
    };
    let result = state.catalog.listing(query).await.map_err(catalog_to_api)?;
    Ok(Json(result))
}

pub async fn edition_detail(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<Json<EditionDetail>, ApiError> {
    let detail = state.catalog.edition(id).await.map_err(catalog_to_api)?;
    Ok(Json(detail))
}

pub async fn edition_year(
    State(state): State<ApiState>,
    Path((id, year)): Path<(i64, i32)>,
) -> Result<Json<ArchiveView>, ApiError> {
    let view = state
        .catalog
        .archive(id, year, None)
        .await
        .map_err(catalog_to_api)?;
    Ok(Json(view))
}

pub async fn edition_month(
    State(state): State<ApiState>,
    Path((id, year, month)): Path<(i64, i32, u8)>,
) -> Result<Json<ArchiveView>, ApiError> {
    let view = state
        .catalog
        .archive(id, year, Some(month))
        .await
        .map_err(catalog_to_api)?;
    Ok(Json(view))
}

/// External write paths call this after any edition or book mutation.
pub async fn invalidate_cache(State(state): State<ApiState>) -> StatusCode {
    state.catalog.invalidate();
    StatusCode::NO_CONTENT
}

fn catalog_to_api(error: CatalogError) -> ApiError {
    match error {
        CatalogError::EditionNotFound { .. } => ApiError::not_found("Edition not found"),
        CatalogError::Repo(RepoError::Timeout) => ApiError::unavailable("Catalog store timed out"),
        CatalogError::Repo(err) => ApiError::internal("Catalog store failure", err.to_string()),
    }
}
