//! Handlers for item catalog lookups.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use guildhall_core::error::CoreError;
use guildhall_db::repositories::CatalogRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CatalogSearchParams {
    pub name: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /catalog
///
/// Case-insensitive name search over the item catalog.
pub async fn search_catalog(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<CatalogSearchParams>,
) -> AppResult<impl IntoResponse> {
    let limit = params.limit.unwrap_or(50).min(200);
    let offset = params.offset.unwrap_or(0);
    let items = CatalogRepo::search(&state.pool, params.name.as_deref(), limit, offset).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /catalog/{item_guid}
pub async fn get_catalog_item(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(item_guid): Path<String>,
) -> AppResult<impl IntoResponse> {
    let item = CatalogRepo::find_by_guid(&state.pool, &item_guid)
        .await?
        .ok_or_else(|| CoreError::NotFound {
            entity: "catalog item",
            id: item_guid,
        })?;
    Ok(Json(DataResponse { data: item }))
}
