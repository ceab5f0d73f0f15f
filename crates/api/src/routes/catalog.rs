//! Route definitions for the item catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/catalog", get(catalog::search_catalog))
        .route("/catalog/{item_guid}", get(catalog::get_catalog_item))
}
