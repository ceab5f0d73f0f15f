//! Item catalog model. Read-only reference data.

use serde::Serialize;
use sqlx::FromRow;

/// A catalog entry describing an item that can appear in inventories,
/// loadouts, and buy orders.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CatalogItem {
    pub item_guid: String,
    pub item_name: String,
    pub description: Option<String>,
    pub level: Option<i32>,
    pub rarity_min: Option<String>,
    pub rarity_max: Option<String>,
    pub icon_path: Option<String>,
    pub tags: serde_json::Value,
}
