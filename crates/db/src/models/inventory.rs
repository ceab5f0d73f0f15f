//! Inventory entity model and DTOs.
//!
//! One row per `(user, guild, item_guid, rarity)` line; the unique
//! constraint `uq_inventory_line` makes additions merge instead of
//! duplicating.

use guildhall_core::types::{DbId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An inventory line owned by one member within a guild.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InventoryItem {
    pub id: DbId,
    pub user_id: UserId,
    pub guild_id: DbId,
    pub item_guid: String,
    pub item_name: String,
    pub rarity: String,
    pub quantity: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for adding stock to a member's inventory.
#[derive(Debug, Clone, Deserialize)]
pub struct AddInventoryItem {
    pub item_guid: String,
    pub item_name: String,
    pub rarity: String,
    pub quantity: i64,
}

/// One aggregated line of the guild-wide inventory view: total stock of an
/// `(item, rarity)` pair plus the holders contributing to it.
#[derive(Debug, Clone, Serialize)]
pub struct GuildInventoryLine {
    pub item_guid: String,
    pub item_name: String,
    pub rarity: String,
    pub total_quantity: i64,
    pub holders: Vec<InventoryHolder>,
}

/// A single member's contribution to an aggregated guild inventory line.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InventoryHolder {
    pub user_id: UserId,
    pub quantity: i64,
}
