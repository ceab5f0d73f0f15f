//! Buy order and order response entity models and DTOs.

use guildhall_core::types::{DbId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A points-funded buy order posted to the guild marketplace.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BuyOrder {
    pub id: DbId,
    pub guild_id: DbId,
    pub creator_id: UserId,
    pub item_guid: String,
    pub item_name: String,
    pub rarity: String,
    pub quantity: i64,
    pub points_reward: i64,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for posting a buy order.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBuyOrder {
    pub item_guid: String,
    pub item_name: String,
    pub rarity: String,
    pub quantity: i64,
    pub points_reward: i64,
}

/// A member's offer to fill a buy order from a specific inventory line.
///
/// `inventory_item_id` is `None` once the backing line is gone, which
/// happens when an accepted fill consumes the line exactly.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BuyOrderResponse {
    pub id: DbId,
    pub order_id: DbId,
    pub responder_id: UserId,
    pub inventory_item_id: Option<DbId>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A buy order together with its responses, as returned by the listing
/// endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct BuyOrderWithResponses {
    #[serde(flatten)]
    pub order: BuyOrder,
    pub responses: Vec<BuyOrderResponse>,
}
