//! Handlers for member and guild inventory endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use guildhall_core::types::{DbId, UserId};
use guildhall_db::models::inventory::{
    AddInventoryItem, GuildInventoryLine, InventoryHolder, InventoryItem,
};
use guildhall_db::repositories::InventoryRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::{membership, transfer};
use crate::state::AppState;

/// GET /guilds/{guild_id}/inventory
///
/// Guild-wide view: one line per `(item, rarity)` pair with total stock and
/// the members holding it.
pub async fn guild_inventory(
    State(state): State<AppState>,
    user: AuthUser,
    Path(guild_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    membership::require_member(&state.pool, guild_id, user.user_id).await?;
    let items = InventoryRepo::list_by_guild(&state.pool, guild_id).await?;
    Ok(Json(DataResponse {
        data: group_by_item(items),
    }))
}

/// GET /guilds/{guild_id}/inventory/mine
pub async fn my_inventory(
    State(state): State<AppState>,
    user: AuthUser,
    Path(guild_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    membership::require_member(&state.pool, guild_id, user.user_id).await?;
    let items = InventoryRepo::list_by_user(&state.pool, guild_id, user.user_id).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /guilds/{guild_id}/inventory
pub async fn add_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(guild_id): Path<DbId>,
    Json(input): Json<AddInventoryItem>,
) -> AppResult<impl IntoResponse> {
    let item = transfer::add_inventory(&state.pool, user, guild_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

#[derive(Debug, Deserialize)]
pub struct RemoveItemPayload {
    pub quantity: i64,
}

/// DELETE /inventory/{id}
///
/// Owner or guild admin. Removes `quantity` units; the line disappears when
/// it reaches zero.
pub async fn remove_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(inventory_id): Path<DbId>,
    Json(payload): Json<RemoveItemPayload>,
) -> AppResult<impl IntoResponse> {
    transfer::remove_inventory(&state.pool, user, inventory_id, payload.quantity).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct TransferPayload {
    pub to_user_id: UserId,
    pub quantity: i64,
}

/// POST /inventory/{id}/transfer
///
/// Owner only; the recipient must be an active member of the same guild.
pub async fn transfer_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(inventory_id): Path<DbId>,
    Json(payload): Json<TransferPayload>,
) -> AppResult<impl IntoResponse> {
    let recipient_line = transfer::transfer_inventory(
        &state.pool,
        user,
        inventory_id,
        payload.to_user_id,
        payload.quantity,
    )
    .await?;
    Ok(Json(DataResponse {
        data: recipient_line,
    }))
}

/// Fold per-member rows into aggregated guild lines. Input is ordered by
/// item name, rarity, holder, so grouping is a single pass.
fn group_by_item(items: Vec<InventoryItem>) -> Vec<GuildInventoryLine> {
    let mut lines: Vec<GuildInventoryLine> = Vec::new();
    for item in items {
        match lines.last_mut() {
            Some(line) if line.item_guid == item.item_guid && line.rarity == item.rarity => {
                line.total_quantity += item.quantity;
                line.holders.push(InventoryHolder {
                    user_id: item.user_id,
                    quantity: item.quantity,
                });
            }
            _ => lines.push(GuildInventoryLine {
                item_guid: item.item_guid,
                item_name: item.item_name,
                rarity: item.rarity,
                total_quantity: item.quantity,
                holders: vec![InventoryHolder {
                    user_id: item.user_id,
                    quantity: item.quantity,
                }],
            }),
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn item(guid: &str, rarity: &str, user: Uuid, quantity: i64) -> InventoryItem {
        InventoryItem {
            id: 1,
            user_id: user,
            guild_id: 1,
            item_guid: guid.to_string(),
            item_name: guid.to_uppercase(),
            rarity: rarity.to_string(),
            quantity,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn groups_adjacent_rows_by_item_and_rarity() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let lines = group_by_item(vec![
            item("ore", "Common", alice, 5),
            item("ore", "Common", bob, 3),
            item("ore", "Rare", alice, 1),
            item("wood", "Common", bob, 7),
        ]);

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].total_quantity, 8);
        assert_eq!(lines[0].holders.len(), 2);
        assert_eq!(lines[1].total_quantity, 1);
        assert_eq!(lines[2].item_guid, "wood");
    }

    #[test]
    fn empty_inventory_groups_to_nothing() {
        assert!(group_by_item(Vec::new()).is_empty());
    }
}
