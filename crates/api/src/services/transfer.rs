//! Transfer engine: every flow that moves items or points between members.
//!
//! Each operation runs in one transaction with `FOR UPDATE` locks on the
//! rows it debits, so concurrent transfers against the same line serialize
//! and conservation holds: stock is never created or destroyed, only moved.
//! Audit entries are inserted in the same transaction as the mutation they
//! record.

use sqlx::PgPool;

use guildhall_core::audit::{
    AuditAction, InventoryLine, OrderFill, OrderRecipient, TransferRecipient, TransferSource,
};
use guildhall_core::equipment::{self, Equipment, EquipmentSlot, EquippedItem};
use guildhall_core::error::CoreError;
use guildhall_core::rarity::Rarity;
use guildhall_core::status::{order_status, response_status};
use guildhall_core::types::{DbId, UserId};
use guildhall_db::models::buy_order::{BuyOrder, BuyOrderResponse, CreateBuyOrder};
use guildhall_db::models::character::Character;
use guildhall_db::models::inventory::{AddInventoryItem, InventoryItem};
use guildhall_db::repositories::{
    BuyOrderRepo, BuyOrderResponseRepo, CharacterRepo, InventoryRepo, PointsRepo,
};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::services::membership::{insert_audit, require_admin, require_member};

// ---------------------------------------------------------------------------
// Equipment
// ---------------------------------------------------------------------------

/// Equip an item into a character's loadout slot, enforcing the two-handed
/// exclusion. Owner only. Loadout edits are not audited.
pub async fn equip_item(
    pool: &PgPool,
    actor: AuthUser,
    character_id: DbId,
    slot: EquipmentSlot,
    item: EquippedItem,
) -> AppResult<Character> {
    item.rarity.parse::<Rarity>()?;

    let mut tx = pool.begin().await?;
    let character = CharacterRepo::find_by_id_for_update(&mut tx, character_id)
        .await?
        .ok_or_else(|| CoreError::not_found("character", character_id))?;
    if character.user_id != actor.user_id {
        return Err(CoreError::Forbidden("Only the owner can edit a loadout".into()).into());
    }

    let mut loadout = parse_equipment(&character)?;
    equipment::equip(&mut loadout, slot, item);

    let updated = write_equipment(&mut tx, character_id, &loadout).await?;
    tx.commit().await?;
    Ok(updated)
}

/// Clear a loadout slot. Owner only.
pub async fn unequip_item(
    pool: &PgPool,
    actor: AuthUser,
    character_id: DbId,
    slot: EquipmentSlot,
) -> AppResult<Character> {
    let mut tx = pool.begin().await?;
    let character = CharacterRepo::find_by_id_for_update(&mut tx, character_id)
        .await?
        .ok_or_else(|| CoreError::not_found("character", character_id))?;
    if character.user_id != actor.user_id {
        return Err(CoreError::Forbidden("Only the owner can edit a loadout".into()).into());
    }

    let mut loadout = parse_equipment(&character)?;
    equipment::unequip(&mut loadout, slot);

    let updated = write_equipment(&mut tx, character_id, &loadout).await?;
    tx.commit().await?;
    Ok(updated)
}

fn parse_equipment(character: &Character) -> AppResult<Equipment> {
    serde_json::from_value(character.equipment.clone())
        .map_err(|e| AppError::InternalError(format!("Corrupt equipment payload: {e}")))
}

async fn write_equipment(
    conn: &mut sqlx::PgConnection,
    character_id: DbId,
    loadout: &Equipment,
) -> AppResult<Character> {
    let value = serde_json::to_value(loadout)
        .map_err(|e| AppError::InternalError(format!("Failed to serialize equipment: {e}")))?;
    CharacterRepo::update_equipment(conn, character_id, &value)
        .await?
        .ok_or_else(|| CoreError::not_found("character", character_id).into())
}

// ---------------------------------------------------------------------------
// Inventory stock
// ---------------------------------------------------------------------------

/// Add stock to the actor's own inventory. Audited as `INVENTORY_ADD`.
pub async fn add_inventory(
    pool: &PgPool,
    actor: AuthUser,
    guild_id: DbId,
    input: &AddInventoryItem,
) -> AppResult<InventoryItem> {
    require_member(pool, guild_id, actor.user_id).await?;
    input.rarity.parse::<Rarity>()?;
    require_positive_quantity(input.quantity)?;

    let mut tx = pool.begin().await?;
    let item = InventoryRepo::upsert_add(
        &mut tx,
        actor.user_id,
        guild_id,
        &input.item_guid,
        &input.item_name,
        &input.rarity,
        input.quantity,
    )
    .await?;

    let action = AuditAction::InventoryAdd {
        new: InventoryLine {
            item_name: input.item_name.clone(),
            rarity: input.rarity.clone(),
            quantity: input.quantity,
        },
    };
    insert_audit(
        &mut tx,
        guild_id,
        actor.user_id,
        &action,
        "inventory",
        &item.id.to_string(),
    )
    .await?;
    tx.commit().await?;

    Ok(item)
}

/// Remove stock from a line. Owner or guild admin. Audited as
/// `INVENTORY_REMOVE`.
pub async fn remove_inventory(
    pool: &PgPool,
    actor: AuthUser,
    inventory_id: DbId,
    quantity: i64,
) -> AppResult<()> {
    require_positive_quantity(quantity)?;

    let mut tx = pool.begin().await?;
    let item = InventoryRepo::find_by_id_for_update(&mut tx, inventory_id)
        .await?
        .ok_or_else(|| CoreError::not_found("inventory item", inventory_id))?;
    if item.user_id != actor.user_id {
        require_admin(pool, item.guild_id, actor.user_id).await?;
    }
    if quantity > item.quantity {
        return Err(CoreError::InsufficientQuantity {
            requested: quantity,
            available: item.quantity,
        }
        .into());
    }

    InventoryRepo::remove_stock(&mut tx, inventory_id, quantity).await?;

    let action = AuditAction::InventoryRemove {
        old: InventoryLine {
            item_name: item.item_name.clone(),
            rarity: item.rarity.clone(),
            quantity,
        },
    };
    insert_audit(
        &mut tx,
        item.guild_id,
        actor.user_id,
        &action,
        "inventory",
        &inventory_id.to_string(),
    )
    .await?;
    tx.commit().await?;

    Ok(())
}

/// Move stock from the actor's line to another active member of the same
/// guild. Audited as `INVENTORY_TRANSFER`.
pub async fn transfer_inventory(
    pool: &PgPool,
    actor: AuthUser,
    inventory_id: DbId,
    to_user: UserId,
    quantity: i64,
) -> AppResult<InventoryItem> {
    require_positive_quantity(quantity)?;
    if to_user == actor.user_id {
        return Err(CoreError::InvalidRecipient("Cannot transfer to yourself".into()).into());
    }

    let mut tx = pool.begin().await?;
    let source = InventoryRepo::find_by_id_for_update(&mut tx, inventory_id)
        .await?
        .ok_or_else(|| CoreError::not_found("inventory item", inventory_id))?;
    if source.user_id != actor.user_id {
        return Err(CoreError::Forbidden("Only the owner can transfer a line".into()).into());
    }

    // The recipient must be an active member of the same guild.
    require_member(pool, source.guild_id, to_user)
        .await
        .map_err(|_| {
            AppError::Core(CoreError::InvalidRecipient(
                "Recipient is not an active member of this guild".into(),
            ))
        })?;

    if quantity > source.quantity {
        return Err(CoreError::InsufficientQuantity {
            requested: quantity,
            available: source.quantity,
        }
        .into());
    }

    let from_name = super::display_name(pool, source.guild_id, actor.user_id).await?;
    let to_name = super::display_name(pool, source.guild_id, to_user).await?;

    InventoryRepo::remove_stock(&mut tx, inventory_id, quantity).await?;
    let recipient_line = InventoryRepo::upsert_add(
        &mut tx,
        to_user,
        source.guild_id,
        &source.item_guid,
        &source.item_name,
        &source.rarity,
        quantity,
    )
    .await?;

    let action = AuditAction::InventoryTransfer {
        old: TransferSource {
            item_name: source.item_name.clone(),
            rarity: source.rarity.clone(),
            quantity,
            from_character_name: from_name,
        },
        new: TransferRecipient {
            to_character_name: to_name,
            quantity,
        },
    };
    insert_audit(
        &mut tx,
        source.guild_id,
        actor.user_id,
        &action,
        "inventory",
        &inventory_id.to_string(),
    )
    .await?;
    tx.commit().await?;

    Ok(recipient_line)
}

// ---------------------------------------------------------------------------
// Buy orders
// ---------------------------------------------------------------------------

/// Post a buy order to the guild marketplace. Admin only.
pub async fn create_order(
    pool: &PgPool,
    actor: AuthUser,
    guild_id: DbId,
    input: &CreateBuyOrder,
) -> AppResult<BuyOrder> {
    require_admin(pool, guild_id, actor.user_id).await?;
    input.rarity.parse::<Rarity>()?;
    require_positive_quantity(input.quantity)?;
    if input.points_reward <= 0 {
        return Err(CoreError::Validation("Points reward must be positive".into()).into());
    }

    let order = BuyOrderRepo::create(pool, guild_id, actor.user_id, input).await?;
    Ok(order)
}

/// Cancel an order. Creator or guild admin; completed orders stay completed.
pub async fn cancel_order(pool: &PgPool, actor: AuthUser, order_id: DbId) -> AppResult<BuyOrder> {
    let order = BuyOrderRepo::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| CoreError::not_found("buy order", order_id))?;
    if order.creator_id != actor.user_id {
        require_admin(pool, order.guild_id, actor.user_id).await?;
    }

    let mut tx = pool.begin().await?;
    let locked = BuyOrderRepo::find_by_id_for_update(&mut tx, order_id)
        .await?
        .ok_or_else(|| CoreError::not_found("buy order", order_id))?;
    if locked.status == order_status::COMPLETED {
        return Err(
            CoreError::AlreadyCompleted("Completed orders cannot be cancelled".into()).into(),
        );
    }
    let cancelled = BuyOrderRepo::update_status(&mut tx, order_id, order_status::CANCELLED)
        .await?
        .ok_or_else(|| AppError::from(CoreError::not_found("buy order", order_id)))?;
    tx.commit().await?;

    Ok(cancelled)
}

/// Offer to fill an order from one of the actor's inventory lines. Only
/// `open` orders accept responses; the response flips the order to
/// `pending` until it is accepted or rejected.
pub async fn respond_to_order(
    pool: &PgPool,
    actor: AuthUser,
    order_id: DbId,
    inventory_item_id: DbId,
) -> AppResult<BuyOrderResponse> {
    let mut tx = pool.begin().await?;
    let order = BuyOrderRepo::find_by_id_for_update(&mut tx, order_id)
        .await?
        .ok_or_else(|| CoreError::not_found("buy order", order_id))?;

    if order.status != order_status::OPEN {
        return Err(CoreError::Validation("Order is not open for responses".into()).into());
    }
    if order.creator_id == actor.user_id {
        return Err(CoreError::Validation("Cannot respond to your own order".into()).into());
    }

    let line = InventoryRepo::find_by_id_for_update(&mut tx, inventory_item_id)
        .await?
        .ok_or_else(|| CoreError::not_found("inventory item", inventory_item_id))?;
    if line.user_id != actor.user_id {
        return Err(CoreError::Forbidden("Responses must use your own inventory".into()).into());
    }
    if line.guild_id != order.guild_id {
        return Err(CoreError::Validation("Inventory line belongs to another guild".into()).into());
    }
    if line.item_guid != order.item_guid || line.rarity != order.rarity {
        return Err(
            CoreError::Validation("Inventory line does not match the ordered item".into()).into(),
        );
    }
    if line.quantity < order.quantity {
        return Err(CoreError::InsufficientStock(format!(
            "Order needs {} but the line holds {}",
            order.quantity, line.quantity
        ))
        .into());
    }

    let response =
        BuyOrderResponseRepo::create(&mut tx, order_id, actor.user_id, inventory_item_id).await?;
    BuyOrderRepo::update_status(&mut tx, order_id, order_status::PENDING).await?;
    tx.commit().await?;

    Ok(response)
}

/// Accept a response: move the stock to the creator, credit the responder,
/// and complete the order. Creator or guild admin. Audited as
/// `ORDER_COMPLETED`.
///
/// Completion is guarded by a conditional status flip, so accepting twice
/// credits exactly once; the second attempt fails with `ALREADY_COMPLETED`.
pub async fn accept_response(
    pool: &PgPool,
    actor: AuthUser,
    response_id: DbId,
) -> AppResult<BuyOrder> {
    let response = BuyOrderResponseRepo::find_by_id(pool, response_id)
        .await?
        .ok_or_else(|| CoreError::not_found("order response", response_id))?;
    let order = BuyOrderRepo::find_by_id(pool, response.order_id)
        .await?
        .ok_or_else(|| CoreError::not_found("buy order", response.order_id))?;
    if order.creator_id != actor.user_id {
        require_admin(pool, order.guild_id, actor.user_id).await?;
    }

    let from_name = super::display_name(pool, order.guild_id, response.responder_id).await?;
    let to_name = super::display_name(pool, order.guild_id, order.creator_id).await?;

    let mut tx = pool.begin().await?;
    // Lock order first, then the inventory line, matching the lock order in
    // respond_to_order. The conditional flip only matches open or pending
    // orders, so a concurrent completion or cancellation wins the race.
    let completed = match BuyOrderRepo::complete_if_fillable(&mut tx, order.id).await? {
        Some(order) => order,
        None => {
            let current = BuyOrderRepo::find_by_id_for_update(&mut tx, order.id)
                .await?
                .ok_or_else(|| CoreError::not_found("buy order", order.id))?;
            if current.status == order_status::CANCELLED {
                return Err(CoreError::Validation("Order was cancelled".into()).into());
            }
            return Err(CoreError::AlreadyCompleted(
                "Order has already been completed".into(),
            )
            .into());
        }
    };
    if response.status != response_status::PENDING {
        return Err(CoreError::Validation("Response is not pending".into()).into());
    }

    let line_id = response.inventory_item_id.ok_or_else(|| {
        AppError::Core(CoreError::InsufficientStock(
            "The offered inventory line no longer exists".into(),
        ))
    })?;
    let line = InventoryRepo::find_by_id_for_update(&mut tx, line_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::InsufficientStock(
                "The offered inventory line no longer exists".into(),
            ))
        })?;
    if line.quantity < completed.quantity {
        return Err(CoreError::InsufficientStock(format!(
            "Order needs {} but the line now holds {}",
            completed.quantity, line.quantity
        ))
        .into());
    }

    InventoryRepo::remove_stock(&mut tx, line.id, completed.quantity).await?;
    InventoryRepo::upsert_add(
        &mut tx,
        completed.creator_id,
        completed.guild_id,
        &completed.item_guid,
        &completed.item_name,
        &completed.rarity,
        completed.quantity,
    )
    .await?;
    BuyOrderResponseRepo::update_status(&mut tx, response_id, response_status::ACCEPTED).await?;
    PointsRepo::credit(&mut tx, response.responder_id, completed.points_reward).await?;

    let action = AuditAction::OrderCompleted {
        old: OrderFill {
            item_name: completed.item_name.clone(),
            rarity: completed.rarity.clone(),
            quantity: completed.quantity,
            points_reward: completed.points_reward,
            from_character_name: from_name,
        },
        new: OrderRecipient {
            to_character_name: to_name,
        },
    };
    insert_audit(
        &mut tx,
        completed.guild_id,
        actor.user_id,
        &action,
        "buy_order",
        &completed.id.to_string(),
    )
    .await?;
    tx.commit().await?;

    tracing::info!(
        order_id = completed.id,
        responder = %response.responder_id,
        points = completed.points_reward,
        "Buy order completed"
    );
    Ok(completed)
}

/// Reject a response. Creator or guild admin. When the last pending
/// response is rejected a `pending` order reopens.
pub async fn reject_response(
    pool: &PgPool,
    actor: AuthUser,
    response_id: DbId,
) -> AppResult<BuyOrderResponse> {
    let response = BuyOrderResponseRepo::find_by_id(pool, response_id)
        .await?
        .ok_or_else(|| CoreError::not_found("order response", response_id))?;
    let order = BuyOrderRepo::find_by_id(pool, response.order_id)
        .await?
        .ok_or_else(|| CoreError::not_found("buy order", response.order_id))?;
    if order.creator_id != actor.user_id {
        require_admin(pool, order.guild_id, actor.user_id).await?;
    }

    let mut tx = pool.begin().await?;
    let locked = BuyOrderRepo::find_by_id_for_update(&mut tx, order.id)
        .await?
        .ok_or_else(|| CoreError::not_found("buy order", order.id))?;
    if response.status != response_status::PENDING {
        return Err(CoreError::Validation("Response is not pending".into()).into());
    }

    let rejected =
        BuyOrderResponseRepo::update_status(&mut tx, response_id, response_status::REJECTED)
            .await?
            .ok_or_else(|| AppError::from(CoreError::not_found("order response", response_id)))?;

    if locked.status == order_status::PENDING
        && BuyOrderResponseRepo::count_pending(&mut tx, order.id).await? == 0
    {
        BuyOrderRepo::update_status(&mut tx, order.id, order_status::OPEN).await?;
    }
    tx.commit().await?;

    Ok(rejected)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn require_positive_quantity(quantity: i64) -> AppResult<()> {
    if quantity <= 0 {
        return Err(CoreError::Validation("Quantity must be positive".into()).into());
    }
    Ok(())
}
