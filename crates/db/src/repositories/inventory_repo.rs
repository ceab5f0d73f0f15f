//! Repository for the `inventory_items` table.
//!
//! Additions go through `upsert_add`, which merges onto the existing
//! `(user, guild, item_guid, rarity)` line via `uq_inventory_line`. Removals
//! go through `remove_stock`, which deletes the row once it hits zero so
//! empty lines never linger.

use sqlx::{PgConnection, PgPool};

use guildhall_core::types::{DbId, UserId};

use crate::models::inventory::{InventoryHolder, InventoryItem};

const COLUMNS: &str = "\
    id, user_id, guild_id, item_guid, item_name, rarity, quantity, \
    created_at, updated_at";

/// Provides stock operations for member inventories.
pub struct InventoryRepo;

impl InventoryRepo {
    /// Find an inventory line by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<InventoryItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM inventory_items WHERE id = $1");
        sqlx::query_as::<_, InventoryItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an inventory line by ID with a row lock, inside a caller-managed
    /// transaction.
    pub async fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<InventoryItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM inventory_items WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, InventoryItem>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List a member's inventory within a guild, ordered by item name.
    pub async fn list_by_user(
        pool: &PgPool,
        guild_id: DbId,
        user_id: UserId,
    ) -> Result<Vec<InventoryItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM inventory_items \
             WHERE guild_id = $1 AND user_id = $2 \
             ORDER BY item_name ASC, rarity ASC"
        );
        sqlx::query_as::<_, InventoryItem>(&query)
            .bind(guild_id)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// List every inventory line in a guild, ordered by item name.
    pub async fn list_by_guild(
        pool: &PgPool,
        guild_id: DbId,
    ) -> Result<Vec<InventoryItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM inventory_items \
             WHERE guild_id = $1 \
             ORDER BY item_name ASC, rarity ASC, user_id ASC"
        );
        sqlx::query_as::<_, InventoryItem>(&query)
            .bind(guild_id)
            .fetch_all(pool)
            .await
    }

    /// Holders of a given `(item_guid, rarity)` pair within a guild, largest
    /// stake first.
    pub async fn find_holders(
        pool: &PgPool,
        guild_id: DbId,
        item_guid: &str,
        rarity: &str,
    ) -> Result<Vec<InventoryHolder>, sqlx::Error> {
        sqlx::query_as::<_, InventoryHolder>(
            "SELECT user_id, quantity FROM inventory_items \
             WHERE guild_id = $1 AND item_guid = $2 AND rarity = $3 \
             ORDER BY quantity DESC",
        )
        .bind(guild_id)
        .bind(item_guid)
        .bind(rarity)
        .fetch_all(pool)
        .await
    }

    /// Add stock to a member's line, merging onto an existing row when the
    /// dedup key matches. Runs inside a caller-managed transaction.
    pub async fn upsert_add(
        conn: &mut PgConnection,
        user_id: UserId,
        guild_id: DbId,
        item_guid: &str,
        item_name: &str,
        rarity: &str,
        quantity: i64,
    ) -> Result<InventoryItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO inventory_items \
                (user_id, guild_id, item_guid, item_name, rarity, quantity) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT ON CONSTRAINT uq_inventory_line DO UPDATE SET \
                quantity = inventory_items.quantity + EXCLUDED.quantity, \
                updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InventoryItem>(&query)
            .bind(user_id)
            .bind(guild_id)
            .bind(item_guid)
            .bind(item_name)
            .bind(rarity)
            .bind(quantity)
            .fetch_one(conn)
            .await
    }

    /// Subtract stock from a line, deleting the row when it reaches zero.
    /// Runs inside a caller-managed transaction; the caller must hold the
    /// row lock and have verified the available quantity.
    ///
    /// Returns the remaining quantity (0 when the row was deleted).
    pub async fn remove_stock(
        conn: &mut PgConnection,
        id: DbId,
        quantity: i64,
    ) -> Result<i64, sqlx::Error> {
        // `quantity > $2` keeps the row above the positive-quantity check;
        // an exact match deletes the row instead.
        let remaining = sqlx::query_scalar::<_, i64>(
            "UPDATE inventory_items \
             SET quantity = quantity - $2, updated_at = NOW() \
             WHERE id = $1 AND quantity > $2 \
             RETURNING quantity",
        )
        .bind(id)
        .bind(quantity)
        .fetch_optional(&mut *conn)
        .await?;

        if let Some(remaining) = remaining {
            return Ok(remaining);
        }

        let result = sqlx::query("DELETE FROM inventory_items WHERE id = $1 AND quantity = $2")
            .bind(id)
            .bind(quantity)
            .execute(conn)
            .await?;
        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        Ok(0)
    }
}
