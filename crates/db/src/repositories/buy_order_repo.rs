//! Repositories for the `buy_orders` and `buy_order_responses` tables.

use sqlx::{PgConnection, PgPool};

use guildhall_core::types::{DbId, UserId};

use crate::models::buy_order::{BuyOrder, BuyOrderResponse, CreateBuyOrder};

const ORDER_COLUMNS: &str = "\
    id, guild_id, creator_id, item_guid, item_name, rarity, quantity, \
    points_reward, status, created_at, updated_at";

const RESPONSE_COLUMNS: &str =
    "id, order_id, responder_id, inventory_item_id, status, created_at, updated_at";

// ---------------------------------------------------------------------------
// BuyOrderRepo
// ---------------------------------------------------------------------------

/// Provides CRUD and status transitions for buy orders.
pub struct BuyOrderRepo;

impl BuyOrderRepo {
    /// Post a new buy order. Starts in `open` status.
    pub async fn create(
        pool: &PgPool,
        guild_id: DbId,
        creator_id: UserId,
        input: &CreateBuyOrder,
    ) -> Result<BuyOrder, sqlx::Error> {
        let query = format!(
            "INSERT INTO buy_orders \
                (guild_id, creator_id, item_guid, item_name, rarity, quantity, points_reward) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {ORDER_COLUMNS}"
        );
        sqlx::query_as::<_, BuyOrder>(&query)
            .bind(guild_id)
            .bind(creator_id)
            .bind(&input.item_guid)
            .bind(&input.item_name)
            .bind(&input.rarity)
            .bind(input.quantity)
            .bind(input.points_reward)
            .fetch_one(pool)
            .await
    }

    /// Find a buy order by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<BuyOrder>, sqlx::Error> {
        let query = format!("SELECT {ORDER_COLUMNS} FROM buy_orders WHERE id = $1");
        sqlx::query_as::<_, BuyOrder>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a buy order by ID with a row lock, inside a caller-managed
    /// transaction.
    pub async fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<BuyOrder>, sqlx::Error> {
        let query = format!("SELECT {ORDER_COLUMNS} FROM buy_orders WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, BuyOrder>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List a guild's buy orders, newest first.
    pub async fn list_by_guild(
        pool: &PgPool,
        guild_id: DbId,
    ) -> Result<Vec<BuyOrder>, sqlx::Error> {
        let query = format!(
            "SELECT {ORDER_COLUMNS} FROM buy_orders \
             WHERE guild_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, BuyOrder>(&query)
            .bind(guild_id)
            .fetch_all(pool)
            .await
    }

    /// Set an order's status. Runs inside a caller-managed transaction; the
    /// caller holds the row lock and has validated the transition.
    pub async fn update_status(
        conn: &mut PgConnection,
        id: DbId,
        status: &str,
    ) -> Result<Option<BuyOrder>, sqlx::Error> {
        let query = format!(
            "UPDATE buy_orders SET status = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {ORDER_COLUMNS}"
        );
        sqlx::query_as::<_, BuyOrder>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(conn)
            .await
    }

    /// Flip an order to `completed` if it is still fillable. Runs inside a
    /// caller-managed transaction.
    ///
    /// Returns the updated order, or `None` when the order was already
    /// completed or cancelled (the guard makes double completion a no-op).
    pub async fn complete_if_fillable(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<BuyOrder>, sqlx::Error> {
        let query = format!(
            "UPDATE buy_orders SET status = 'completed', updated_at = NOW() \
             WHERE id = $1 AND status IN ('open', 'pending') \
             RETURNING {ORDER_COLUMNS}"
        );
        sqlx::query_as::<_, BuyOrder>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }
}

// ---------------------------------------------------------------------------
// BuyOrderResponseRepo
// ---------------------------------------------------------------------------

/// Provides CRUD operations for buy order responses.
pub struct BuyOrderResponseRepo;

impl BuyOrderResponseRepo {
    /// Record a member's offer to fill an order from an inventory line.
    /// Runs inside a caller-managed transaction.
    pub async fn create(
        conn: &mut PgConnection,
        order_id: DbId,
        responder_id: UserId,
        inventory_item_id: DbId,
    ) -> Result<BuyOrderResponse, sqlx::Error> {
        let query = format!(
            "INSERT INTO buy_order_responses (order_id, responder_id, inventory_item_id) \
             VALUES ($1, $2, $3) \
             RETURNING {RESPONSE_COLUMNS}"
        );
        sqlx::query_as::<_, BuyOrderResponse>(&query)
            .bind(order_id)
            .bind(responder_id)
            .bind(inventory_item_id)
            .fetch_one(conn)
            .await
    }

    /// Find a response by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<BuyOrderResponse>, sqlx::Error> {
        let query = format!("SELECT {RESPONSE_COLUMNS} FROM buy_order_responses WHERE id = $1");
        sqlx::query_as::<_, BuyOrderResponse>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List responses to an order, oldest first.
    pub async fn list_by_order(
        pool: &PgPool,
        order_id: DbId,
    ) -> Result<Vec<BuyOrderResponse>, sqlx::Error> {
        let query = format!(
            "SELECT {RESPONSE_COLUMNS} FROM buy_order_responses \
             WHERE order_id = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, BuyOrderResponse>(&query)
            .bind(order_id)
            .fetch_all(pool)
            .await
    }

    /// List responses for every order of a guild, oldest first. One query
    /// feeds the order listing without an N+1 fan-out.
    pub async fn list_by_guild(
        pool: &PgPool,
        guild_id: DbId,
    ) -> Result<Vec<BuyOrderResponse>, sqlx::Error> {
        let query = format!(
            "SELECT r.id, r.order_id, r.responder_id, r.inventory_item_id, \
                    r.status, r.created_at, r.updated_at \
             FROM buy_order_responses r \
             JOIN buy_orders o ON o.id = r.order_id \
             WHERE o.guild_id = $1 \
             ORDER BY r.created_at ASC"
        );
        sqlx::query_as::<_, BuyOrderResponse>(&query)
            .bind(guild_id)
            .fetch_all(pool)
            .await
    }

    /// Count an order's still-pending responses. Runs inside a
    /// caller-managed transaction.
    pub async fn count_pending(
        conn: &mut PgConnection,
        order_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM buy_order_responses \
             WHERE order_id = $1 AND status = 'pending'",
        )
        .bind(order_id)
        .fetch_one(conn)
        .await
    }

    /// Set a response's status. Runs inside a caller-managed transaction.
    pub async fn update_status(
        conn: &mut PgConnection,
        id: DbId,
        status: &str,
    ) -> Result<Option<BuyOrderResponse>, sqlx::Error> {
        let query = format!(
            "UPDATE buy_order_responses SET status = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {RESPONSE_COLUMNS}"
        );
        sqlx::query_as::<_, BuyOrderResponse>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(conn)
            .await
    }
}
