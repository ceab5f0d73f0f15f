//! Repository for the `points_balance` table.

use sqlx::{PgConnection, PgPool};

use guildhall_core::types::UserId;

use crate::models::points::PointsBalance;

const COLUMNS: &str = "user_id, balance, updated_at";

/// Provides balance lookups and credits for guild points.
pub struct PointsRepo;

impl PointsRepo {
    /// Fetch a user's balance. Absent rows read as zero.
    pub async fn find_balance(pool: &PgPool, user_id: UserId) -> Result<i64, sqlx::Error> {
        let balance = sqlx::query_scalar::<_, i64>(
            "SELECT balance FROM points_balance WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
        Ok(balance.unwrap_or(0))
    }

    /// Credit points to a user, creating the row on first credit. Runs
    /// inside a caller-managed transaction.
    pub async fn credit(
        conn: &mut PgConnection,
        user_id: UserId,
        amount: i64,
    ) -> Result<PointsBalance, sqlx::Error> {
        let query = format!(
            "INSERT INTO points_balance (user_id, balance) VALUES ($1, $2) \
             ON CONFLICT (user_id) DO UPDATE SET \
                balance = points_balance.balance + EXCLUDED.balance, \
                updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PointsBalance>(&query)
            .bind(user_id)
            .bind(amount)
            .fetch_one(conn)
            .await
    }
}
