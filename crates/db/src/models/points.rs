//! Guild points balance model.

use guildhall_core::types::{Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;

/// A user's guild points balance. Rows are created lazily on first credit.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PointsBalance {
    pub user_id: UserId,
    pub balance: i64,
    pub updated_at: Timestamp,
}
