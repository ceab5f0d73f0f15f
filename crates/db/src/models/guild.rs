//! Guild entity model and DTOs.

use guildhall_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A guild. The root scope for memberships, rosters, inventory, orders,
/// and the audit trail.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Guild {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a guild.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGuild {
    pub name: String,
}
