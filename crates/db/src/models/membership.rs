//! Guild membership entity model and DTOs.
//!
//! A membership row ties a user to a guild and carries the user's
//! guild-scoped role (`member`/`admin`) and status (`pending`/`active`).

use guildhall_core::types::{DbId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user's membership in a guild.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GuildMembership {
    pub id: DbId,
    pub guild_id: DbId,
    pub user_id: UserId,
    pub role: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a membership.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMembership {
    pub guild_id: DbId,
    pub user_id: UserId,
    /// Defaults to `member` when omitted.
    pub role: Option<String>,
    /// Defaults to `pending` when omitted.
    pub status: Option<String>,
}
