//! Character entity model and DTOs.
//!
//! Skills and the equipment loadout are persisted as JSONB blobs; the typed
//! views live in `guildhall_core::skills` and `guildhall_core::equipment`.

use guildhall_core::types::{DbId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A guild character on the roster.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Character {
    pub id: DbId,
    pub user_id: UserId,
    pub guild_id: DbId,
    pub name: String,
    pub character_type: String,
    pub primary_class: String,
    pub secondary_class: String,
    pub status: String,
    pub skills: serde_json::Value,
    pub equipment: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a character. Skills are zero-initialized server-side and
/// the loadout starts empty, so neither appears here.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCharacter {
    pub name: String,
    pub character_type: String,
    pub primary_class: String,
    pub secondary_class: String,
}

/// DTO for a partial character update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCharacter {
    pub name: Option<String>,
    pub character_type: Option<String>,
    pub primary_class: Option<String>,
    pub secondary_class: Option<String>,
    pub skills: Option<serde_json::Value>,
}
