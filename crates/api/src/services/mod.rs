//! Domain services: transactional flows composed from repositories.
//!
//! Handlers stay thin; everything that touches more than one row, or needs
//! to commit an audit entry with its mutation, lives here.

pub mod audit_query;
pub mod membership;
pub mod transfer;

use sqlx::PgPool;

use guildhall_core::types::{DbId, UserId};
use guildhall_db::repositories::CharacterRepo;

use crate::error::AppResult;

/// A user's display name within a guild: their earliest-created character's
/// name, falling back to the raw user id for members without a character.
pub(crate) async fn display_name(
    pool: &PgPool,
    guild_id: DbId,
    user_id: UserId,
) -> AppResult<String> {
    let names = CharacterRepo::find_display_names(pool, guild_id, &[user_id]).await?;
    Ok(names
        .into_iter()
        .next()
        .map(|(_, name)| name)
        .unwrap_or_else(|| user_id.to_string()))
}
