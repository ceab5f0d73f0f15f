//! Audit trail read side: filtered, paginated, name-enriched listings.
//!
//! Rows come back as raw `action_type` + JSON snapshots; enrichment rebuilds
//! the typed [`AuditAction`] per row to render a description and resolve the
//! character names involved. The name filter applies after enrichment since
//! the names it matches are not columns.

use std::collections::HashMap;

use chrono::{NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use guildhall_core::audit::AuditAction;
use guildhall_core::types::{DbId, Timestamp, UserId};
use guildhall_db::models::audit::{AuditLog, AuditQuery};
use guildhall_db::repositories::{AuditLogRepo, CharacterRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::services::membership::require_admin;

/// Query parameters accepted by the audit listing endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditListParams {
    pub action_type: Option<String>,
    /// Case-insensitive substring matched against the acting member's name
    /// and the affected character's name. Applied after enrichment.
    pub character_name: Option<String>,
    /// Inclusive lower bound: a date (`YYYY-MM-DD`) or full RFC 3339 timestamp.
    pub date_from: Option<String>,
    /// Inclusive upper bound. A bare date extends to the end of that day.
    pub date_to: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// One enriched audit entry as returned by the listing endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedAuditLog {
    #[serde(flatten)]
    pub entry: AuditLog,
    /// Human-readable one-line description of the action.
    pub description: String,
    /// Display name of the acting member.
    pub actor_name: String,
    /// Name of the character the action affected, when the snapshot has one.
    pub affected_character_name: Option<String>,
}

/// Paginated enriched listing.
#[derive(Debug, Clone, Serialize)]
pub struct AuditListPage {
    pub items: Vec<EnrichedAuditLog>,
    pub total: i64,
}

/// List a guild's audit trail. Admin only.
pub async fn list_audit_logs(
    pool: &PgPool,
    actor: AuthUser,
    guild_id: DbId,
    params: &AuditListParams,
) -> AppResult<AuditListPage> {
    require_admin(pool, guild_id, actor.user_id).await?;

    let query = AuditQuery {
        action_type: params.action_type.clone(),
        user_id: None,
        from: parse_bound(params.date_from.as_deref(), false)?,
        to: parse_bound(params.date_to.as_deref(), true)?,
        limit: params.limit,
        offset: params.offset,
    };

    let logs = AuditLogRepo::query(pool, guild_id, &query).await?;
    let total = AuditLogRepo::count(pool, guild_id, &query).await?;

    let actor_names = resolve_actor_names(pool, guild_id, &logs).await?;

    let mut items: Vec<EnrichedAuditLog> = logs
        .into_iter()
        .map(|entry| enrich(entry, &actor_names))
        .collect();

    // Name matching needs the enriched names, so it narrows the fetched
    // page rather than the SQL result.
    if let Some(ref needle) = params.character_name {
        let needle = needle.to_lowercase();
        items.retain(|item| {
            item.actor_name.to_lowercase().contains(&needle)
                || item
                    .affected_character_name
                    .as_ref()
                    .is_some_and(|name| name.to_lowercase().contains(&needle))
        });
    }

    Ok(AuditListPage { items, total })
}

/// Build one enriched entry from a raw row. Unknown action types and
/// malformed snapshots degrade to the raw action type string instead of
/// failing the listing.
fn enrich(entry: AuditLog, actor_names: &HashMap<UserId, String>) -> EnrichedAuditLog {
    let action = AuditAction::from_row(
        &entry.action_type,
        entry.old_data.as_ref(),
        entry.new_data.as_ref(),
    );

    let description = action
        .as_ref()
        .map(AuditAction::describe)
        .unwrap_or_else(|| entry.action_type.clone());
    let affected_character_name = action
        .as_ref()
        .and_then(AuditAction::affected_character_name)
        .map(str::to_string);
    let actor_name = actor_names
        .get(&entry.user_id)
        .cloned()
        .unwrap_or_else(|| entry.user_id.to_string());

    EnrichedAuditLog {
        entry,
        description,
        actor_name,
        affected_character_name,
    }
}

/// Resolve display names for every acting user on the page in one query.
async fn resolve_actor_names(
    pool: &PgPool,
    guild_id: DbId,
    logs: &[AuditLog],
) -> AppResult<HashMap<UserId, String>> {
    let mut user_ids: Vec<UserId> = logs.iter().map(|log| log.user_id).collect();
    user_ids.sort_unstable();
    user_ids.dedup();
    if user_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let names = CharacterRepo::find_display_names(pool, guild_id, &user_ids).await?;
    Ok(names.into_iter().collect())
}

/// Parse a date bound. Bare dates snap to the start of the day, or the end
/// of it for upper bounds; full RFC 3339 timestamps pass through.
fn parse_bound(raw: Option<&str>, end_of_day: bool) -> AppResult<Option<Timestamp>> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    if let Ok(ts) = raw.parse::<Timestamp>() {
        return Ok(Some(ts));
    }

    let date = raw
        .parse::<NaiveDate>()
        .map_err(|_| AppError::BadRequest(format!("Invalid date: {raw}")))?;
    let naive = if end_of_day {
        date.and_hms_milli_opt(23, 59, 59, 999)
    } else {
        date.and_hms_opt(0, 0, 0)
    }
    .ok_or_else(|| AppError::BadRequest(format!("Invalid date: {raw}")))?;

    Ok(Some(Utc.from_utc_datetime(&naive)))
}
