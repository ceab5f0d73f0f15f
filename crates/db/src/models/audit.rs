//! Audit log entity model and DTOs.
//!
//! Audit logs are append-only and have no `updated_at`. The typed action
//! payloads live in `guildhall_core::audit`; rows persist them as
//! `old_data`/`new_data` JSONB snapshots.

use guildhall_core::types::{DbId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single audit log entry. Immutable once created.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditLog {
    pub id: DbId,
    pub guild_id: DbId,
    pub action_type: String,
    pub entity_type: String,
    pub entity_id: String,
    pub user_id: UserId,
    pub old_data: Option<serde_json::Value>,
    pub new_data: Option<serde_json::Value>,
    pub created_at: Timestamp,
}

/// DTO for inserting a new audit log entry.
#[derive(Debug, Clone)]
pub struct CreateAuditLog {
    pub guild_id: DbId,
    pub action_type: String,
    pub entity_type: String,
    pub entity_id: String,
    pub user_id: UserId,
    pub old_data: Option<serde_json::Value>,
    pub new_data: Option<serde_json::Value>,
}

/// Filter parameters for querying a guild's audit trail.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditQuery {
    pub action_type: Option<String>,
    pub user_id: Option<UserId>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
