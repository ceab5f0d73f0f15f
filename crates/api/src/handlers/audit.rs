//! Handler for the audit trail listing endpoint.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;

use guildhall_core::types::DbId;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::audit_query::{self, AuditListParams};
use crate::state::AppState;

/// GET /guilds/{guild_id}/audit-logs
///
/// Filtered, paginated, name-enriched audit trail. Admin only.
pub async fn list_audit_logs(
    State(state): State<AppState>,
    user: AuthUser,
    Path(guild_id): Path<DbId>,
    Query(params): Query<AuditListParams>,
) -> AppResult<impl IntoResponse> {
    let page = audit_query::list_audit_logs(&state.pool, user, guild_id, &params).await?;
    Ok(Json(DataResponse { data: page }))
}
