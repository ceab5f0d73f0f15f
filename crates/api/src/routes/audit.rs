//! Route definitions for the audit trail.

use axum::routing::get;
use axum::Router;

use crate::handlers::audit;
use crate::state::AppState;

/// Admin only, enforced in the service layer against the guild membership.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/guilds/{guild_id}/audit-logs",
        get(audit::list_audit_logs),
    )
}
