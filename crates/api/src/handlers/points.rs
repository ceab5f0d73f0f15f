//! Handler for the guild points balance endpoint.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use guildhall_core::types::UserId;
use guildhall_db::repositories::PointsRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub user_id: UserId,
    pub balance: i64,
}

/// GET /points
///
/// The caller's points balance. Users with no credits yet read as zero.
pub async fn my_balance(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let balance = PointsRepo::find_balance(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse {
        data: BalanceResponse {
            user_id: user.user_id,
            balance,
        },
    }))
}
