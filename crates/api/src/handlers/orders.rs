//! Handlers for buy order marketplace endpoints.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use guildhall_core::types::DbId;
use guildhall_db::models::buy_order::{BuyOrderResponse, BuyOrderWithResponses, CreateBuyOrder};
use guildhall_db::repositories::{BuyOrderRepo, BuyOrderResponseRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::{membership, transfer};
use crate::state::AppState;

/// GET /guilds/{guild_id}/orders
///
/// All of the guild's orders with their responses, newest order first.
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Path(guild_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    membership::require_member(&state.pool, guild_id, user.user_id).await?;

    let orders = BuyOrderRepo::list_by_guild(&state.pool, guild_id).await?;
    let responses = BuyOrderResponseRepo::list_by_guild(&state.pool, guild_id).await?;

    let mut by_order: HashMap<DbId, Vec<BuyOrderResponse>> = HashMap::new();
    for response in responses {
        by_order.entry(response.order_id).or_default().push(response);
    }

    let data: Vec<BuyOrderWithResponses> = orders
        .into_iter()
        .map(|order| {
            let responses = by_order.remove(&order.id).unwrap_or_default();
            BuyOrderWithResponses { order, responses }
        })
        .collect();

    Ok(Json(DataResponse { data }))
}

/// POST /guilds/{guild_id}/orders
///
/// Guild admin only.
pub async fn create_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(guild_id): Path<DbId>,
    Json(input): Json<CreateBuyOrder>,
) -> AppResult<impl IntoResponse> {
    let order = transfer::create_order(&state.pool, user, guild_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: order })))
}

/// POST /orders/{id}/cancel
///
/// Creator or guild admin.
pub async fn cancel_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(order_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let order = transfer::cancel_order(&state.pool, user, order_id).await?;
    Ok(Json(DataResponse { data: order }))
}

#[derive(Debug, Deserialize)]
pub struct RespondPayload {
    pub inventory_item_id: DbId,
}

/// POST /orders/{id}/responses
///
/// Offer to fill the order from one of the caller's inventory lines.
pub async fn respond_to_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(order_id): Path<DbId>,
    Json(payload): Json<RespondPayload>,
) -> AppResult<impl IntoResponse> {
    let response =
        transfer::respond_to_order(&state.pool, user, order_id, payload.inventory_item_id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: response })))
}

/// POST /orders/responses/{id}/accept
///
/// Creator or guild admin. Moves the stock, credits the responder, and
/// completes the order.
pub async fn accept_response(
    State(state): State<AppState>,
    user: AuthUser,
    Path(response_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let order = transfer::accept_response(&state.pool, user, response_id).await?;
    Ok(Json(DataResponse { data: order }))
}

/// POST /orders/responses/{id}/reject
///
/// Creator or guild admin.
pub async fn reject_response(
    State(state): State<AppState>,
    user: AuthUser,
    Path(response_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let response = transfer::reject_response(&state.pool, user, response_id).await?;
    Ok(Json(DataResponse { data: response }))
}
