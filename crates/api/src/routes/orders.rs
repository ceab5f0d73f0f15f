//! Route definitions for the buy order marketplace.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::orders;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/guilds/{guild_id}/orders",
            get(orders::list_orders).post(orders::create_order),
        )
        .route("/orders/{id}/cancel", post(orders::cancel_order))
        .route("/orders/{id}/responses", post(orders::respond_to_order))
        .route(
            "/orders/responses/{id}/accept",
            post(orders::accept_response),
        )
        .route(
            "/orders/responses/{id}/reject",
            post(orders::reject_response),
        )
}
