//! Route definitions for inventories.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::inventory;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/guilds/{guild_id}/inventory",
            get(inventory::guild_inventory).post(inventory::add_item),
        )
        .route(
            "/guilds/{guild_id}/inventory/mine",
            get(inventory::my_inventory),
        )
        .route("/inventory/{id}", delete(inventory::remove_item))
        .route("/inventory/{id}/transfer", post(inventory::transfer_item))
}
