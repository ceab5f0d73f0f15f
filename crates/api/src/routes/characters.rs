//! Route definitions for the roster and loadouts.

use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::characters;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/guilds/{guild_id}/characters",
            get(characters::list_roster).post(characters::create_character),
        )
        .route(
            "/guilds/{guild_id}/characters/mine",
            get(characters::list_mine),
        )
        .route(
            "/characters/{id}",
            get(characters::get_character)
                .put(characters::update_character)
                .delete(characters::delete_character),
        )
        .route(
            "/characters/{id}/status",
            put(characters::update_character_status),
        )
        .route("/characters/{id}/equipment", put(characters::equip_item))
        .route(
            "/characters/{id}/equipment/{slot}",
            delete(characters::unequip_item),
        )
}
