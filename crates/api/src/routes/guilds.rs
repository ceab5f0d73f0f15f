//! Route definitions for guilds and memberships.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::guilds;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/guilds", post(guilds::create_guild).get(guilds::list_guilds))
        .route("/guilds/{guild_id}", get(guilds::get_guild))
        .route("/guilds/{guild_id}/join", post(guilds::join_guild))
        .route("/guilds/{guild_id}/members", get(guilds::list_members))
        .route(
            "/guilds/{guild_id}/members/{user_id}/role",
            put(guilds::update_member_role),
        )
        .route(
            "/guilds/{guild_id}/members/{user_id}/status",
            put(guilds::update_member_status),
        )
}
