pub mod audit;
pub mod catalog;
pub mod characters;
pub mod guilds;
pub mod health;
pub mod inventory;
pub mod orders;
pub mod points;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /guilds                                    POST create, GET list
/// /guilds/{guild_id}                         GET
/// /guilds/{guild_id}/join                    POST (membership + first character)
/// /guilds/{guild_id}/members                 GET
/// /guilds/{guild_id}/members/{user_id}/role    PUT (admin)
/// /guilds/{guild_id}/members/{user_id}/status  PUT (admin)
///
/// /guilds/{guild_id}/characters              GET roster, POST create
/// /guilds/{guild_id}/characters/mine         GET
/// /characters/{id}                           GET, PUT, DELETE (admin)
/// /characters/{id}/status                    PUT (admin)
/// /characters/{id}/equipment                 PUT equip
/// /characters/{id}/equipment/{slot}          DELETE unequip
///
/// /guilds/{guild_id}/inventory               GET grouped view, POST add
/// /guilds/{guild_id}/inventory/mine          GET
/// /inventory/{id}                            DELETE remove stock
/// /inventory/{id}/transfer                   POST
///
/// /guilds/{guild_id}/orders                  GET with responses, POST (admin)
/// /orders/{id}/cancel                        POST
/// /orders/{id}/responses                     POST respond
/// /orders/responses/{id}/accept              POST (creator/admin)
/// /orders/responses/{id}/reject              POST (creator/admin)
///
/// /guilds/{guild_id}/audit-logs              GET (admin)
/// /points                                    GET own balance
/// /catalog                                   GET search
/// /catalog/{item_guid}                       GET
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(guilds::router())
        .merge(characters::router())
        .merge(inventory::router())
        .merge(orders::router())
        .merge(audit::router())
        .merge(points::router())
        .merge(catalog::router())
}
