//! Handlers for guild and membership endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use guildhall_core::types::{DbId, UserId};
use guildhall_db::models::character::{Character, CreateCharacter};
use guildhall_db::models::guild::CreateGuild;
use guildhall_db::models::membership::GuildMembership;
use guildhall_db::repositories::{GuildRepo, MembershipRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::membership;
use crate::state::AppState;

use guildhall_core::error::CoreError;

/// POST /guilds
///
/// Create a guild; the founder becomes an active admin.
pub async fn create_guild(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateGuild>,
) -> AppResult<impl IntoResponse> {
    let guild = membership::create_guild(&state.pool, user, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: guild })))
}

/// GET /guilds
pub async fn list_guilds(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let guilds = GuildRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: guilds }))
}

/// GET /guilds/{guild_id}
pub async fn get_guild(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(guild_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let guild = GuildRepo::find_by_id(&state.pool, guild_id)
        .await?
        .ok_or_else(|| CoreError::not_found("guild", guild_id))?;
    Ok(Json(DataResponse { data: guild }))
}

/// Response payload for a successful join.
#[derive(Debug, Serialize)]
pub struct JoinResponse {
    pub membership: GuildMembership,
    pub character: Character,
}

/// POST /guilds/{guild_id}/join
///
/// Request membership (pending until approved) and create the user's first
/// character in the guild.
pub async fn join_guild(
    State(state): State<AppState>,
    user: AuthUser,
    Path(guild_id): Path<DbId>,
    Json(input): Json<CreateCharacter>,
) -> AppResult<impl IntoResponse> {
    let (membership, character) =
        membership::join_guild(&state.pool, user, guild_id, &input).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: JoinResponse {
                membership,
                character,
            },
        }),
    ))
}

/// GET /guilds/{guild_id}/members
pub async fn list_members(
    State(state): State<AppState>,
    user: AuthUser,
    Path(guild_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    membership::require_member(&state.pool, guild_id, user.user_id).await?;
    let members = MembershipRepo::list_by_guild(&state.pool, guild_id).await?;
    Ok(Json(DataResponse { data: members }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateRolePayload {
    pub role: String,
}

/// PUT /guilds/{guild_id}/members/{user_id}/role
///
/// Admin only.
pub async fn update_member_role(
    State(state): State<AppState>,
    user: AuthUser,
    Path((guild_id, target_user)): Path<(DbId, UserId)>,
    Json(payload): Json<UpdateRolePayload>,
) -> AppResult<impl IntoResponse> {
    let updated =
        membership::update_member_role(&state.pool, user, guild_id, target_user, &payload.role)
            .await?;
    Ok(Json(DataResponse { data: updated }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateMembershipStatusPayload {
    pub status: String,
}

/// PUT /guilds/{guild_id}/members/{user_id}/status
///
/// Admin only; used to approve pending memberships.
pub async fn update_member_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path((guild_id, target_user)): Path<(DbId, UserId)>,
    Json(payload): Json<UpdateMembershipStatusPayload>,
) -> AppResult<impl IntoResponse> {
    let updated = membership::update_membership_status(
        &state.pool,
        user,
        guild_id,
        target_user,
        &payload.status,
    )
    .await?;
    Ok(Json(DataResponse { data: updated }))
}
