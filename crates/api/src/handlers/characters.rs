//! Handlers for roster and loadout endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use guildhall_core::equipment::{EquipmentSlot, EquippedItem};
use guildhall_core::error::CoreError;
use guildhall_core::types::DbId;
use guildhall_db::models::character::{CreateCharacter, UpdateCharacter};
use guildhall_db::repositories::CharacterRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::{membership, transfer};
use crate::state::AppState;

/// GET /guilds/{guild_id}/characters
pub async fn list_roster(
    State(state): State<AppState>,
    user: AuthUser,
    Path(guild_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    membership::require_member(&state.pool, guild_id, user.user_id).await?;
    let roster = CharacterRepo::list_by_guild(&state.pool, guild_id).await?;
    Ok(Json(DataResponse { data: roster }))
}

/// GET /guilds/{guild_id}/characters/mine
pub async fn list_mine(
    State(state): State<AppState>,
    user: AuthUser,
    Path(guild_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    membership::require_member(&state.pool, guild_id, user.user_id).await?;
    let characters =
        CharacterRepo::list_by_user_in_guild(&state.pool, guild_id, user.user_id).await?;
    Ok(Json(DataResponse { data: characters }))
}

/// POST /guilds/{guild_id}/characters
pub async fn create_character(
    State(state): State<AppState>,
    user: AuthUser,
    Path(guild_id): Path<DbId>,
    Json(input): Json<CreateCharacter>,
) -> AppResult<impl IntoResponse> {
    let character = membership::create_character(&state.pool, user, guild_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: character })))
}

/// GET /characters/{id}
pub async fn get_character(
    State(state): State<AppState>,
    user: AuthUser,
    Path(character_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let character = CharacterRepo::find_by_id(&state.pool, character_id)
        .await?
        .ok_or_else(|| CoreError::not_found("character", character_id))?;
    membership::require_member(&state.pool, character.guild_id, user.user_id).await?;
    Ok(Json(DataResponse { data: character }))
}

/// PUT /characters/{id}
///
/// Owner or guild admin.
pub async fn update_character(
    State(state): State<AppState>,
    user: AuthUser,
    Path(character_id): Path<DbId>,
    Json(input): Json<UpdateCharacter>,
) -> AppResult<impl IntoResponse> {
    let updated = membership::update_character(&state.pool, user, character_id, &input).await?;
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /characters/{id}
///
/// Guild admin only. Removing a user's last character in a guild also
/// removes their membership.
pub async fn delete_character(
    State(state): State<AppState>,
    user: AuthUser,
    Path(character_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    membership::delete_character(&state.pool, user, character_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct UpdateCharacterStatusPayload {
    pub status: String,
}

/// PUT /characters/{id}/status
///
/// Admin only.
pub async fn update_character_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(character_id): Path<DbId>,
    Json(payload): Json<UpdateCharacterStatusPayload>,
) -> AppResult<impl IntoResponse> {
    let updated =
        membership::update_character_status(&state.pool, user, character_id, &payload.status)
            .await?;
    Ok(Json(DataResponse { data: updated }))
}

#[derive(Debug, Deserialize)]
pub struct EquipPayload {
    pub slot: EquipmentSlot,
    pub item: EquippedItem,
}

/// PUT /characters/{id}/equipment
///
/// Owner only. Equipping a two-handed weapon into a main-hand slot clears
/// the paired hand slots.
pub async fn equip_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(character_id): Path<DbId>,
    Json(payload): Json<EquipPayload>,
) -> AppResult<impl IntoResponse> {
    let updated =
        transfer::equip_item(&state.pool, user, character_id, payload.slot, payload.item).await?;
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /characters/{id}/equipment/{slot}
///
/// Owner only.
pub async fn unequip_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path((character_id, slot)): Path<(DbId, EquipmentSlot)>,
) -> AppResult<impl IntoResponse> {
    let updated = transfer::unequip_item(&state.pool, user, character_id, slot).await?;
    Ok(Json(DataResponse { data: updated }))
}
