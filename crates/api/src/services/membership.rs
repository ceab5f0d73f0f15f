//! Membership gate: guild creation, joining, roster management, and the
//! guild-scoped role checks used by every other service.
//!
//! Roles live on the membership row, not in the JWT, so a role change takes
//! effect on the next request without reissuing tokens.

use sqlx::PgPool;

use guildhall_core::audit::{AuditAction, CharacterSnapshot, RoleChange, StatusChange};
use guildhall_core::classes::validate_pairing;
use guildhall_core::error::CoreError;
use guildhall_core::roles::{ROLE_ADMIN, ROLE_MEMBER};
use guildhall_core::skills::{initialize_skills, CharacterType};
use guildhall_core::status::{character_status, membership_status};
use guildhall_core::types::{DbId, UserId};
use guildhall_db::models::character::{Character, CreateCharacter, UpdateCharacter};
use guildhall_db::models::guild::{CreateGuild, Guild};
use guildhall_db::models::membership::{CreateMembership, GuildMembership};
use guildhall_db::repositories::{AuditLogRepo, CharacterRepo, GuildRepo, MembershipRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;

// ---------------------------------------------------------------------------
// Role checks
// ---------------------------------------------------------------------------

/// Require the actor to be an active member of the guild.
pub async fn require_member(
    pool: &PgPool,
    guild_id: DbId,
    user_id: UserId,
) -> AppResult<GuildMembership> {
    let membership = MembershipRepo::find(pool, guild_id, user_id)
        .await?
        .ok_or_else(|| CoreError::Forbidden("Not a member of this guild".into()))?;
    if membership.status != membership_status::ACTIVE {
        return Err(CoreError::Forbidden("Membership is not active".into()).into());
    }
    Ok(membership)
}

/// Require the actor to be an active admin of the guild.
pub async fn require_admin(
    pool: &PgPool,
    guild_id: DbId,
    user_id: UserId,
) -> AppResult<GuildMembership> {
    let membership = require_member(pool, guild_id, user_id).await?;
    if membership.role != ROLE_ADMIN {
        return Err(CoreError::Forbidden("Admin role required".into()).into());
    }
    Ok(membership)
}

// ---------------------------------------------------------------------------
// Guild creation and joining
// ---------------------------------------------------------------------------

/// Create a guild. The founder becomes an active admin in the same commit.
pub async fn create_guild(pool: &PgPool, actor: AuthUser, input: &CreateGuild) -> AppResult<Guild> {
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("Guild name must not be empty".into()).into());
    }

    let mut tx = pool.begin().await?;
    let guild = GuildRepo::create(&mut tx, input).await?;
    MembershipRepo::create(
        &mut tx,
        &CreateMembership {
            guild_id: guild.id,
            user_id: actor.user_id,
            role: Some(ROLE_ADMIN.to_string()),
            status: Some(membership_status::ACTIVE.to_string()),
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(guild_id = guild.id, user_id = %actor.user_id, "Guild created");
    Ok(guild)
}

/// Join a guild: provision a pending membership and the user's first
/// character in one commit. Admin approval flips the membership active.
pub async fn join_guild(
    pool: &PgPool,
    actor: AuthUser,
    guild_id: DbId,
    character: &CreateCharacter,
) -> AppResult<(GuildMembership, Character)> {
    GuildRepo::find_by_id(pool, guild_id)
        .await?
        .ok_or_else(|| CoreError::not_found("guild", guild_id))?;

    validate_character_input(character)?;

    let skills = serde_json::to_value(initialize_skills())
        .map_err(|e| AppError::InternalError(format!("Failed to serialize skills: {e}")))?;

    let mut tx = pool.begin().await?;
    let membership = MembershipRepo::create(
        &mut tx,
        &CreateMembership {
            guild_id,
            user_id: actor.user_id,
            role: Some(ROLE_MEMBER.to_string()),
            status: Some(membership_status::PENDING.to_string()),
        },
    )
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            AppError::Core(CoreError::Conflict("Already a member of this guild".into()))
        }
        _ => AppError::Database(e),
    })?;
    let character = CharacterRepo::create(&mut tx, actor.user_id, guild_id, character, &skills)
        .await?;
    tx.commit().await?;

    tracing::info!(guild_id, user_id = %actor.user_id, "Membership requested");
    Ok((membership, character))
}

/// Approve or otherwise change a member's membership status. Admin only.
pub async fn update_membership_status(
    pool: &PgPool,
    actor: AuthUser,
    guild_id: DbId,
    target_user: UserId,
    status: &str,
) -> AppResult<GuildMembership> {
    require_admin(pool, guild_id, actor.user_id).await?;

    if status != membership_status::PENDING && status != membership_status::ACTIVE {
        return Err(CoreError::Validation(format!("Unknown membership status: {status}")).into());
    }

    MembershipRepo::update_status(pool, guild_id, target_user, status)
        .await?
        .ok_or_else(|| CoreError::not_found("membership", target_user).into())
}

/// Change a member's guild role. Admin only; audited as `ROLE_UPDATE`.
pub async fn update_member_role(
    pool: &PgPool,
    actor: AuthUser,
    guild_id: DbId,
    target_user: UserId,
    role: &str,
) -> AppResult<GuildMembership> {
    require_admin(pool, guild_id, actor.user_id).await?;

    if role != ROLE_ADMIN && role != ROLE_MEMBER {
        return Err(CoreError::Validation(format!("Unknown role: {role}")).into());
    }

    let current = MembershipRepo::find(pool, guild_id, target_user)
        .await?
        .ok_or_else(|| CoreError::not_found("membership", target_user))?;
    let target_name = super::display_name(pool, guild_id, target_user).await?;

    let mut tx = pool.begin().await?;
    let membership = MembershipRepo::update_role(&mut tx, guild_id, target_user, role)
        .await?
        .ok_or_else(|| AppError::from(CoreError::not_found("membership", target_user)))?;

    let action = AuditAction::RoleUpdate {
        old: RoleChange {
            character_name: target_name.clone(),
            role: current.role,
        },
        new: RoleChange {
            character_name: target_name,
            role: role.to_string(),
        },
    };
    insert_audit(
        &mut tx,
        guild_id,
        actor.user_id,
        &action,
        "membership",
        &membership.id.to_string(),
    )
    .await?;
    tx.commit().await?;

    Ok(membership)
}

// ---------------------------------------------------------------------------
// Roster management
// ---------------------------------------------------------------------------

/// Create an additional character for an already-active member.
pub async fn create_character(
    pool: &PgPool,
    actor: AuthUser,
    guild_id: DbId,
    input: &CreateCharacter,
) -> AppResult<Character> {
    require_member(pool, guild_id, actor.user_id).await?;
    validate_character_input(input)?;

    let skills = serde_json::to_value(initialize_skills())
        .map_err(|e| AppError::InternalError(format!("Failed to serialize skills: {e}")))?;

    let mut tx = pool.begin().await?;
    let character = CharacterRepo::create(&mut tx, actor.user_id, guild_id, input, &skills).await?;
    tx.commit().await?;
    Ok(character)
}

/// Update a character's details. Owner or guild admin; audited as
/// `CHARACTER_UPDATE`.
pub async fn update_character(
    pool: &PgPool,
    actor: AuthUser,
    character_id: DbId,
    input: &UpdateCharacter,
) -> AppResult<Character> {
    let current = CharacterRepo::find_by_id(pool, character_id)
        .await?
        .ok_or_else(|| CoreError::not_found("character", character_id))?;
    require_owner_or_admin(pool, &current, actor).await?;

    // Validate the effective values after the partial update applies.
    if let Some(ref name) = input.name {
        if name.trim().is_empty() {
            return Err(CoreError::Validation("Character name must not be empty".into()).into());
        }
    }
    if let Some(ref character_type) = input.character_type {
        character_type.parse::<CharacterType>()?;
    }
    if input.primary_class.is_some() || input.secondary_class.is_some() {
        let primary = input
            .primary_class
            .as_deref()
            .unwrap_or(&current.primary_class);
        let secondary = input
            .secondary_class
            .as_deref()
            .unwrap_or(&current.secondary_class);
        validate_pairing(primary, secondary)?;
    }

    let mut tx = pool.begin().await?;
    let updated = CharacterRepo::update(&mut tx, character_id, input)
        .await?
        .ok_or_else(|| AppError::from(CoreError::not_found("character", character_id)))?;

    let action = AuditAction::CharacterUpdate {
        old: character_snapshot(&current, None)?,
        new: character_snapshot(&updated, None)?,
    };
    insert_audit(
        &mut tx,
        current.guild_id,
        actor.user_id,
        &action,
        "character",
        &character_id.to_string(),
    )
    .await?;
    tx.commit().await?;

    Ok(updated)
}

/// Change a character's active/inactive status. Admin only; audited as
/// `STATUS_UPDATE`.
pub async fn update_character_status(
    pool: &PgPool,
    actor: AuthUser,
    character_id: DbId,
    status: &str,
) -> AppResult<Character> {
    if status != character_status::ACTIVE && status != character_status::INACTIVE {
        return Err(CoreError::Validation(format!("Unknown character status: {status}")).into());
    }

    let current = CharacterRepo::find_by_id(pool, character_id)
        .await?
        .ok_or_else(|| CoreError::not_found("character", character_id))?;
    require_admin(pool, current.guild_id, actor.user_id).await?;

    let mut tx = pool.begin().await?;
    let updated = CharacterRepo::update_status(&mut tx, character_id, status)
        .await?
        .ok_or_else(|| AppError::from(CoreError::not_found("character", character_id)))?;

    let action = AuditAction::StatusUpdate {
        old: StatusChange {
            character_name: current.name.clone(),
            status: current.status,
        },
        new: StatusChange {
            character_name: current.name,
            status: status.to_string(),
        },
    };
    insert_audit(
        &mut tx,
        current.guild_id,
        actor.user_id,
        &action,
        "character",
        &character_id.to_string(),
    )
    .await?;
    tx.commit().await?;

    Ok(updated)
}

/// Delete a character. Guild admin only; audited as `CHARACTER_DELETE`.
///
/// Deleting a user's last character in a guild also removes their
/// membership. The cascade is recorded as `membership_removed: true` inside
/// the delete snapshot rather than as a second audit entry.
pub async fn delete_character(pool: &PgPool, actor: AuthUser, character_id: DbId) -> AppResult<()> {
    let current = CharacterRepo::find_by_id(pool, character_id)
        .await?
        .ok_or_else(|| CoreError::not_found("character", character_id))?;
    require_admin(pool, current.guild_id, actor.user_id).await?;

    let mut tx = pool.begin().await?;
    // Lock the row so a concurrent delete of the same user's characters
    // cannot double-count the remaining roster.
    let locked = CharacterRepo::find_by_id_for_update(&mut tx, character_id)
        .await?
        .ok_or_else(|| AppError::from(CoreError::not_found("character", character_id)))?;
    let remaining =
        CharacterRepo::count_by_user_in_guild(&mut tx, locked.guild_id, locked.user_id).await?;

    CharacterRepo::delete(&mut tx, character_id).await?;

    let membership_removed = remaining == 1;
    if membership_removed {
        MembershipRepo::delete(&mut tx, locked.guild_id, locked.user_id).await?;
    }

    let action = AuditAction::CharacterDelete {
        old: character_snapshot(&locked, Some(membership_removed))?,
    };
    insert_audit(
        &mut tx,
        locked.guild_id,
        actor.user_id,
        &action,
        "character",
        &character_id.to_string(),
    )
    .await?;
    tx.commit().await?;

    tracing::info!(
        character_id,
        membership_removed,
        user_id = %locked.user_id,
        "Character deleted"
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The actor must own the character or be an admin of its guild.
async fn require_owner_or_admin(
    pool: &PgPool,
    character: &Character,
    actor: AuthUser,
) -> AppResult<()> {
    if character.user_id == actor.user_id {
        require_member(pool, character.guild_id, actor.user_id).await?;
        return Ok(());
    }
    require_admin(pool, character.guild_id, actor.user_id).await?;
    Ok(())
}

/// Validate a character creation payload: non-empty name, known type, and a
/// legal primary/secondary class pairing.
fn validate_character_input(input: &CreateCharacter) -> AppResult<()> {
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("Character name must not be empty".into()).into());
    }
    input.character_type.parse::<CharacterType>()?;
    validate_pairing(&input.primary_class, &input.secondary_class)?;
    Ok(())
}

/// Build the audit snapshot for a character row. The full persisted row
/// rides along so the entry stays renderable after the row is gone.
fn character_snapshot(
    character: &Character,
    membership_removed: Option<bool>,
) -> AppResult<CharacterSnapshot> {
    let value = serde_json::to_value(character)
        .map_err(|e| AppError::InternalError(format!("Failed to serialize character: {e}")))?;
    let rest = match value {
        serde_json::Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    Ok(CharacterSnapshot {
        character_name: character.name.clone(),
        membership_removed: membership_removed.filter(|removed| *removed),
        rest,
    })
}

/// Insert the audit row for `action` inside the caller's transaction.
pub(crate) async fn insert_audit(
    conn: &mut sqlx::PgConnection,
    guild_id: DbId,
    user_id: UserId,
    action: &AuditAction,
    entity_type: &str,
    entity_id: &str,
) -> AppResult<()> {
    AuditLogRepo::insert(
        conn,
        &guildhall_db::models::audit::CreateAuditLog {
            guild_id,
            action_type: action.action_type().to_string(),
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            user_id,
            old_data: action.old_data(),
            new_data: action.new_data(),
        },
    )
    .await?;
    Ok(())
}
