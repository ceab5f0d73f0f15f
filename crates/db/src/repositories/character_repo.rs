//! Repository for the `characters` table.

use sqlx::{PgConnection, PgPool};

use guildhall_core::types::{DbId, UserId};

use crate::models::character::{Character, CreateCharacter, UpdateCharacter};

const COLUMNS: &str = "\
    id, user_id, guild_id, name, character_type, primary_class, \
    secondary_class, status, skills, equipment, created_at, updated_at";

/// Provides CRUD operations for guild characters.
pub struct CharacterRepo;

impl CharacterRepo {
    /// Create a character with the given initial skills and an empty loadout.
    /// Runs inside a caller-managed transaction (joins create the membership
    /// and the first character together).
    pub async fn create(
        conn: &mut PgConnection,
        user_id: UserId,
        guild_id: DbId,
        input: &CreateCharacter,
        skills: &serde_json::Value,
    ) -> Result<Character, sqlx::Error> {
        let query = format!(
            "INSERT INTO characters \
                (user_id, guild_id, name, character_type, primary_class, \
                 secondary_class, skills) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(user_id)
            .bind(guild_id)
            .bind(&input.name)
            .bind(&input.character_type)
            .bind(&input.primary_class)
            .bind(&input.secondary_class)
            .bind(skills)
            .fetch_one(conn)
            .await
    }

    /// Find a character by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Character>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM characters WHERE id = $1");
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a character by ID with a row lock, inside a caller-managed
    /// transaction.
    pub async fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Character>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM characters WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List a guild's full roster, newest first.
    pub async fn list_by_guild(
        pool: &PgPool,
        guild_id: DbId,
    ) -> Result<Vec<Character>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM characters WHERE guild_id = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Character>(&query)
            .bind(guild_id)
            .fetch_all(pool)
            .await
    }

    /// List one user's characters within a guild, oldest first.
    pub async fn list_by_user_in_guild(
        pool: &PgPool,
        guild_id: DbId,
        user_id: UserId,
    ) -> Result<Vec<Character>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM characters \
             WHERE guild_id = $1 AND user_id = $2 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(guild_id)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Count a user's characters within a guild, inside a caller-managed
    /// transaction.
    pub async fn count_by_user_in_guild(
        conn: &mut PgConnection,
        guild_id: DbId,
        user_id: UserId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM characters WHERE guild_id = $1 AND user_id = $2",
        )
        .bind(guild_id)
        .bind(user_id)
        .fetch_one(conn)
        .await
    }

    /// Apply a partial update. `None` fields keep their current value. Runs
    /// inside a caller-managed transaction so the audit entry commits with
    /// the change.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdateCharacter,
    ) -> Result<Option<Character>, sqlx::Error> {
        let query = format!(
            "UPDATE characters SET \
                name = COALESCE($2, name), \
                character_type = COALESCE($3, character_type), \
                primary_class = COALESCE($4, primary_class), \
                secondary_class = COALESCE($5, secondary_class), \
                skills = COALESCE($6, skills), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.character_type)
            .bind(&input.primary_class)
            .bind(&input.secondary_class)
            .bind(&input.skills)
            .fetch_optional(conn)
            .await
    }

    /// Update a character's status. Runs inside a caller-managed
    /// transaction.
    pub async fn update_status(
        conn: &mut PgConnection,
        id: DbId,
        status: &str,
    ) -> Result<Option<Character>, sqlx::Error> {
        let query = format!(
            "UPDATE characters SET status = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(conn)
            .await
    }

    /// Replace a character's equipment loadout, inside a caller-managed
    /// transaction.
    pub async fn update_equipment(
        conn: &mut PgConnection,
        id: DbId,
        equipment: &serde_json::Value,
    ) -> Result<Option<Character>, sqlx::Error> {
        let query = format!(
            "UPDATE characters SET equipment = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .bind(equipment)
            .fetch_optional(conn)
            .await
    }

    /// Delete a character inside a caller-managed transaction. Returns
    /// whether a row was removed.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM characters WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Display names for a set of users within a guild, one per user (their
    /// earliest-created character). Used to enrich audit entries and
    /// inventory views.
    pub async fn find_display_names(
        pool: &PgPool,
        guild_id: DbId,
        user_ids: &[UserId],
    ) -> Result<Vec<(UserId, String)>, sqlx::Error> {
        sqlx::query_as::<_, (UserId, String)>(
            "SELECT DISTINCT ON (user_id) user_id, name FROM characters \
             WHERE guild_id = $1 AND user_id = ANY($2) \
             ORDER BY user_id, created_at ASC",
        )
        .bind(guild_id)
        .bind(user_ids)
        .fetch_all(pool)
        .await
    }
}
