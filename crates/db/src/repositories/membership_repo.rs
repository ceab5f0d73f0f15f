//! Repository for the `guild_memberships` table.

use sqlx::{PgConnection, PgPool};

use guildhall_core::types::{DbId, UserId};

use crate::models::membership::{CreateMembership, GuildMembership};

const COLUMNS: &str = "id, guild_id, user_id, role, status, created_at, updated_at";

/// Provides CRUD operations for guild memberships.
pub struct MembershipRepo;

impl MembershipRepo {
    /// Create a membership. Role defaults to `member`, status to `pending`.
    /// Runs inside a caller-managed transaction.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateMembership,
    ) -> Result<GuildMembership, sqlx::Error> {
        let query = format!(
            "INSERT INTO guild_memberships (guild_id, user_id, role, status) \
             VALUES ($1, $2, COALESCE($3, 'member'), COALESCE($4, 'pending')) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GuildMembership>(&query)
            .bind(input.guild_id)
            .bind(input.user_id)
            .bind(&input.role)
            .bind(&input.status)
            .fetch_one(conn)
            .await
    }

    /// Find the membership of a user in a guild.
    pub async fn find(
        pool: &PgPool,
        guild_id: DbId,
        user_id: UserId,
    ) -> Result<Option<GuildMembership>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM guild_memberships WHERE guild_id = $1 AND user_id = $2");
        sqlx::query_as::<_, GuildMembership>(&query)
            .bind(guild_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List all memberships of a guild, admins first, then by join date.
    pub async fn list_by_guild(
        pool: &PgPool,
        guild_id: DbId,
    ) -> Result<Vec<GuildMembership>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM guild_memberships WHERE guild_id = $1 \
             ORDER BY (role = 'admin') DESC, created_at ASC"
        );
        sqlx::query_as::<_, GuildMembership>(&query)
            .bind(guild_id)
            .fetch_all(pool)
            .await
    }

    /// List the guilds a user belongs to.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: UserId,
    ) -> Result<Vec<GuildMembership>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM guild_memberships WHERE user_id = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, GuildMembership>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update a member's guild role. Runs inside a caller-managed
    /// transaction so the audit entry commits with the change.
    pub async fn update_role(
        conn: &mut PgConnection,
        guild_id: DbId,
        user_id: UserId,
        role: &str,
    ) -> Result<Option<GuildMembership>, sqlx::Error> {
        let query = format!(
            "UPDATE guild_memberships SET role = $3, updated_at = NOW() \
             WHERE guild_id = $1 AND user_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GuildMembership>(&query)
            .bind(guild_id)
            .bind(user_id)
            .bind(role)
            .fetch_optional(conn)
            .await
    }

    /// Update a member's membership status.
    pub async fn update_status(
        pool: &PgPool,
        guild_id: DbId,
        user_id: UserId,
        status: &str,
    ) -> Result<Option<GuildMembership>, sqlx::Error> {
        let query = format!(
            "UPDATE guild_memberships SET status = $3, updated_at = NOW() \
             WHERE guild_id = $1 AND user_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GuildMembership>(&query)
            .bind(guild_id)
            .bind(user_id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Delete a membership inside a caller-managed transaction. Returns
    /// whether a row was removed.
    pub async fn delete(
        conn: &mut PgConnection,
        guild_id: DbId,
        user_id: UserId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM guild_memberships WHERE guild_id = $1 AND user_id = $2")
                .bind(guild_id)
                .bind(user_id)
                .execute(conn)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
