//! Repository for the `guilds` table.

use sqlx::{PgConnection, PgPool};

use guildhall_core::types::DbId;

use crate::models::guild::{CreateGuild, Guild};

const COLUMNS: &str = "id, name, created_at, updated_at";

/// Provides CRUD operations for guilds.
pub struct GuildRepo;

impl GuildRepo {
    /// Create a new guild. Runs inside a caller-managed transaction so the
    /// founder's membership lands in the same commit.
    pub async fn create(conn: &mut PgConnection, input: &CreateGuild) -> Result<Guild, sqlx::Error> {
        let query = format!("INSERT INTO guilds (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Guild>(&query)
            .bind(&input.name)
            .fetch_one(conn)
            .await
    }

    /// Find a guild by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Guild>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM guilds WHERE id = $1");
        sqlx::query_as::<_, Guild>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all guilds, newest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Guild>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM guilds ORDER BY created_at DESC");
        sqlx::query_as::<_, Guild>(&query).fetch_all(pool).await
    }
}
