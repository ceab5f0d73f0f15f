//! Repository for the `catalog_items` table. Read-only.

use sqlx::PgPool;

use crate::models::catalog::CatalogItem;

const COLUMNS: &str = "\
    item_guid, item_name, description, level, rarity_min, rarity_max, \
    icon_path, tags";

/// Provides lookups over the item catalog.
pub struct CatalogRepo;

impl CatalogRepo {
    /// Find a catalog entry by its GUID.
    pub async fn find_by_guid(
        pool: &PgPool,
        item_guid: &str,
    ) -> Result<Option<CatalogItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM catalog_items WHERE item_guid = $1");
        sqlx::query_as::<_, CatalogItem>(&query)
            .bind(item_guid)
            .fetch_optional(pool)
            .await
    }

    /// Case-insensitive name search, paginated.
    pub async fn search(
        pool: &PgPool,
        name: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CatalogItem>, sqlx::Error> {
        match name {
            Some(name) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM catalog_items \
                     WHERE item_name ILIKE $1 \
                     ORDER BY item_name ASC LIMIT $2 OFFSET $3"
                );
                sqlx::query_as::<_, CatalogItem>(&query)
                    .bind(format!("%{name}%"))
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM catalog_items \
                     ORDER BY item_name ASC LIMIT $1 OFFSET $2"
                );
                sqlx::query_as::<_, CatalogItem>(&query)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
        }
    }
}
