//! SQLite storage backend for pager-store.

use super::{ItemStore, KeyStore, PageStore};
use crate::error::StorageError;
use crate::filter::{fold, ItemFilter};
use async_trait::async_trait;
use pager_core::PageMerge;
use pager_types::{ContinuationKey, Item, ItemId, PageToken};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteConnection, SqliteJournalMode, SqlitePool, SqlitePoolOptions,
    SqliteSynchronous,
};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// SQLite-based item and key storage.
///
/// Uses WAL mode so readers keep seeing the last committed page while a
/// merge is being written. Clones share the pool and the change channel.
#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
    changes: Arc<watch::Sender<u64>>,
}

impl std::fmt::Debug for SqliteStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStorage")
            .field("generation", &*self.changes.borrow())
            .finish_non_exhaustive()
    }
}

impl SqliteStorage {
    /// Create a new SQLite storage from a database path.
    ///
    /// Creates the database file if it doesn't exist.
    pub async fn new(path: &Path) -> Result<Self, StorageError> {
        if path.is_dir() {
            return Err(StorageError::InvalidPath {
                path: path.to_path_buf(),
            });
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(StorageError::Database)?;

        Self::with_pool(pool).await
    }

    /// Create an in-memory SQLite storage (for testing).
    pub async fn in_memory() -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(":memory:")
            .map_err(StorageError::Database)?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        // A single connection that is never recycled: closing it would drop
        // the database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await
            .map_err(StorageError::Database)?;

        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self, StorageError> {
        let (changes, _) = watch::channel(0u64);
        let storage = Self {
            pool,
            changes: Arc::new(changes),
        };
        storage.run_migrations().await?;
        Ok(storage)
    }

    /// Run database migrations.
    async fn run_migrations(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS items (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                full_name TEXT NOT NULL,
                description TEXT,
                url TEXT NOT NULL,
                stars INTEGER NOT NULL,
                forks INTEGER NOT NULL,
                language TEXT,
                search_name TEXT NOT NULL,
                search_description TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(StorageError::Database)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS continuation_keys (
                item_id INTEGER PRIMARY KEY,
                previous_page INTEGER,
                next_page INTEGER,
                fetched_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(StorageError::Database)?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_items_read_order ON items(stars DESC, name ASC, id ASC)")
            .execute(&self.pool)
            .await
            .map_err(StorageError::Database)?;

        Ok(())
    }

    /// Bump the change generation after a committed write.
    fn notify_changed(&self) {
        self.changes.send_modify(|generation| *generation += 1);
    }

    /// Current change generation.
    pub fn generation(&self) -> u64 {
        *self.changes.borrow()
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

async fn write_keys(
    conn: &mut SqliteConnection,
    keys: &[ContinuationKey],
) -> Result<(), StorageError> {
    for key in keys {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO continuation_keys (item_id, previous_page, next_page, fetched_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(key.item_id.value())
        .bind(key.previous_page.map(|p| i64::from(p.value())))
        .bind(key.next_page.map(|p| i64::from(p.value())))
        .bind(key.fetched_at)
        .execute(&mut *conn)
        .await
        .map_err(StorageError::Database)?;
    }
    Ok(())
}

async fn write_items(conn: &mut SqliteConnection, items: &[Item]) -> Result<(), StorageError> {
    for item in items {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO items
                (id, name, full_name, description, url, stars, forks, language,
                 search_name, search_description)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(item.id.value())
        .bind(&item.name)
        .bind(&item.full_name)
        .bind(&item.description)
        .bind(&item.url)
        .bind(item.stars)
        .bind(item.forks)
        .bind(&item.language)
        .bind(fold(&item.name))
        .bind(fold(item.description.as_deref().unwrap_or_default()))
        .execute(&mut *conn)
        .await
        .map_err(StorageError::Database)?;
    }
    Ok(())
}

async fn apply_merge(conn: &mut SqliteConnection, merge: &PageMerge) -> Result<(), StorageError> {
    if merge.clear_existing {
        let keys = delete_all(conn, "DELETE FROM continuation_keys").await?;
        let items = delete_all(conn, "DELETE FROM items").await?;
        tracing::debug!("Refresh cleared {} items and {} keys", items, keys);
    }

    write_keys(conn, &merge.keys).await?;
    write_items(conn, &merge.items).await
}

async fn delete_all(conn: &mut SqliteConnection, sql: &'static str) -> Result<u64, StorageError> {
    let result = sqlx::query(sql)
        .execute(&mut *conn)
        .await
        .map_err(StorageError::Database)?;
    Ok(result.rows_affected())
}

#[async_trait]
impl KeyStore for SqliteStorage {
    async fn upsert_keys(&self, keys: &[ContinuationKey]) -> Result<(), StorageError> {
        if keys.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await.map_err(StorageError::Database)?;
        write_keys(&mut tx, keys).await?;
        tx.commit().await.map_err(StorageError::Database)?;

        self.notify_changed();
        Ok(())
    }

    async fn key_for(&self, item_id: ItemId) -> Result<Option<ContinuationKey>, StorageError> {
        let row = sqlx::query_as::<_, KeyRow>(
            r#"
            SELECT item_id, previous_page, next_page, fetched_at
            FROM continuation_keys
            WHERE item_id = ?1
            "#,
        )
        .bind(item_id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Database)?;

        match row {
            Some(r) => Ok(Some(r.try_into()?)),
            None => Ok(None),
        }
    }

    async fn clear_keys(&self) -> Result<(), StorageError> {
        let mut conn = self.pool.acquire().await.map_err(StorageError::Database)?;
        let deleted = delete_all(&mut conn, "DELETE FROM continuation_keys").await?;
        tracing::debug!("Cleared {} continuation keys", deleted);

        self.notify_changed();
        Ok(())
    }

    async fn key_count(&self) -> Result<u64, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM continuation_keys")
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::Database)?;

        Ok(count as u64)
    }

    async fn latest_fetch(&self) -> Result<Option<i64>, StorageError> {
        let latest: Option<i64> = sqlx::query_scalar("SELECT MAX(fetched_at) FROM continuation_keys")
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::Database)?;

        Ok(latest)
    }
}

#[async_trait]
impl ItemStore for SqliteStorage {
    async fn insert_items(&self, items: &[Item]) -> Result<(), StorageError> {
        if items.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await.map_err(StorageError::Database)?;
        write_items(&mut tx, items).await?;
        tx.commit().await.map_err(StorageError::Database)?;

        self.notify_changed();
        Ok(())
    }

    async fn clear_items(&self) -> Result<(), StorageError> {
        let mut conn = self.pool.acquire().await.map_err(StorageError::Database)?;
        let deleted = delete_all(&mut conn, "DELETE FROM items").await?;
        tracing::debug!("Cleared {} items", deleted);

        self.notify_changed();
        Ok(())
    }

    async fn query_paginated(
        &self,
        filter: &ItemFilter,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Item>, StorageError> {
        // Nothing can sit beyond what SQLite's signed OFFSET can address.
        let Ok(offset) = i64::try_from(offset) else {
            return Ok(Vec::new());
        };

        let rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, name, full_name, description, url, stars, forks, language
            FROM items
            WHERE search_name LIKE ?1 ESCAPE '\' OR search_description LIKE ?1 ESCAPE '\'
            ORDER BY stars DESC, name ASC, id ASC
            LIMIT ?2 OFFSET ?3
            "#,
        )
        .bind(filter.like_pattern())
        .bind(i64::from(limit))
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Database)?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn count_matching(&self, filter: &ItemFilter) -> Result<u64, StorageError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM items
            WHERE search_name LIKE ?1 ESCAPE '\' OR search_description LIKE ?1 ESCAPE '\'
            "#,
        )
        .bind(filter.like_pattern())
        .fetch_one(&self.pool)
        .await
        .map_err(StorageError::Database)?;

        Ok(count as u64)
    }
}

#[async_trait]
impl PageStore for SqliteStorage {
    async fn merge_page(&self, merge: &PageMerge) -> Result<(), StorageError> {
        // Dropping the transaction before commit rolls it back, so a
        // cancelled merge leaves no trace.
        let mut tx = self.pool.begin().await.map_err(StorageError::Database)?;
        apply_merge(&mut tx, merge).await?;
        tx.commit().await.map_err(StorageError::Database)?;
        self.notify_changed();

        tracing::debug!(
            "Merged page {} ({} items, generation {})",
            merge.page,
            merge.items.len(),
            self.generation()
        );
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }
}

/// Internal row type for item queries.
#[derive(sqlx::FromRow)]
struct ItemRow {
    id: i64,
    name: String,
    full_name: String,
    description: Option<String>,
    url: String,
    stars: i64,
    forks: i64,
    language: Option<String>,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Item {
            id: ItemId::new(row.id),
            name: row.name,
            full_name: row.full_name,
            description: row.description,
            url: row.url,
            stars: row.stars,
            forks: row.forks,
            language: row.language,
        }
    }
}

/// Internal row type for continuation key queries.
#[derive(sqlx::FromRow)]
struct KeyRow {
    item_id: i64,
    previous_page: Option<i64>,
    next_page: Option<i64>,
    fetched_at: i64,
}

fn page_from_column(value: Option<i64>) -> Result<Option<PageToken>, StorageError> {
    value
        .map(|v| {
            u32::try_from(v)
                .ok()
                .and_then(|v| PageToken::new(v).ok())
                .ok_or_else(|| StorageError::InvalidRow {
                    table: "continuation_keys",
                    reason: format!("page token out of range: {}", v),
                })
        })
        .transpose()
}

impl TryFrom<KeyRow> for ContinuationKey {
    type Error = StorageError;

    fn try_from(row: KeyRow) -> Result<Self, Self::Error> {
        Ok(ContinuationKey {
            item_id: ItemId::new(row.item_id),
            previous_page: page_from_column(row.previous_page)?,
            next_page: page_from_column(row.next_page)?,
            fetched_at: row.fetched_at,
        })
    }
}
