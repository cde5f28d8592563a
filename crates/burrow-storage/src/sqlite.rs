use async_trait::async_trait;
use burrow_core::repository::{ReadRepository, Repository, Result, UrlRecord};
use burrow_core::{ShortCode, StorageError};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

const SCHEMA: &str = include_str!("../ddl/sqlite/url.sql");

/// SQLite implementation of the repository contract.
///
/// All records live in the `url` table. The `UNIQUE` constraint on `alias`
/// is what rejects duplicate inserts; the repository never looks an alias up
/// before writing it.
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Creates a repository from an existing SQLite connection pool.
    ///
    /// The schema is not touched; call [`SqliteRepository::migrate`] if the
    /// pool points at a fresh database.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (creating if missing) the database file at `path` and ensures
    /// the schema exists.
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;

        let repository = Self::new(pool);
        repository.migrate().await?;
        Ok(repository)
    }

    /// Opens a private in-memory database.
    ///
    /// Every SQLite connection to `:memory:` sees its own database, so the
    /// pool is pinned to one connection that is never recycled.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").map_err(map_sqlx_error)?;

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;

        let repository = Self::new(pool);
        repository.migrate().await?;
        Ok(repository)
    }

    /// Creates the `url` table and its index if they do not exist yet.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        info!("initiated sqlite schema");
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Configuration(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl ReadRepository for SqliteRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        let row = sqlx::query("SELECT url FROM url WHERE alias = ?")
            .bind(code.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            debug!(alias = %code, "alias not found");
            return Ok(None);
        };

        let original_url: String = row.try_get("url").map_err(map_sqlx_error)?;

        Ok(Some(UrlRecord { original_url }))
    }
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn insert(&self, code: &ShortCode, record: UrlRecord) -> Result<()> {
        let result = sqlx::query("INSERT INTO url (url, alias) VALUES (?, ?)")
            .bind(&record.original_url)
            .bind(code.as_str())
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => {
                info!(alias = %code, url = %record.original_url, "saved url");
                Ok(())
            }
            Err(err) if is_unique_violation(&err) => Err(StorageError::Conflict(code.to_string())),
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn delete(&self, code: &ShortCode) -> Result<bool> {
        let result = sqlx::query("DELETE FROM url WHERE alias = ?")
            .bind(code.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let removed = result.rows_affected() > 0;
        if removed {
            info!(alias = %code, "deleted alias");
        }
        Ok(removed)
    }

    async fn close(&self, deadline: Duration) -> Result<()> {
        match tokio::time::timeout(deadline, self.pool.close()).await {
            Ok(()) => {
                info!("closed sqlite pool");
                Ok(())
            }
            Err(_) => Err(StorageError::Timeout(format!(
                "closing sqlite pool took longer than {deadline:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    #[tokio::test]
    async fn migrate_is_idempotent() {
        let repo = SqliteRepository::in_memory().await.unwrap();

        repo.insert(&code("keep"), UrlRecord::new("https://example.com"))
            .await
            .unwrap();
        repo.migrate().await.unwrap();

        let got = repo.get(&code("keep")).await.unwrap().unwrap();
        assert_eq!(got.original_url, "https://example.com");
    }

    #[tokio::test]
    async fn insert_and_get() {
        let repo = SqliteRepository::in_memory().await.unwrap();

        repo.insert(&code("abc123"), UrlRecord::new("https://example.com/a?b=c#d"))
            .await
            .unwrap();

        let got = repo.get(&code("abc123")).await.unwrap().unwrap();
        assert_eq!(got.original_url, "https://example.com/a?b=c#d");
    }

    #[tokio::test]
    async fn insert_conflict_leaves_row_unchanged() {
        let repo = SqliteRepository::in_memory().await.unwrap();

        repo.insert(&code("abc123"), UrlRecord::new("https://one.example"))
            .await
            .unwrap();

        let err = repo
            .insert(&code("abc123"), UrlRecord::new("https://two.example"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict(ref c) if c == "abc123"));

        let got = repo.get(&code("abc123")).await.unwrap().unwrap();
        assert_eq!(got.original_url, "https://one.example");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM url")
            .fetch_one(repo.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn same_destination_under_two_aliases() {
        let repo = SqliteRepository::in_memory().await.unwrap();

        repo.insert(&code("first"), UrlRecord::new("https://example.com"))
            .await
            .unwrap();
        repo.insert(&code("second"), UrlRecord::new("https://example.com"))
            .await
            .unwrap();

        assert!(repo.get(&code("first")).await.unwrap().is_some());
        assert!(repo.get(&code("second")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let repo = SqliteRepository::in_memory().await.unwrap();

        repo.insert(&code("gone"), UrlRecord::new("https://example.com"))
            .await
            .unwrap();

        assert!(repo.delete(&code("gone")).await.unwrap());
        assert!(repo.get(&code("gone")).await.unwrap().is_none());
        assert!(!repo.delete(&code("gone")).await.unwrap());
    }

    #[tokio::test]
    async fn queries_after_close_are_unavailable() {
        let repo = SqliteRepository::in_memory().await.unwrap();

        repo.close(Duration::from_secs(1)).await.unwrap();

        let err = repo.get(&code("abc")).await.unwrap_err();
        assert!(matches!(err, StorageError::Unavailable(_)));
    }

    #[tokio::test]
    async fn close_times_out_while_a_connection_is_held() {
        let repo = SqliteRepository::in_memory().await.unwrap();
        let held = repo.pool().acquire().await.unwrap();

        let err = repo.close(Duration::from_millis(50)).await.unwrap_err();
        assert!(matches!(err, StorageError::Timeout(_)));

        drop(held);
    }
}
