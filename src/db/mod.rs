//! Database module for persistent storage.
//!
//! Provides async SQLite access using SQLx for:
//! - the user directory (`user` table)
//! - the activity log (`log` table)
//!
//! Both tables are created on open when missing, and again on first access
//! if one disappears while the bot runs. Every write is a single
//! auto-committed statement.

mod activity;
pub(crate) mod users;

pub use activity::{ActivityRepository, LogEntry, LogKind};
pub use users::{AuthLevel, FieldValue, UserField, UserRecord, UserRepository};

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::future::Future;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

static MEMDB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("user not found: {0}")]
    UserNotFound(String),
}

const CREATE_USER_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS user (
    hostname TEXT UNIQUE,
    nickname TEXT,
    server TEXT,
    level INT,
    activity INT
)
"#;

const CREATE_LOG_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS log (
    hostname TEXT,
    nickname TEXT,
    channel TEXT,
    server TEXT,
    time INT,
    type TEXT,
    message TEXT
)
"#;

/// Database handle with connection pool.
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connection acquire timeout.
    const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

    /// Maximum time a connection can remain idle before being closed.
    const IDLE_TIMEOUT: Duration = Duration::from_secs(60);

    /// Open the database, creating the file and tables if needed.
    pub async fn new(path: &str) -> Result<Self, DbError> {
        let pool = if path == ":memory:" {
            // `file::memory:` is shared process-wide; parallel tests need their own.
            let id = MEMDB_COUNTER.fetch_add(1, Ordering::Relaxed);
            let memdb_uri = format!(
                "file:snekbot-memdb-{}-{}?mode=memory&cache=shared",
                std::process::id(),
                id
            );

            let options = SqliteConnectOptions::new()
                .filename(&memdb_uri)
                .shared_cache(true)
                .create_if_missing(true);

            Self::memory_pool_options().connect_with(options).await?
        } else {
            if let Some(parent) = Path::new(path).parent()
                && !parent.as_os_str().is_empty()
                && let Err(e) = std::fs::create_dir_all(parent)
            {
                warn!(path = %parent.display(), error = %e, "Failed to create database directory");
            }

            let options = SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true);

            SqlitePoolOptions::new()
                .max_connections(2)
                .acquire_timeout(Self::ACQUIRE_TIMEOUT)
                .idle_timeout(Some(Self::IDLE_TIMEOUT))
                .connect_with(options)
                .await?
        };

        info!(path = %path, "Database connected");

        sqlx::query("PRAGMA journal_mode=WAL")
            .execute(&pool)
            .await?;
        sqlx::query("PRAGMA synchronous=NORMAL")
            .execute(&pool)
            .await?;

        Self::ensure_schema(&pool).await?;

        Ok(Self { pool })
    }

    /// Pool settings for a private in-memory database.
    ///
    /// The database lives exactly as long as its last connection, so that
    /// connection is never reaped.
    fn memory_pool_options() -> SqlitePoolOptions {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .acquire_timeout(Self::ACQUIRE_TIMEOUT)
            .idle_timeout(None)
            .max_lifetime(None)
    }

    async fn ensure_schema(pool: &SqlitePool) -> Result<(), DbError> {
        sqlx::query(CREATE_USER_TABLE).execute(pool).await?;
        sqlx::query(CREATE_LOG_TABLE).execute(pool).await?;
        info!("Database tables checked/created");
        Ok(())
    }

    /// User directory repository.
    pub fn users(&self) -> UserRepository<'_> {
        UserRepository::new(&self.pool)
    }

    /// Activity log repository.
    pub fn activity(&self) -> ActivityRepository<'_> {
        ActivityRepository::new(&self.pool)
    }

    /// Flush and close every pooled connection.
    ///
    /// Later queries fail with `PoolClosed`.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database closed");
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

fn is_missing_table(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.message().starts_with("no such table"))
}

/// Run one statement. If SQLite reports a table missing, recreate the
/// schema and run it once more.
async fn with_schema<T, F, Fut>(pool: &SqlitePool, op: F) -> Result<T, DbError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    match op().await {
        Err(e) if is_missing_table(&e) => {
            warn!(error = %e, "Table missing, recreating schema");
            Database::ensure_schema(pool).await?;
            Ok(op().await?)
        }
        result => Ok(result?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_databases_are_isolated() {
        let a = Database::new(":memory:").await.unwrap();
        let b = Database::new(":memory:").await.unwrap();

        a.users()
            .touch_or_create("u@a", "alice", "irc.example.net", 1)
            .await
            .unwrap();

        assert_eq!(a.users().count().await.unwrap(), 1);
        assert_eq!(b.users().count().await.unwrap(), 0);
    }

    #[test]
    fn memory_pool_keeps_its_connection() {
        let options = Database::memory_pool_options();
        assert_eq!(options.get_min_connections(), 1);
        assert_eq!(options.get_max_connections(), 1);
        assert_eq!(options.get_idle_timeout(), None);
        assert_eq!(options.get_max_lifetime(), None);
    }

    #[tokio::test]
    async fn dropped_user_table_is_recreated_on_access() {
        let db = Database::new(":memory:").await.unwrap();
        db.users()
            .touch_or_create("u@h", "old", "irc.example.net", 1)
            .await
            .unwrap();

        sqlx::query("DROP TABLE user").execute(&db.pool).await.unwrap();

        let (record, created) = db
            .users()
            .touch_or_create("u@h", "nick", "irc.example.net", 2)
            .await
            .unwrap();
        assert!(created);
        assert_eq!(record.nickname, "nick");
        assert_eq!(record.auth_level(), AuthLevel::Normal);
        assert_eq!(db.users().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn dropped_log_table_is_recreated_on_access() {
        let db = Database::new(":memory:").await.unwrap();
        sqlx::query("DROP TABLE log").execute(&db.pool).await.unwrap();

        db.activity()
            .append("u@h", "nick", "#snek", "irc.example.net", 1, LogKind::Text, "hi")
            .await
            .unwrap();
        assert_eq!(db.activity().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn other_errors_are_not_retried() {
        let db = Database::new(":memory:").await.unwrap();
        db.close().await;
        assert!(matches!(
            db.users().count().await,
            Err(DbError::Sqlx(sqlx::Error::PoolClosed))
        ));
    }

    #[tokio::test]
    async fn file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("snek.db");
        let path = path.to_str().unwrap();

        let db = Database::new(path).await.unwrap();
        db.users()
            .touch_or_create("u@h", "nick", "irc.example.net", 1)
            .await
            .unwrap();
        db.close().await;
        assert!(db.is_closed());

        let db = Database::new(path).await.unwrap();
        let record = db.users().find("u@h").await.unwrap().unwrap();
        assert_eq!(record.nickname, "nick");
    }
}
