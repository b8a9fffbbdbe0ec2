//! Activity log repository.
//!
//! Append-only. Nothing in the bot reads it back for control flow.

use super::{DbError, with_schema};
use sqlx::SqlitePool;

/// Event-type tag stored in the `type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Text,
    Nick,
    Join,
    Part,
    Kick,
    Quit,
    Topic,
}

impl LogKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Nick => "NICK",
            Self::Join => "JOIN",
            Self::Part => "PART",
            Self::Kick => "KICK",
            Self::Quit => "QUIT",
            Self::Topic => "TOPIC",
        }
    }
}

/// A row of the `log` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub hostname: String,
    pub nickname: String,
    pub channel: String,
    pub server: String,
    pub time: i64,
    pub kind: String,
    pub message: String,
}

type LogRow = (
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<i64>,
    Option<String>,
    Option<String>,
);

/// Repository for the activity log.
pub struct ActivityRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ActivityRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Append one entry.
    #[allow(clippy::too_many_arguments)]
    pub async fn append(
        &self,
        hostname: &str,
        nickname: &str,
        channel: &str,
        server: &str,
        time: i64,
        kind: LogKind,
        message: &str,
    ) -> Result<(), DbError> {
        with_schema(self.pool, || {
            sqlx::query(
                r#"
                INSERT INTO log (hostname, nickname, channel, server, time, type, message)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(hostname)
            .bind(nickname)
            .bind(channel)
            .bind(server)
            .bind(time)
            .bind(kind.as_str())
            .bind(message)
            .execute(self.pool)
        })
        .await?;

        Ok(())
    }

    /// Most recent entries, newest first.
    pub async fn recent(&self, limit: i64) -> Result<Vec<LogEntry>, DbError> {
        let rows = with_schema(self.pool, || {
            sqlx::query_as::<_, LogRow>(
                r#"
                SELECT hostname, nickname, channel, server, time, type, message
                FROM log
                ORDER BY rowid DESC
                LIMIT ?
                "#,
            )
            .bind(limit)
            .fetch_all(self.pool)
        })
        .await?;

        Ok(rows
            .into_iter()
            .map(|(hostname, nickname, channel, server, time, kind, message)| LogEntry {
                hostname: hostname.unwrap_or_default(),
                nickname: nickname.unwrap_or_default(),
                channel: channel.unwrap_or_default(),
                server: server.unwrap_or_default(),
                time: time.unwrap_or_default(),
                kind: kind.unwrap_or_default(),
                message: message.unwrap_or_default(),
            })
            .collect())
    }

    pub async fn count(&self) -> Result<i64, DbError> {
        let count = with_schema(self.pool, || {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM log").fetch_one(self.pool)
        })
        .await?;
        Ok(count)
    }
}
