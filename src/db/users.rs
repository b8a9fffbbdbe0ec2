//! User directory repository.
//!
//! One row per `user@host` address. Rows are created on first contact and
//! never deleted; nickname and activity are refreshed on every later contact,
//! while the authorization level is only changed explicitly.

use super::{DbError, with_schema};
use sqlx::SqlitePool;

/// Authorization tiers, stored as integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(i64)]
pub enum AuthLevel {
    Banned = 0,
    Normal = 1,
    Service = 2,
    Admin = 5,
}

impl AuthLevel {
    /// Map a stored integer to a tier.
    ///
    /// Values between the named tiers round down; anything at or above the
    /// admin value is admin.
    pub fn from_raw(raw: i64) -> Self {
        match raw {
            i64::MIN..=0 => Self::Banned,
            1 => Self::Normal,
            2..=4 => Self::Service,
            _ => Self::Admin,
        }
    }

    pub fn as_raw(self) -> i64 {
        self as i64
    }
}

/// A row of the `user` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub hostname: String,
    pub nickname: String,
    pub server: Option<String>,
    pub level: i64,
    pub activity: Option<i64>,
}

impl UserRecord {
    pub fn auth_level(&self) -> AuthLevel {
        AuthLevel::from_raw(self.level)
    }

    /// Current value of a field.
    pub fn get(&self, field: UserField) -> Option<FieldValue> {
        match field {
            UserField::Nickname => Some(FieldValue::Text(self.nickname.clone())),
            UserField::Server => self.server.clone().map(FieldValue::Text),
            UserField::Level => Some(FieldValue::Int(self.level)),
            UserField::Activity => self.activity.map(FieldValue::Int),
        }
    }

    fn set(&mut self, field: UserField, value: FieldValue) {
        match (field, value) {
            (UserField::Nickname, FieldValue::Text(v)) => self.nickname = v,
            (UserField::Server, FieldValue::Text(v)) => self.server = Some(v),
            (UserField::Level, FieldValue::Int(v)) => self.level = v,
            (UserField::Activity, FieldValue::Int(v)) => self.activity = Some(v),
            // Mismatched kinds are rejected before we get here.
            _ => {}
        }
    }
}

/// Mutable columns of the `user` table. The hostname is the key and never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Nickname,
    Server,
    Level,
    Activity,
}

impl UserField {
    fn column(self) -> &'static str {
        match self {
            Self::Nickname => "nickname",
            Self::Server => "server",
            Self::Level => "level",
            Self::Activity => "activity",
        }
    }

    fn is_text(self) -> bool {
        matches!(self, Self::Nickname | Self::Server)
    }
}

/// A value for one of the [`UserField`] columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Int(i64),
}

impl FieldValue {
    /// Unset-like values: empty text and zero.
    pub fn is_falsy(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Int(i) => *i == 0,
        }
    }

    fn fits(&self, field: UserField) -> bool {
        matches!(self, Self::Text(_)) == field.is_text()
    }
}

type UserRow = (String, Option<String>, Option<String>, Option<i64>, Option<i64>);

fn record_from_row(row: UserRow) -> UserRecord {
    let (hostname, nickname, server, level, activity) = row;
    UserRecord {
        hostname,
        nickname: nickname.unwrap_or_default(),
        server,
        level: level.unwrap_or(AuthLevel::Normal.as_raw()),
        activity,
    }
}

/// Repository for user directory operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a user by address.
    pub async fn find(&self, hostname: &str) -> Result<Option<UserRecord>, DbError> {
        let row = with_schema(self.pool, || {
            sqlx::query_as::<_, UserRow>(
                r#"
                SELECT hostname, nickname, server, level, activity
                FROM user
                WHERE hostname = ?
                "#,
            )
            .bind(hostname)
            .fetch_optional(self.pool)
        })
        .await?;

        Ok(row.map(record_from_row))
    }

    /// Look up a user, creating the row at [`AuthLevel::Normal`] on a miss.
    ///
    /// On a hit the nickname and activity are refreshed and the stored level
    /// is returned untouched. The second tuple field is `true` when the row
    /// was created by this call.
    pub async fn touch_or_create(
        &self,
        hostname: &str,
        nickname: &str,
        server: &str,
        now: i64,
    ) -> Result<(UserRecord, bool), DbError> {
        if let Some(mut record) = self.find(hostname).await? {
            with_schema(self.pool, || {
                sqlx::query("UPDATE user SET nickname = ?, activity = ? WHERE hostname = ?")
                    .bind(nickname)
                    .bind(now)
                    .bind(hostname)
                    .execute(self.pool)
            })
            .await?;

            record.nickname = nickname.to_string();
            record.activity = Some(now);
            return Ok((record, false));
        }

        // UNIQUE(hostname) keeps this at one row even if another writer raced us.
        let result = with_schema(self.pool, || {
            sqlx::query(
                r#"
                INSERT INTO user (hostname, nickname, server, level, activity)
                VALUES (?, ?, ?, ?, ?)
                ON CONFLICT(hostname) DO NOTHING
                "#,
            )
            .bind(hostname)
            .bind(nickname)
            .bind(server)
            .bind(AuthLevel::Normal.as_raw())
            .bind(now)
            .execute(self.pool)
        })
        .await?;

        let record = self
            .find(hostname)
            .await?
            .ok_or_else(|| DbError::UserNotFound(hostname.to_string()))?;

        Ok((record, result.rows_affected() == 1))
    }

    /// Write one column of one row.
    pub async fn update_field(
        &self,
        hostname: &str,
        field: UserField,
        value: &FieldValue,
    ) -> Result<(), DbError> {
        let sql = format!("UPDATE user SET {} = ? WHERE hostname = ?", field.column());
        let result = with_schema(self.pool, || {
            let query = sqlx::query(&sql);
            let query = match value {
                FieldValue::Text(s) => query.bind(s.as_str()),
                FieldValue::Int(i) => query.bind(*i),
            };
            query.bind(hostname).execute(self.pool)
        })
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::UserNotFound(hostname.to_string()));
        }
        Ok(())
    }

    /// Set the authorization level of a known user.
    pub async fn set_level(&self, hostname: &str, level: AuthLevel) -> Result<(), DbError> {
        self.update_field(hostname, UserField::Level, &FieldValue::Int(level.as_raw()))
            .await
    }

    pub async fn count(&self) -> Result<i64, DbError> {
        let count = with_schema(self.pool, || {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM user").fetch_one(self.pool)
        })
        .await?;
        Ok(count)
    }
}

/// Apply a field update to a record the way the directory does: refuse when
/// the field is unset, when the value kind does not match the column, or
/// when nothing would change. Returns whether the record was modified.
pub(crate) fn apply_field(record: &mut UserRecord, field: UserField, value: &FieldValue) -> bool {
    if !value.fits(field) {
        return false;
    }
    match record.get(field) {
        None => false,
        Some(current) if current.is_falsy() => false,
        Some(current) if current == *value => false,
        Some(_) => {
            record.set(field, value.clone());
            true
        }
    }
}
