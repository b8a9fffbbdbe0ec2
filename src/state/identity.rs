//! Identity of a message sender, backed by the user directory.

use snek_proto::Prefix;

use crate::db::{AuthLevel, Database, DbError, FieldValue, UserField, UserRecord, users};

/// The sender of one inbound line.
///
/// Only a user origin (`nick!user@host`) resolves to a directory record;
/// server origins produce an invalid identity and are routed as server
/// replies instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    record: Option<UserRecord>,
}

impl Identity {
    /// Resolve the sender of a line, creating its directory record on first
    /// contact and refreshing nickname and activity otherwise.
    pub async fn resolve(
        db: &Database,
        prefix: Option<&Prefix>,
        server: &str,
    ) -> Result<Self, DbError> {
        let Some((address, nick)) = prefix.and_then(|p| Some((p.address()?, p.nick()?))) else {
            return Ok(Self::unresolved());
        };

        let now = chrono::Utc::now().timestamp();
        let (record, created) = db.users().touch_or_create(&address, nick, server, now).await?;
        if created {
            tracing::debug!(hostname = %address, nick = %nick, "New user recorded");
        }

        Ok(Self {
            record: Some(record),
        })
    }

    /// An identity that never resolved.
    pub fn unresolved() -> Self {
        Self { record: None }
    }

    /// Wrap an already loaded record.
    pub fn from_record(record: UserRecord) -> Self {
        Self {
            record: Some(record),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.record.is_some()
    }

    pub fn hostname(&self) -> &str {
        self.record.as_ref().map_or("", |r| r.hostname.as_str())
    }

    pub fn nickname(&self) -> &str {
        self.record.as_ref().map_or("", |r| r.nickname.as_str())
    }

    /// Authorization tier. Unresolved identities carry no rights.
    pub fn level(&self) -> AuthLevel {
        self.record
            .as_ref()
            .map_or(AuthLevel::Banned, UserRecord::auth_level)
    }

    /// Update one field and persist it.
    ///
    /// Returns `Ok(false)` without writing when the identity is unresolved,
    /// the field is currently unset, the value has the wrong kind, or the
    /// value would not change anything.
    pub async fn set_info(
        &mut self,
        db: &Database,
        field: UserField,
        value: FieldValue,
    ) -> Result<bool, DbError> {
        let Some(record) = self.record.as_mut() else {
            return Ok(false);
        };

        let mut updated = record.clone();
        if !users::apply_field(&mut updated, field, &value) {
            return Ok(false);
        }

        db.users().update_field(&record.hostname, field, &value).await?;
        *record = updated;
        Ok(true)
    }

    /// Follow a nickname change.
    pub async fn rename(&mut self, db: &Database, nickname: &str) -> Result<bool, DbError> {
        self.set_info(db, UserField::Nickname, FieldValue::Text(nickname.to_string()))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn server_origin_is_invalid() {
        let db = Database::new(":memory:").await.unwrap();
        let prefix = Prefix::new_from_str("irc.example.net");

        let identity = Identity::resolve(&db, Some(&prefix), "irc.example.net")
            .await
            .unwrap();
        assert!(!identity.is_valid());
        assert_eq!(identity.level(), AuthLevel::Banned);

        let identity = Identity::resolve(&db, None, "irc.example.net").await.unwrap();
        assert!(!identity.is_valid());
        assert_eq!(db.users().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn resolve_keeps_level_and_refreshes_nick() {
        let db = Database::new(":memory:").await.unwrap();
        let prefix = Prefix::new("alice", "al", "example.org");

        let first = Identity::resolve(&db, Some(&prefix), "irc.example.net")
            .await
            .unwrap();
        assert!(first.is_valid());
        assert_eq!(first.hostname(), "al@example.org");
        assert_eq!(first.level(), AuthLevel::Normal);

        db.users()
            .set_level("al@example.org", AuthLevel::Admin)
            .await
            .unwrap();

        let renamed = Prefix::new("alice2", "al", "example.org");
        let second = Identity::resolve(&db, Some(&renamed), "irc.example.net")
            .await
            .unwrap();
        assert_eq!(second.level(), AuthLevel::Admin);
        assert_eq!(second.nickname(), "alice2");
        assert_eq!(db.users().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn rename_persists_and_rejects_noop() {
        let db = Database::new(":memory:").await.unwrap();
        let prefix = Prefix::new("bob", "b", "host");
        let mut identity = Identity::resolve(&db, Some(&prefix), "irc")
            .await
            .unwrap();

        assert!(!identity.rename(&db, "bob").await.unwrap());
        assert!(identity.rename(&db, "robert").await.unwrap());
        assert_eq!(identity.nickname(), "robert");

        let stored = db.users().find("b@host").await.unwrap().unwrap();
        assert_eq!(stored.nickname, "robert");

        let mut nobody = Identity::unresolved();
        assert!(!nobody.rename(&db, "x").await.unwrap());
    }
}
