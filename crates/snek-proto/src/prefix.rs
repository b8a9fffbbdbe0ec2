//! Message prefix types.
//!
//! A prefix identifies the origin of a message. It is either a server name
//! or a user's `nick!user@host` mask.

use std::fmt;

/// Origin of a message.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum Prefix {
    /// Server name (e.g., "irc.example.com"), or any origin without a host part.
    ServerName(String),
    /// User prefix: (nickname, username, hostname)
    Nickname(String, String, String),
}

impl Prefix {
    /// Parse a prefix string.
    ///
    /// Lenient: anything without an `@` is treated as a server name, since
    /// only a host part makes the origin a user.
    pub fn new_from_str(s: &str) -> Self {
        let Some((before_at, host)) = s.split_once('@') else {
            return Prefix::ServerName(s.to_owned());
        };

        let (nick, user) = before_at.split_once('!').unwrap_or((before_at, ""));
        Prefix::Nickname(nick.to_owned(), user.to_owned(), host.to_owned())
    }

    /// Create a user prefix from its components.
    pub fn new(nick: impl Into<String>, user: impl Into<String>, host: impl Into<String>) -> Self {
        Prefix::Nickname(nick.into(), user.into(), host.into())
    }

    /// Nickname, if this is a user prefix.
    pub fn nick(&self) -> Option<&str> {
        match self {
            Prefix::Nickname(nick, _, _) if !nick.is_empty() => Some(nick),
            _ => None,
        }
    }

    /// Username, if this is a user prefix.
    pub fn user(&self) -> Option<&str> {
        match self {
            Prefix::Nickname(_, user, _) if !user.is_empty() => Some(user),
            _ => None,
        }
    }

    /// Hostname, or the server name.
    pub fn host(&self) -> Option<&str> {
        match self {
            Prefix::ServerName(name) => Some(name),
            Prefix::Nickname(_, _, host) if !host.is_empty() => Some(host),
            _ => None,
        }
    }

    /// The `user@host` part of a user prefix.
    ///
    /// This is the stable identity key for a person: it survives nickname
    /// changes. `None` for server origins or masks with an empty host.
    pub fn address(&self) -> Option<String> {
        match self {
            Prefix::Nickname(_, user, host) if !host.is_empty() => {
                Some(format!("{user}@{host}"))
            }
            _ => None,
        }
    }

    /// Whether this prefix names a user rather than a server.
    pub fn is_user(&self) -> bool {
        self.address().is_some()
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prefix::ServerName(name) => f.write_str(name),
            Prefix::Nickname(nick, user, host) if user.is_empty() => write!(f, "{nick}@{host}"),
            Prefix::Nickname(nick, user, host) => write!(f, "{nick}!{user}@{host}"),
        }
    }
}
