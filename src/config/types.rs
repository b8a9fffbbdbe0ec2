//! Core config struct definitions and loading.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use super::defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Where to connect.
    pub server: ServerConfig,
    /// Who we say we are.
    pub identity: IdentityConfig,
    /// Chat command settings.
    #[serde(default)]
    pub commands: CommandsConfig,
    /// Channels joined once the server finishes its connect burst.
    #[serde(default)]
    pub channels: Vec<String>,
    /// Nickname services integration.
    #[serde(default)]
    pub services: ServicesConfig,
    /// Durable storage.
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// Server connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Hostname or address of the server.
    pub host: String,
    /// TCP port (default: 6667).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Pause between opening the socket and sending NICK/USER.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// Pause before reconnecting after a recoverable server ERROR.
    #[serde(default = "default_reconnect_delay_secs")]
    pub reconnect_delay_secs: u64,
    /// Message sent with QUIT on orderly shutdown.
    #[serde(default = "default_quit_message")]
    pub quit_message: String,
}

impl ServerConfig {
    /// `host:port` string for the socket.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_delay_secs)
    }
}

/// Identity sent during the handshake.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    /// Preferred nickname.
    pub nickname: String,
    /// Fallback when the preferred one is taken; numbered on repeated collisions.
    pub alt_nickname: String,
    /// Username part of our mask.
    pub ident: String,
    /// Real name shown in WHOIS.
    pub realname: String,
}

/// Chat command configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandsConfig {
    /// Marker a message must start with to be treated as a command.
    #[serde(default = "default_command_prefix")]
    pub prefix: String,
    /// Command name that replays the last successful command.
    #[serde(default = "default_repeat_token")]
    pub repeat_token: String,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            prefix: default_command_prefix(),
            repeat_token: default_repeat_token(),
        }
    }
}

/// Nickname services configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServicesConfig {
    /// Nickname of the services bot.
    #[serde(default = "default_nickserv")]
    pub nickserv: String,
    /// Nickname registered with services; we only identify while using it.
    #[serde(default)]
    pub account: Option<String>,
    /// Services password. Empty or missing disables identification.
    #[serde(default)]
    pub password: Option<String>,
    /// Notice text asking us to identify.
    #[serde(default = "default_identify_trigger")]
    pub identify_trigger: String,
    /// Notice text confirming identification.
    #[serde(default = "default_identified_marker")]
    pub identified_marker: String,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            nickserv: default_nickserv(),
            account: None,
            password: None,
            identify_trigger: default_identify_trigger(),
            identified_marker: default_identified_marker(),
        }
    }
}

impl ServicesConfig {
    /// Password to send, if identification is configured.
    pub fn credential(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to SQLite database file, or `:memory:`.
    #[serde(default = "default_database_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r##"
channels = ["#snek", "#python"]

[server]
host = "irc.example.net"
port = 6697
settle_delay_ms = 0
reconnect_delay_secs = 1

[identity]
nickname = "snekbot"
alt_nickname = "snekbot_"
ident = "snek"
realname = "Snek Bot"

[commands]
prefix = "."

[services]
account = "snekbot"
password = "hunter2"

[database]
path = "data/snek.db"
"##;

    #[test]
    fn parses_full_config() {
        let config = Config::from_toml(FULL).unwrap();
        assert_eq!(config.server.address(), "irc.example.net:6697");
        assert_eq!(config.server.settle_delay(), Duration::ZERO);
        assert_eq!(config.server.reconnect_delay(), Duration::from_secs(1));
        assert_eq!(config.identity.alt_nickname, "snekbot_");
        assert_eq!(config.commands.prefix, ".");
        assert_eq!(config.commands.repeat_token, "2");
        assert_eq!(config.channels, vec!["#snek", "#python"]);
        assert_eq!(config.services.nickserv, "NickServ");
        assert_eq!(config.services.credential(), Some("hunter2"));
        assert_eq!(config.database.path, "data/snek.db");
    }

    #[test]
    fn applies_defaults() {
        let config = Config::from_toml(
            r#"
[server]
host = "irc.example.net"

[identity]
nickname = "snekbot"
alt_nickname = "snekbot_"
ident = "snek"
realname = "Snek Bot"
"#,
        )
        .unwrap();
        assert_eq!(config.server.port, 6667);
        assert_eq!(config.server.reconnect_delay(), Duration::from_secs(5));
        assert_eq!(config.server.settle_delay(), Duration::from_secs(2));
        assert_eq!(config.server.quit_message, "brb!");
        assert_eq!(config.commands.prefix, "!");
        assert!(config.channels.is_empty());
        assert_eq!(config.services.credential(), None);
        assert_eq!(config.database.path, "snekbot.db");
    }

    #[test]
    fn empty_password_disables_identify() {
        let services = ServicesConfig {
            password: Some(String::new()),
            ..ServicesConfig::default()
        };
        assert_eq!(services.credential(), None);
    }

    #[test]
    fn missing_identity_is_an_error() {
        let err = Config::from_toml("[server]\nhost = \"x\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
