//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use std::path::Path;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("server.host is required")]
    MissingHost,
    #[error("server.port must not be 0")]
    InvalidPort,
    #[error("identity.{0} is required")]
    MissingIdentityField(&'static str),
    #[error("identity.{0} must not contain spaces: {1:?}")]
    SpaceInIdentityField(&'static str, String),
    #[error("commands.prefix must not be empty")]
    EmptyCommandPrefix,
    #[error("commands.repeat_token must be a single word, got {0:?}")]
    InvalidRepeatToken(String),
    #[error("channel name must start with '#' or '&': {0:?}")]
    InvalidChannel(String),
    #[error("database.path parent directory does not exist: {0}")]
    DatabasePathInvalid(String),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.host.trim().is_empty() {
        errors.push(ValidationError::MissingHost);
    }
    if config.server.port == 0 {
        errors.push(ValidationError::InvalidPort);
    }

    let identity = &config.identity;
    for (name, value) in [
        ("nickname", &identity.nickname),
        ("alt_nickname", &identity.alt_nickname),
        ("ident", &identity.ident),
    ] {
        if value.is_empty() {
            errors.push(ValidationError::MissingIdentityField(name));
        } else if value.contains(' ') {
            errors.push(ValidationError::SpaceInIdentityField(name, value.clone()));
        }
    }
    if identity.realname.is_empty() {
        errors.push(ValidationError::MissingIdentityField("realname"));
    }

    if config.commands.prefix.is_empty() {
        errors.push(ValidationError::EmptyCommandPrefix);
    }
    let token = &config.commands.repeat_token;
    if token.is_empty() || token.contains(char::is_whitespace) {
        errors.push(ValidationError::InvalidRepeatToken(token.clone()));
    }

    for channel in &config.channels {
        if !(channel.starts_with('#') || channel.starts_with('&')) || channel.contains(' ') {
            errors.push(ValidationError::InvalidChannel(channel.clone()));
        }
    }

    if config.database.path != ":memory:" {
        let db_path = Path::new(&config.database.path);
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            errors.push(ValidationError::DatabasePathInvalid(
                config.database.path.clone(),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_valid_config() -> String {
        r##"
channels = ["#snek"]

[server]
host = "irc.example.net"

[identity]
nickname = "snekbot"
alt_nickname = "snekbot_"
ident = "snek"
realname = "Snek Bot"

[database]
path = ":memory:"
"##
        .to_string()
    }

    #[test]
    fn test_valid_config() {
        let config = Config::from_toml(&minimal_valid_config()).unwrap();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_reports_every_problem() {
        let mut config = Config::from_toml(&minimal_valid_config()).unwrap();
        config.server.host = String::new();
        config.identity.alt_nickname = "snek bot".into();
        config.commands.repeat_token = String::new();
        config.channels.push("snek".into());

        let errors = validate(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::MissingHost,
                ValidationError::SpaceInIdentityField("alt_nickname", "snek bot".into()),
                ValidationError::InvalidRepeatToken(String::new()),
                ValidationError::InvalidChannel("snek".into()),
            ]
        );
    }

    #[test]
    fn test_database_parent_must_exist() {
        let mut config = Config::from_toml(&minimal_valid_config()).unwrap();
        config.database.path = "/definitely/not/here/snek.db".into();
        let errors = validate(&config).unwrap_err();
        assert!(matches!(
            errors.as_slice(),
            [ValidationError::DatabasePathInvalid(_)]
        ));
    }
}
