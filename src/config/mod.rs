//! Configuration loading and management.
//!
//! - [`types`]: config struct definitions and TOML loading
//! - [`defaults`]: serde default functions
//! - [`validation`]: startup checks

mod defaults;
mod types;
pub mod validation;

pub use types::{
    CommandsConfig, Config, ConfigError, DatabaseConfig, IdentityConfig, ServerConfig,
    ServicesConfig,
};
pub use validation::{ValidationError, validate};
