//! snekbot - a small IRC bot with a user directory, an activity log and
//! pluggable chat commands.
//!
//! The binary in `main.rs` wires these together; the library exists so the
//! session can be driven from integration tests.

pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod network;
pub mod state;
pub mod telemetry;

pub use config::Config;
pub use db::Database;
pub use network::Session;
