//! Integration test common infrastructure.
//!
//! A scripted stand-in for an IRC server: the test accepts the bot's
//! connection, reads what it sends, and writes whatever the scenario needs.

pub mod server;

#[allow(unused_imports)]
pub use server::{FakePeer, FakeServer, bot_config, bot_config_with_reconnect_delay};
