//! Chat commands: handler trait, registry and dispatcher.
//!
//! A chat line starting with the configured prefix names a command unit.
//! Units come from a [`HandlerSource`]; the [`CommandRegistry`] maps names to
//! units and is rebuilt wholesale on reload; the [`CommandModule`] does the
//! lookup, the repeat shortcut and last-command bookkeeping.

mod admin;
pub mod builtin;
mod context;
mod dispatcher;
mod registry;

pub use admin::AdminOnly;
pub use context::CommandContext;
pub use dispatcher::CommandModule;
pub use registry::{CommandRegistry, HandlerDefinition, HandlerSource};

use async_trait::async_trait;

use crate::error::HandlerError;

/// Whether a command unit acted on a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The command did its job; it becomes the repeatable last command.
    Handled,
    /// Nothing happened (wrong arguments, not allowed, ...).
    Declined,
}

/// Result type for command units.
pub type HandlerResult = Result<CommandOutcome, HandlerError>;

/// A chat command unit.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Run the command.
    ///
    /// `message` is the full chat line including prefix and command name.
    async fn handle(&self, ctx: &mut CommandContext<'_>, message: &str) -> HandlerResult;

    /// Drop any state held between invocations. Called before the registry
    /// that owns this unit is rebuilt.
    fn release(&self) {}
}
