//! Command units shipped with the bot.

mod channels;
mod example;
mod reload;

pub use channels::{JoinCommand, PartCommand};
pub use example::ExampleCommand;
pub use reload::ReloadCommand;

use super::{AdminOnly, HandlerDefinition, HandlerSource};

/// The built-in command set.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinHandlers;

impl HandlerSource for BuiltinHandlers {
    fn definitions(&self) -> Vec<HandlerDefinition> {
        vec![
            HandlerDefinition::command("example", ExampleCommand),
            HandlerDefinition::command("join", AdminOnly::new(JoinCommand)),
            HandlerDefinition::command("part", AdminOnly::new(PartCommand)),
            HandlerDefinition::command("reload", AdminOnly::new(ReloadCommand)),
            // Argument helpers shared by the units above; not a command.
            HandlerDefinition::helper("args"),
        ]
    }
}

/// Words after the command name.
pub(crate) fn args(message: &str) -> impl Iterator<Item = &str> {
    message.split(' ').skip(1).filter(|w| !w.is_empty())
}
