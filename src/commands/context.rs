//! What a command unit gets to work with.

use crate::db::Database;
use crate::network::Client;
use crate::state::Identity;

/// Per-invocation context handed to a [`super::CommandHandler`].
pub struct CommandContext<'a> {
    /// Outgoing helpers and the bot's own session state.
    pub client: &'a mut Client,
    /// Durable stores.
    pub db: &'a Database,
    /// Who issued the command.
    pub sender: &'a Identity,
    /// Where to answer: the channel, or the sender's nickname for a direct message.
    pub target: &'a str,
    reload_requested: bool,
}

impl<'a> CommandContext<'a> {
    pub fn new(
        client: &'a mut Client,
        db: &'a Database,
        sender: &'a Identity,
        target: &'a str,
    ) -> Self {
        Self {
            client,
            db,
            sender,
            target,
            reload_requested: false,
        }
    }

    /// Ask for the registry to be rebuilt once this dispatch returns.
    pub fn request_reload(&mut self) {
        self.reload_requested = true;
    }

    pub fn reload_requested(&self) -> bool {
        self.reload_requested
    }
}
