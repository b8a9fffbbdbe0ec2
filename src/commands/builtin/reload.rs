//! Registry reload command.

use async_trait::async_trait;

use crate::commands::{CommandContext, CommandHandler, CommandOutcome, HandlerResult};

/// `reload` - rebuild the command registry from its source.
pub struct ReloadCommand;

#[async_trait]
impl CommandHandler for ReloadCommand {
    async fn handle(&self, ctx: &mut CommandContext<'_>, _message: &str) -> HandlerResult {
        ctx.request_reload();
        ctx.client.send_msg(ctx.target, "Reloading commands").await?;
        Ok(CommandOutcome::Handled)
    }
}
