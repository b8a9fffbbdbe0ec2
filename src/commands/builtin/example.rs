//! The `example` command.

use async_trait::async_trait;

use crate::commands::{CommandContext, CommandHandler, CommandOutcome, HandlerResult};

/// `example` - echoes the sender's nickname and message back.
pub struct ExampleCommand;

#[async_trait]
impl CommandHandler for ExampleCommand {
    async fn handle(&self, ctx: &mut CommandContext<'_>, message: &str) -> HandlerResult {
        let reply = format!(
            "Your nickname is {} and you said: {}",
            ctx.sender.nickname(),
            message
        );
        ctx.client.send_msg(ctx.target, &reply).await?;
        Ok(CommandOutcome::Handled)
    }
}
