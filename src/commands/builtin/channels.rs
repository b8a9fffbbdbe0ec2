//! `join` and `part` commands.

use async_trait::async_trait;

use super::args;
use crate::commands::{CommandContext, CommandHandler, CommandOutcome, HandlerResult};

fn is_channel_name(name: &str) -> bool {
    name.len() > 1 && (name.starts_with('#') || name.starts_with('&'))
}

/// `join <channel>` - join a channel.
pub struct JoinCommand;

#[async_trait]
impl CommandHandler for JoinCommand {
    async fn handle(&self, ctx: &mut CommandContext<'_>, message: &str) -> HandlerResult {
        let Some(channel) = args(message).next() else {
            ctx.client
                .send_error_msg(ctx.target, "which channel?")
                .await?;
            return Ok(CommandOutcome::Declined);
        };
        if !is_channel_name(channel) {
            ctx.client
                .send_error_msg(ctx.target, &format!("{channel} is not a channel"))
                .await?;
            return Ok(CommandOutcome::Declined);
        }

        ctx.client.join(channel).await?;
        Ok(CommandOutcome::Handled)
    }
}

/// `part [channel]` - leave one channel, or all of them.
pub struct PartCommand;

#[async_trait]
impl CommandHandler for PartCommand {
    async fn handle(&self, ctx: &mut CommandContext<'_>, message: &str) -> HandlerResult {
        let channel = args(message).next();
        if let Some(channel) = channel
            && !ctx.client.state().is_joined(channel)
        {
            ctx.client
                .send_error_msg(ctx.target, &format!("not in {channel}"))
                .await?;
            return Ok(CommandOutcome::Declined);
        }

        ctx.client.part(channel).await?;
        Ok(CommandOutcome::Handled)
    }
}
