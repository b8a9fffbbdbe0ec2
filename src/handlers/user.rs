//! NICK and QUIT.

use snek_proto::Message;
use tracing::info;

use super::{Context, log_event};
use crate::db::LogKind;
use crate::error::HandlerError;
use crate::state::Identity;

pub(super) async fn on_nick(
    ctx: &mut Context<'_>,
    msg: &Message,
    sender: &mut Identity,
) -> Result<(), HandlerError> {
    let new_nick = msg.arg(0).ok_or(HandlerError::NeedMoreParams("NICK"))?;

    if ctx.client.state().is_self(sender.nickname()) {
        info!(old = %sender.nickname(), new = %new_nick, "Our nickname changed");
        ctx.client.state_mut().set_nickname(new_nick);
    }

    sender.rename(ctx.db, new_nick).await?;
    log_event(ctx, sender, "", LogKind::Nick, new_nick).await
}

pub(super) async fn on_quit(
    ctx: &mut Context<'_>,
    msg: &Message,
    sender: &Identity,
) -> Result<(), HandlerError> {
    log_event(ctx, sender, "", LogKind::Quit, &msg.args_from(0)).await
}
