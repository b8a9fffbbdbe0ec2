//! JOIN, PART, KICK and TOPIC.

use snek_proto::Message;
use tracing::{info, warn};

use super::{Context, log_event};
use crate::db::{AuthLevel, LogKind};
use crate::error::HandlerError;
use crate::state::Identity;

/// Log the join; admins get channel operator status.
pub(super) async fn on_join(
    ctx: &mut Context<'_>,
    msg: &Message,
    sender: &Identity,
) -> Result<(), HandlerError> {
    let channel = msg.arg(0).ok_or(HandlerError::NeedMoreParams("JOIN"))?;

    if sender.level() >= AuthLevel::Admin {
        ctx.client.add_mode(channel, sender, 'o').await?;
    }

    log_event(ctx, sender, channel, LogKind::Join, "").await
}

pub(super) async fn on_part(
    ctx: &mut Context<'_>,
    msg: &Message,
    sender: &Identity,
) -> Result<(), HandlerError> {
    let channel = msg.arg(0).ok_or(HandlerError::NeedMoreParams("PART"))?;

    if ctx.client.state().is_self(sender.nickname()) {
        ctx.client.state_mut().remove_channel(channel);
        info!(channel = %channel, "Server confirmed part");
    }

    log_event(ctx, sender, channel, LogKind::Part, msg.arg(1).unwrap_or_default()).await
}

/// The log text is the victim followed by the reason.
pub(super) async fn on_kick(
    ctx: &mut Context<'_>,
    msg: &Message,
    sender: &Identity,
) -> Result<(), HandlerError> {
    let channel = msg.arg(0).ok_or(HandlerError::NeedMoreParams("KICK"))?;
    let victim = msg.arg(1).ok_or(HandlerError::NeedMoreParams("KICK"))?;

    if ctx.client.state().is_self(victim) {
        ctx.client.state_mut().remove_channel(channel);
        warn!(channel = %channel, by = %sender.nickname(), "Kicked from channel");
    }

    log_event(ctx, sender, channel, LogKind::Kick, &msg.args_from(1)).await
}

pub(super) async fn on_topic(
    ctx: &mut Context<'_>,
    msg: &Message,
    sender: &Identity,
) -> Result<(), HandlerError> {
    let channel = msg.arg(0).ok_or(HandlerError::NeedMoreParams("TOPIC"))?;
    log_event(ctx, sender, channel, LogKind::Topic, msg.arg(1).unwrap_or_default()).await
}
