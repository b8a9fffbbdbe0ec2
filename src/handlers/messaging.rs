//! PRIVMSG and NOTICE.

use snek_proto::Message;
use tracing::{debug, info};

use super::{Context, log_event};
use crate::db::LogKind;
use crate::error::HandlerError;
use crate::state::Identity;

/// Log chat, then offer it to the command dispatcher.
///
/// Direct messages are answered to the sender rather than to ourselves.
pub(super) async fn on_privmsg(
    ctx: &mut Context<'_>,
    msg: &Message,
    sender: &Identity,
) -> Result<(), HandlerError> {
    let target = msg.arg(0).ok_or(HandlerError::NeedMoreParams("PRIVMSG"))?;
    let text = msg.arg(1).unwrap_or_default();

    log_event(ctx, sender, target, LogKind::Text, text).await?;

    let destination = if ctx.client.state().is_self(target) {
        sender.nickname()
    } else {
        target
    };
    debug!(target = %destination, nick = %sender.nickname(), text = %text, "PRIVMSG");

    ctx.commands
        .process(ctx.client, ctx.db, text, destination, sender)
        .await?;
    Ok(())
}

/// Watch for the services bot asking us to identify.
pub(super) async fn on_notice(
    ctx: &mut Context<'_>,
    msg: &Message,
    sender: &Identity,
) -> Result<(), HandlerError> {
    let text = msg.trailing().unwrap_or_default();
    let config = ctx.client.config();
    let services = &config.services;

    if sender.nickname().eq_ignore_ascii_case(&services.nickserv) {
        if text.contains(&services.identify_trigger) {
            let account = services
                .account
                .as_deref()
                .unwrap_or(&config.identity.nickname);
            if let Some(password) = services.credential()
                && ctx.client.state().is_self(account)
            {
                info!(service = %services.nickserv, "Identifying with services");
                let line = format!("IDENTIFY {password}");
                ctx.client.send_msg(&services.nickserv, &line).await?;
            }
        } else if text.contains(&services.identified_marker) {
            info!(service = %services.nickserv, "Identified with services");
        }
    }

    debug!(nick = %sender.nickname(), text = %text, "NOTICE");
    Ok(())
}
