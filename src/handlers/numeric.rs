//! Server replies.

use snek_proto::response::strip_member_prefix;
use snek_proto::{Message, Prefix, Response};
use tracing::{debug, info, warn};

use super::Context;
use crate::error::HandlerError;
use crate::state::Identity;

pub(super) async fn handle(ctx: &mut Context<'_>, msg: &Message) -> Result<(), HandlerError> {
    let Some(response) = msg.response() else {
        debug!(command = %msg.command, "Unhandled server message");
        return Ok(());
    };

    match response {
        r if r.is_end_of_burst() => on_registered(ctx).await,
        Response::RPL_WHOISUSER => on_whois_user(ctx, msg).await,
        Response::RPL_NAMREPLY => on_names(ctx, msg).await,
        Response::ERR_NICKNAMEINUSE => on_nick_in_use(ctx).await,
        other => {
            debug!(code = other.code(), "Unhandled server reply");
            Ok(())
        }
    }
}

/// The server is done with its welcome burst: claim our nickname and join
/// the configured channels.
async fn on_registered(ctx: &mut Context<'_>) -> Result<(), HandlerError> {
    info!(nick = %ctx.client.nickname(), "Registered with server");
    ctx.client.nick(None).await?;

    let channels = ctx.client.config().channels.clone();
    for channel in &channels {
        ctx.client.join(channel).await?;
    }
    Ok(())
}

/// `311 <me> <nick> <user> <host> * :<realname>`
async fn on_whois_user(ctx: &mut Context<'_>, msg: &Message) -> Result<(), HandlerError> {
    let missing = || HandlerError::NeedMoreParams("RPL_WHOISUSER");
    let nick = msg.arg(1).ok_or_else(missing)?;
    let user = msg.arg(2).ok_or_else(missing)?;
    let host = msg.arg(3).ok_or_else(missing)?;

    let prefix = Prefix::new(nick, user, host);
    let server = ctx.client.config().server.host.clone();
    let identity = Identity::resolve(ctx.db, Some(&prefix), &server).await?;
    debug!(nick = %nick, hostname = %identity.hostname(), "Recorded user from WHOIS");
    Ok(())
}

/// `353 <me> <type> <channel> :<members...>`: look up everyone present.
async fn on_names(ctx: &mut Context<'_>, msg: &Message) -> Result<(), HandlerError> {
    let members = msg
        .arg(3)
        .ok_or(HandlerError::NeedMoreParams("RPL_NAMREPLY"))?;

    for member in members.split_whitespace() {
        let nick = strip_member_prefix(member);
        if !nick.is_empty() {
            ctx.client.whois(nick).await?;
        }
    }
    Ok(())
}

async fn on_nick_in_use(ctx: &mut Context<'_>) -> Result<(), HandlerError> {
    let alt = ctx.client.config().identity.alt_nickname.clone();
    let nick = ctx.client.state_mut().next_alt_nickname(&alt);
    warn!(nick = %nick, "Nickname in use, trying another");
    ctx.client.nick(Some(&nick)).await
}
