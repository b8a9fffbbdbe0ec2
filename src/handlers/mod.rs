//! Inbound event routing.
//!
//! Each decoded line is classified once:
//!
//! - `PING` and `ERROR` are answered before anything else, origin or not
//! - a user origin resolves to an [`Identity`] and goes to the verb handlers
//! - any other origin (the server itself) goes to the numeric handlers
//!
//! Handlers never end the session on their own; only `ERROR` produces a
//! [`Flow::Exit`]. Anything they return as an error is line-local.

mod channel;
mod messaging;
mod numeric;
mod user;

use snek_proto::Message;
use tracing::{debug, error, warn};

use crate::commands::CommandModule;
use crate::db::{Database, LogKind};
use crate::error::HandlerError;
use crate::network::Client;
use crate::network::lifecycle::{ErrorAction, LoopExit, classify_server_error};
use crate::state::Identity;

/// Everything routing one line may touch.
pub struct Context<'a> {
    pub client: &'a mut Client,
    pub db: &'a Database,
    pub commands: &'a mut CommandModule,
}

/// What the read loop should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit(LoopExit),
}

/// Route one inbound line.
pub async fn route(ctx: &mut Context<'_>, line: &str) -> Result<Flow, HandlerError> {
    let msg: Message = line.parse()?;

    match msg.command.as_str() {
        "PING" => {
            ctx.client.pong(msg.arg(0).unwrap_or_default()).await?;
            return Ok(Flow::Continue);
        }
        "ERROR" => {
            let text = msg.args_from(0);
            let action = classify_server_error(&text);
            match action {
                ErrorAction::Reconnect => warn!(error = %text, "Server dropped us, will reconnect"),
                ErrorAction::Halt => error!(error = %text, "Server returned error, halting"),
            }
            return Ok(Flow::Exit(action.into()));
        }
        _ => {}
    }

    let Some(prefix) = msg.prefix.as_ref() else {
        debug!(command = %msg.command, "Ignoring line without origin");
        return Ok(Flow::Continue);
    };

    let server = ctx.client.config().server.host.clone();
    let mut sender = Identity::resolve(ctx.db, Some(prefix), &server).await?;
    if !sender.is_valid() {
        numeric::handle(ctx, &msg).await?;
        return Ok(Flow::Continue);
    }

    match msg.command.as_str() {
        "PRIVMSG" => messaging::on_privmsg(ctx, &msg, &sender).await?,
        "NOTICE" => messaging::on_notice(ctx, &msg, &sender).await?,
        "NICK" => user::on_nick(ctx, &msg, &mut sender).await?,
        "QUIT" => user::on_quit(ctx, &msg, &sender).await?,
        "JOIN" => channel::on_join(ctx, &msg, &sender).await?,
        "PART" => channel::on_part(ctx, &msg, &sender).await?,
        "KICK" => channel::on_kick(ctx, &msg, &sender).await?,
        "TOPIC" => channel::on_topic(ctx, &msg, &sender).await?,
        "MODE" => debug!(nick = %sender.nickname(), params = ?msg.params, "Mode change"),
        other => debug!(command = %other, nick = %sender.nickname(), "Unrecognized command"),
    }

    Ok(Flow::Continue)
}

/// Append an activity log entry for `sender`.
async fn log_event(
    ctx: &Context<'_>,
    sender: &Identity,
    channel: &str,
    kind: LogKind,
    message: &str,
) -> Result<(), HandlerError> {
    let server = &ctx.client.config().server.host;
    ctx.db
        .activity()
        .append(
            sender.hostname(),
            sender.nickname(),
            channel,
            server,
            chrono::Utc::now().timestamp(),
            kind,
            message,
        )
        .await?;
    Ok(())
}
