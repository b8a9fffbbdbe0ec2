//! Command lookup and invocation.

use std::sync::Arc;

use tracing::{Instrument, debug, info};

use super::{CommandContext, CommandOutcome, CommandRegistry, HandlerResult, HandlerSource};
use crate::config::CommandsConfig;
use crate::db::Database;
use crate::network::Client;
use crate::state::Identity;
use crate::telemetry::{CommandTimer, spans};

/// Turns chat lines into command invocations.
///
/// Owns the registry and the last successful command line; both belong to
/// one bot and survive reconnects.
pub struct CommandModule {
    source: Arc<dyn HandlerSource>,
    registry: CommandRegistry,
    prefix: String,
    repeat_token: String,
    last_command: Option<String>,
}

impl CommandModule {
    pub fn new(source: Arc<dyn HandlerSource>, config: &CommandsConfig) -> Self {
        let registry = CommandRegistry::build(source.definitions());
        Self {
            source,
            registry,
            prefix: config.prefix.clone(),
            repeat_token: config.repeat_token.clone(),
            last_command: None,
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn last_command(&self) -> Option<&str> {
        self.last_command.as_deref()
    }

    /// Rebuild the registry from the handler source.
    pub fn reload(&mut self) {
        self.registry.rebuild(self.source.definitions());
        info!(commands = ?self.registry.names(), "Commands reloaded");
    }

    /// Command name of a chat line, if it starts with the prefix.
    fn command_name<'m>(&self, message: &'m str) -> Option<&'m str> {
        let rest = message.strip_prefix(self.prefix.as_str())?;
        let name = rest.split(' ').next().unwrap_or_default();
        (!name.is_empty()).then_some(name)
    }

    /// Dispatch one chat line.
    ///
    /// Lines without the prefix and unknown command names are ignored. The
    /// repeat token replays the last successful command line; that line is
    /// the one stored again if it succeeds, so the slot never holds the
    /// repeat token itself.
    pub async fn process(
        &mut self,
        client: &mut Client,
        db: &Database,
        message: &str,
        target: &str,
        sender: &Identity,
    ) -> HandlerResult {
        let Some(name) = self.command_name(message) else {
            return Ok(CommandOutcome::Declined);
        };

        let line = if name == self.repeat_token {
            match &self.last_command {
                Some(last) => {
                    debug!(command = %last, "Repeating last command");
                    last.clone()
                }
                None => return Ok(CommandOutcome::Declined),
            }
        } else {
            message.to_string()
        };

        let Some(name) = self.command_name(&line).map(str::to_string) else {
            return Ok(CommandOutcome::Declined);
        };
        let Some(handler) = self.registry.get(&name) else {
            return Ok(CommandOutcome::Declined);
        };

        let mut ctx = CommandContext::new(client, db, sender, target);
        let span = spans::command(&name, sender.nickname(), Some(target));
        let outcome = {
            let _timer = CommandTimer::new(&name);
            handler.handle(&mut ctx, &line).instrument(span).await?
        };
        let reload = ctx.reload_requested();

        if outcome == CommandOutcome::Handled {
            self.last_command = Some(line);
        }
        if reload {
            self.reload();
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{AdminOnly, CommandHandler, HandlerDefinition};
    use crate::db::UserRecord;
    use crate::network::client::tests::{attached_client, drain};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every line it is invoked with.
    #[derive(Clone, Default)]
    struct Recorder {
        calls: Arc<Mutex<Vec<String>>>,
        outcome: Option<CommandOutcome>,
    }

    #[async_trait]
    impl CommandHandler for Recorder {
        async fn handle(&self, ctx: &mut CommandContext<'_>, message: &str) -> HandlerResult {
            self.calls.lock().unwrap().push(message.to_string());
            ctx.client.send_msg(ctx.target, "ok").await?;
            Ok(self.outcome.unwrap_or(CommandOutcome::Handled))
        }
    }

    struct Fixed(Vec<(&'static str, Recorder)>);

    impl HandlerSource for Fixed {
        fn definitions(&self) -> Vec<HandlerDefinition> {
            self.0
                .iter()
                .map(|(name, rec)| HandlerDefinition::command(*name, rec.clone()))
                .collect()
        }
    }

    fn user(level: i64) -> Identity {
        Identity::from_record(UserRecord {
            hostname: "u@h".into(),
            nickname: "nick".into(),
            server: None,
            level,
            activity: None,
        })
    }

    fn module(handlers: Vec<(&'static str, Recorder)>) -> CommandModule {
        CommandModule::new(Arc::new(Fixed(handlers)), &CommandsConfig::default())
    }

    #[tokio::test]
    async fn dispatches_prefixed_known_commands_only() {
        let db = Database::new(":memory:").await.unwrap();
        let (mut client, mut rx) = attached_client();
        let rec = Recorder::default();
        let mut commands = module(vec![("hello", rec.clone())]);
        let sender = user(1);

        for line in ["hello there", "!nope", "!", "! hello", "!hello world"] {
            commands
                .process(&mut client, &db, line, "#snek", &sender)
                .await
                .unwrap();
        }

        assert_eq!(*rec.calls.lock().unwrap(), vec!["!hello world"]);
        assert_eq!(drain(&mut rx), vec!["PRIVMSG #snek :ok"]);
        assert_eq!(commands.last_command(), Some("!hello world"));
    }

    #[tokio::test]
    async fn repeat_before_any_success_is_noop() {
        let db = Database::new(":memory:").await.unwrap();
        let (mut client, mut rx) = attached_client();
        let rec = Recorder::default();
        let mut commands = module(vec![("hello", rec.clone())]);

        let outcome = commands
            .process(&mut client, &db, "!2", "#snek", &user(1))
            .await
            .unwrap();
        assert_eq!(outcome, CommandOutcome::Declined);
        assert!(rec.calls.lock().unwrap().is_empty());
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn repeat_replays_last_success() {
        let db = Database::new(":memory:").await.unwrap();
        let (mut client, _rx) = attached_client();
        let a = Recorder::default();
        let b = Recorder {
            outcome: Some(CommandOutcome::Declined),
            ..Recorder::default()
        };
        let mut commands = module(vec![("cmdA", a.clone()), ("cmdB", b.clone())]);
        let sender = user(1);

        commands
            .process(&mut client, &db, "!cmdA some args", "#snek", &sender)
            .await
            .unwrap();
        // A declined command does not replace the slot.
        commands
            .process(&mut client, &db, "!cmdB", "#snek", &sender)
            .await
            .unwrap();
        commands
            .process(&mut client, &db, "!2", "#snek", &sender)
            .await
            .unwrap();
        commands
            .process(&mut client, &db, "!2 ignored", "#snek", &sender)
            .await
            .unwrap();

        assert_eq!(
            *a.calls.lock().unwrap(),
            vec!["!cmdA some args", "!cmdA some args", "!cmdA some args"]
        );
        assert_eq!(*b.calls.lock().unwrap(), vec!["!cmdB"]);
        assert_eq!(commands.last_command(), Some("!cmdA some args"));
    }

    #[tokio::test]
    async fn admin_gate_declines_without_side_effects() {
        let db = Database::new(":memory:").await.unwrap();
        let (mut client, mut rx) = attached_client();
        let rec = Recorder::default();
        let gated = AdminOnly::new(rec.clone());
        let sender = user(1);

        let mut ctx = CommandContext::new(&mut client, &db, &sender, "#snek");
        let outcome = gated.handle(&mut ctx, "!secret").await.unwrap();
        assert_eq!(outcome, CommandOutcome::Declined);
        assert!(rec.calls.lock().unwrap().is_empty());

        let admin = user(5);
        let mut ctx = CommandContext::new(&mut client, &db, &admin, "#snek");
        let outcome = gated.handle(&mut ctx, "!secret").await.unwrap();
        assert_eq!(outcome, CommandOutcome::Handled);
        assert_eq!(drain(&mut rx), vec!["PRIVMSG #snek :ok"]);
    }
}
