//! Outgoing helpers bound to the current connection.

use std::sync::Arc;

use snek_proto::Command;
use tracing::info;

use super::outbox::Outbox;
use crate::config::Config;
use crate::db::Database;
use crate::error::HandlerError;
use crate::state::{Identity, SessionState};

/// Fixed third parameter of `USER`.
const USER_TOKEN: &str = "snekbot";

/// Prefix that marks a user-facing failure.
pub const ERROR_MSG_PREFIX: &str = "GURU MEDITATION: ";

/// The bot's side of the conversation: what it has joined, what it is
/// called, and the queue its lines go out on.
#[derive(Debug)]
pub struct Client {
    config: Arc<Config>,
    outbox: Outbox,
    state: SessionState,
}

impl Client {
    /// A client with no connection yet. Sends fail until [`Client::attach`].
    pub fn new(config: Arc<Config>) -> Self {
        let state = SessionState::new(config.identity.nickname.clone());
        Self {
            config,
            outbox: Outbox::detached(),
            state,
        }
    }

    /// Start a fresh connection: new outbox, state back to defaults.
    pub fn attach(&mut self, outbox: Outbox) {
        self.outbox = outbox;
        self.state.reset(self.config.identity.nickname.clone());
        self.state.set_alive(true);
    }

    /// Let go of the outbox so the writer can drain and stop.
    pub fn detach(&mut self) {
        self.outbox = Outbox::detached();
        self.state.set_alive(false);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    pub fn nickname(&self) -> &str {
        self.state.nickname()
    }

    pub async fn send_raw(&self, line: &str) -> Result<(), HandlerError> {
        self.outbox.send_raw(line).await
    }

    pub async fn send(&self, command: Command) -> Result<(), HandlerError> {
        self.outbox.send(command).await
    }

    /// Registration handshake: `NICK` then `USER`.
    pub async fn ident(&mut self) -> Result<(), HandlerError> {
        let identity = &self.config.identity;
        self.send(Command::NICK(identity.nickname.clone())).await?;
        self.send(Command::USER {
            ident: identity.ident.clone(),
            host: self.config.server.host.clone(),
            token: USER_TOKEN.to_string(),
            realname: identity.realname.clone(),
        })
        .await?;
        self.state.set_nickname(identity.nickname.clone());
        Ok(())
    }

    /// Ask for a nickname; the configured one when `None`.
    pub async fn nick(&self, nickname: Option<&str>) -> Result<(), HandlerError> {
        let nickname = nickname.unwrap_or(&self.config.identity.nickname);
        self.send(Command::NICK(nickname.to_string())).await
    }

    /// Join a channel unless already there.
    pub async fn join(&mut self, channel: &str) -> Result<(), HandlerError> {
        if self.state.is_joined(channel) {
            return Ok(());
        }
        self.send(Command::JOIN(channel.to_string())).await?;
        self.state.add_channel(channel);
        info!(channel = %channel, "Joined channel");
        Ok(())
    }

    /// Leave one channel, or every joined channel when `None`.
    ///
    /// Leaving a channel we are not in sends nothing.
    pub async fn part(&mut self, channel: Option<&str>) -> Result<(), HandlerError> {
        let channels = match channel {
            Some(channel) if self.state.remove_channel(channel) => vec![channel.to_string()],
            Some(_) => return Ok(()),
            None => self.state.take_channels(),
        };

        for channel in channels {
            self.send(Command::PART(channel.clone())).await?;
            info!(channel = %channel, "Left channel");
        }
        Ok(())
    }

    pub async fn send_msg(&self, target: &str, text: &str) -> Result<(), HandlerError> {
        self.send(Command::PRIVMSG(target.to_string(), text.to_string()))
            .await
    }

    /// A message flagged as a failure report.
    pub async fn send_error_msg(&self, target: &str, text: &str) -> Result<(), HandlerError> {
        self.send_msg(target, &format!("{ERROR_MSG_PREFIX}{text}")).await
    }

    pub async fn whois(&self, nickname: &str) -> Result<(), HandlerError> {
        self.send(Command::WHOIS(nickname.to_string())).await
    }

    pub async fn pong(&self, token: &str) -> Result<(), HandlerError> {
        self.send(Command::PONG(token.to_string())).await
    }

    /// Grant a channel mode to a user.
    pub async fn add_mode(
        &self,
        channel: &str,
        user: &Identity,
        flag: char,
    ) -> Result<(), HandlerError> {
        self.set_mode(channel, user, true, flag).await
    }

    /// Revoke a channel mode from a user.
    pub async fn remove_mode(
        &self,
        channel: &str,
        user: &Identity,
        flag: char,
    ) -> Result<(), HandlerError> {
        self.set_mode(channel, user, false, flag).await
    }

    async fn set_mode(
        &self,
        channel: &str,
        user: &Identity,
        add: bool,
        flag: char,
    ) -> Result<(), HandlerError> {
        if !user.is_valid() {
            return Ok(());
        }
        self.send(Command::MODE {
            channel: channel.to_string(),
            add,
            flag,
            nick: user.nickname().to_string(),
        })
        .await
    }

    /// Say goodbye, close the stores, then mark the connection dead.
    pub async fn quit(&mut self, db: &Database, message: &str) -> Result<(), HandlerError> {
        let result = self.send(Command::QUIT(message.to_string())).await;
        db.close().await;
        self.state.set_alive(false);
        result
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::UserRecord;
    use tokio::sync::mpsc;

    pub(crate) fn test_config() -> Arc<Config> {
        Arc::new(
            Config::from_toml(
                r##"
                channels = ["#snek", "#python"]

                [server]
                host = "irc.example.net"

                [identity]
                nickname = "snekbot"
                alt_nickname = "snekbot_"
                ident = "snek"
                realname = "Snek Bot"

                [services]
                account = "snekbot"
                password = "hunter2"

                [database]
                path = ":memory:"
                "##,
            )
            .unwrap(),
        )
    }

    pub(crate) fn attached_client() -> (Client, mpsc::Receiver<String>) {
        let mut client = Client::new(test_config());
        let (outbox, rx) = Outbox::channel(64);
        client.attach(outbox);
        (client, rx)
    }

    pub(crate) fn drain(rx: &mut mpsc::Receiver<String>) -> Vec<String> {
        let mut lines = Vec::new();
        while let Ok(line) = rx.try_recv() {
            lines.push(line);
        }
        lines
    }

    #[tokio::test]
    async fn ident_sends_nick_then_user() {
        let (mut client, mut rx) = attached_client();
        client.state_mut().set_nickname("other");
        client.ident().await.unwrap();
        assert_eq!(
            drain(&mut rx),
            vec!["NICK snekbot", "USER snek irc.example.net snekbot :Snek Bot"]
        );
        assert_eq!(client.nickname(), "snekbot");
    }

    #[tokio::test]
    async fn join_is_idempotent() {
        let (mut client, mut rx) = attached_client();
        client.join("#snek").await.unwrap();
        client.join("#snek").await.unwrap();
        assert_eq!(drain(&mut rx), vec!["JOIN #snek"]);
        assert_eq!(client.state().channels(), ["#snek"]);
    }

    #[tokio::test]
    async fn part_unknown_channel_is_silent() {
        let (mut client, mut rx) = attached_client();
        client.part(Some("#nowhere")).await.unwrap();
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn part_all_leaves_everything() {
        let (mut client, mut rx) = attached_client();
        client.join("#a").await.unwrap();
        client.join("#b").await.unwrap();
        client.part(Some("#a")).await.unwrap();
        client.join("#c").await.unwrap();
        client.part(None).await.unwrap();
        assert_eq!(
            drain(&mut rx),
            vec!["JOIN #a", "JOIN #b", "PART #a", "JOIN #c", "PART #b", "PART #c"]
        );
        assert!(client.state().channels().is_empty());
    }

    #[tokio::test]
    async fn messages_and_modes() {
        let (mut client, mut rx) = attached_client();
        let admin = Identity::from_record(UserRecord {
            hostname: "a@h".into(),
            nickname: "boss".into(),
            server: None,
            level: 5,
            activity: None,
        });

        client.send_msg("#snek", "hello").await.unwrap();
        client.send_error_msg("#snek", "no such thing").await.unwrap();
        client.add_mode("#snek", &admin, 'o').await.unwrap();
        client.remove_mode("#snek", &admin, 'v').await.unwrap();
        client.add_mode("#snek", &Identity::unresolved(), 'o').await.unwrap();
        client.whois("someone").await.unwrap();
        client.pong("irc.example.net").await.unwrap();
        client.nick(None).await.unwrap();

        assert_eq!(
            drain(&mut rx),
            vec![
                "PRIVMSG #snek :hello",
                "PRIVMSG #snek :GURU MEDITATION: no such thing",
                "MODE #snek +o boss",
                "MODE #snek -v boss",
                "WHOIS someone",
                "PONG irc.example.net",
                "NICK snekbot",
            ]
        );
    }

    #[tokio::test]
    async fn quit_closes_stores_and_marks_dead() {
        let (mut client, mut rx) = attached_client();
        let db = Database::new(":memory:").await.unwrap();

        client.quit(&db, "brb!").await.unwrap();

        assert_eq!(drain(&mut rx), vec!["QUIT :brb!"]);
        assert!(db.is_closed());
        assert!(!client.state().is_alive());
    }

    #[tokio::test]
    async fn quit_closes_stores_even_when_send_fails() {
        let (mut client, _rx) = attached_client();
        client.detach();
        client.state_mut().set_alive(true);
        let db = Database::new(":memory:").await.unwrap();

        assert!(matches!(
            client.quit(&db, "brb!").await,
            Err(HandlerError::OutboxClosed)
        ));
        assert!(db.is_closed());
        assert!(!client.state().is_alive());
    }

    #[tokio::test]
    async fn detached_client_cannot_send() {
        let (mut client, _rx) = attached_client();
        client.detach();
        assert!(matches!(
            client.send_msg("#a", "x").await,
            Err(HandlerError::OutboxClosed)
        ));
    }
}
