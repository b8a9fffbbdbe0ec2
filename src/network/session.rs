//! Session lifecycle.
//!
//! One [`Session`] lives for the whole process. Each pass through
//! [`Session::run`]'s loop is one connection:
//!
//! ```text
//! connect ──▶ settle ──▶ NICK/USER ──▶ read loop ──┬─ Reconnect ─▶ wait ─▶ connect
//!                                                  ├─ Halt ──────▶ close stores, stop
//!                                                  └─ Shutdown ──▶ QUIT, close stores, stop
//! ```
//!
//! The command registry, last command and database outlive reconnects; the
//! socket and session state do not.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{Instrument, debug, error, info, warn};

use super::client::Client;
use super::connection::{Connection, ReadEvent};
use super::lifecycle::LoopExit;
use crate::commands::{CommandModule, HandlerSource};
use crate::config::Config;
use crate::db::Database;
use crate::error::SessionError;
use crate::handlers::{self, Context, Flow};
use crate::telemetry::spans;

/// The bot's connection to one server.
pub struct Session {
    config: Arc<Config>,
    db: Database,
    client: Client,
    commands: CommandModule,
    shutdown: broadcast::Receiver<()>,
}

impl Session {
    pub fn new(
        config: Arc<Config>,
        db: Database,
        source: Arc<dyn HandlerSource>,
        shutdown: broadcast::Receiver<()>,
    ) -> Self {
        let commands = CommandModule::new(source, &config.commands);
        Self {
            client: Client::new(config.clone()),
            config,
            db,
            commands,
            shutdown,
        }
    }

    /// Connect and keep going until halted or shut down.
    ///
    /// The database is closed on every way out.
    pub async fn run(&mut self) -> Result<(), SessionError> {
        let address = self.config.server.address();
        let mut attempt: u32 = 0;

        let result = loop {
            attempt += 1;
            let span = spans::connection(&address, attempt);
            let exit = match self.run_connection(&address).instrument(span).await {
                Ok(exit) => exit,
                Err(e) => {
                    error!(error = %e, "Connection failed");
                    break Err(e);
                }
            };

            match exit {
                LoopExit::Reconnect => {
                    let delay = self.config.server.reconnect_delay();
                    info!(delay_secs = delay.as_secs(), "Reconnecting");
                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {}
                        _ = self.shutdown.recv() => break Ok(()),
                    }
                }
                LoopExit::Halt | LoopExit::Shutdown => break Ok(()),
            }
        };

        self.db.close().await;
        info!("Disconnected from server. Bye!");
        result
    }

    /// One connection, from socket open to loop exit.
    async fn run_connection(&mut self, address: &str) -> Result<LoopExit, SessionError> {
        let (mut conn, outbox) = Connection::open(address).await?;
        info!("Connected");
        self.client.attach(outbox);

        tokio::time::sleep(self.config.server.settle_delay()).await;
        if let Err(e) = self.client.ident().await {
            warn!(error = %e, "Failed to send registration");
        }

        let exit = loop {
            let event = tokio::select! {
                event = conn.next_line() => event,
                _ = self.shutdown.recv() => {
                    info!("Shutdown requested");
                    break LoopExit::Shutdown;
                }
            };

            match event {
                ReadEvent::Line(line) => {
                    if let Some(exit) = self.process_line(&line).await {
                        break exit;
                    }
                }
                ReadEvent::Malformed(e) => warn!(error = %e, "Skipping undecodable line"),
                ReadEvent::Closed => {
                    error!("Server closed the connection, halting");
                    break LoopExit::Halt;
                }
                ReadEvent::Failed(e) => {
                    error!(error = %e, "Socket error, halting");
                    break LoopExit::Halt;
                }
            }
        };

        match exit {
            LoopExit::Shutdown => {
                let message = self.config.server.quit_message.clone();
                if let Err(e) = self.client.quit(&self.db, &message).await {
                    warn!(error = %e, "Failed to send QUIT");
                }
            }
            LoopExit::Halt => self.db.close().await,
            LoopExit::Reconnect => {}
        }
        self.client.detach();
        conn.finish().await;

        Ok(exit)
    }

    /// Route one line. Failures stay with the line.
    async fn process_line(&mut self, line: &str) -> Option<LoopExit> {
        debug!(line = %line, "<--");
        let mut ctx = Context {
            client: &mut self.client,
            db: &self.db,
            commands: &mut self.commands,
        };

        match handlers::route(&mut ctx, line).await {
            Ok(Flow::Continue) => None,
            Ok(Flow::Exit(exit)) => Some(exit),
            Err(e) => {
                warn!(error = %e, code = e.error_code(), line = %line, "Failed to process line");
                None
            }
        }
    }
}
