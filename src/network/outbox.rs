//! Outgoing line queue.
//!
//! Every send goes through one bounded channel drained by a single writer
//! task, so lines can never interleave on the socket.

use snek_proto::Command;
use snek_proto::format::normalize_line;
use tokio::sync::mpsc;
use tracing::warn;

use crate::error::HandlerError;

/// Queue depth per connection.
pub const OUTBOX_CAPACITY: usize = 256;

/// Sending half of a connection's outgoing queue.
#[derive(Debug, Clone)]
pub struct Outbox {
    tx: mpsc::Sender<String>,
}

impl Outbox {
    /// A new queue and its receiving end.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// An outbox with nobody listening. Every send fails with
    /// [`HandlerError::OutboxClosed`].
    pub fn detached() -> Self {
        let (outbox, _) = Self::channel(1);
        outbox
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Queue a raw protocol line.
    ///
    /// Surrounding whitespace and terminators are stripped. A line carrying
    /// characters that cannot go on the wire is logged and dropped; the
    /// connection is unaffected.
    pub async fn send_raw(&self, line: &str) -> Result<(), HandlerError> {
        let line = match normalize_line(line) {
            Ok(line) if line.is_empty() => return Ok(()),
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, line = ?line, "Dropping unsendable line");
                return Ok(());
            }
        };

        self.tx
            .send(line.to_string())
            .await
            .map_err(|_| HandlerError::OutboxClosed)
    }

    pub async fn send(&self, command: Command) -> Result<(), HandlerError> {
        self.send_raw(&command.to_string()).await
    }
}
