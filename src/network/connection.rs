//! Socket ownership for one connection.
//!
//! ```text
//!  TcpStream ──split──┬── OwnedReadHalf ── BytesMut ── LineCodec ──▶ next_line()
//!                     └── OwnedWriteHalf ◀── FramedWrite ◀── writer task ◀── Outbox
//! ```
//!
//! Reads are driven by the session loop one line at a time; writes happen on
//! a dedicated task so a slow socket never delays reading.

use std::time::Duration;

use bytes::BytesMut;
use futures_util::SinkExt;
use snek_proto::{LineCodec, ProtocolError};
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::codec::{Decoder, FramedWrite};
use tracing::{debug, warn};

use super::outbox::{OUTBOX_CAPACITY, Outbox};
use crate::error::SessionError;

const READ_CHUNK: usize = 1024;

/// How long a closing connection may take to flush queued lines.
const FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

/// Result of waiting for the next inbound line.
#[derive(Debug)]
pub enum ReadEvent {
    /// One complete line, terminator stripped.
    Line(String),
    /// One line that could not be decoded. Already consumed; reading can go on.
    Malformed(ProtocolError),
    /// The peer closed the socket.
    Closed,
    /// The socket failed.
    Failed(std::io::Error),
}

/// An open connection to the server.
pub struct Connection {
    reader: OwnedReadHalf,
    codec: LineCodec,
    buffer: BytesMut,
    writer: JoinHandle<()>,
}

impl Connection {
    /// Open the socket and start the writer task.
    ///
    /// Returns the connection and the outbox feeding its writer.
    pub async fn open(address: &str) -> Result<(Self, Outbox), SessionError> {
        let stream = TcpStream::connect(address)
            .await
            .map_err(|source| SessionError::Connect {
                address: address.to_string(),
                source,
            })?;
        stream.set_nodelay(true)?;

        let (reader, writer) = stream.into_split();
        let (outbox, rx) = Outbox::channel(OUTBOX_CAPACITY);
        let writer = tokio::spawn(write_loop(writer, rx));

        Ok((
            Self {
                reader,
                codec: LineCodec::new(),
                buffer: BytesMut::with_capacity(READ_CHUNK * 4),
                writer,
            },
            outbox,
        ))
    }

    /// Wait for the next line.
    ///
    /// Cancel safe: bytes already read stay buffered for the next call.
    pub async fn next_line(&mut self) -> ReadEvent {
        loop {
            match self.codec.decode(&mut self.buffer) {
                Ok(Some(line)) => return ReadEvent::Line(line),
                Ok(None) => {}
                Err(ProtocolError::Io(e)) => return ReadEvent::Failed(e),
                Err(e) => return ReadEvent::Malformed(e),
            }

            self.buffer.reserve(READ_CHUNK);
            match self.reader.read_buf(&mut self.buffer).await {
                Ok(0) => {
                    if !self.buffer.is_empty() {
                        debug!(bytes = self.buffer.len(), "Discarding partial line at EOF");
                    }
                    self.buffer.clear();
                    self.codec = LineCodec::new();
                    return ReadEvent::Closed;
                }
                Ok(_) => {}
                Err(e) => return ReadEvent::Failed(e),
            }
        }
    }

    /// Wait for the writer to flush what is queued.
    ///
    /// Every [`Outbox`] for this connection must be dropped first, or this
    /// waits out the flush timeout.
    pub async fn finish(self) {
        let mut writer = self.writer;
        if tokio::time::timeout(FLUSH_TIMEOUT, &mut writer).await.is_err() {
            warn!("Writer did not flush in time");
            writer.abort();
        }
    }
}

async fn write_loop(half: OwnedWriteHalf, mut rx: mpsc::Receiver<String>) {
    let mut sink = FramedWrite::new(half, LineCodec::new());

    while let Some(line) = rx.recv().await {
        debug!(line = %line, "-->");
        match sink.send(line).await {
            Ok(()) => {}
            Err(ProtocolError::Io(e)) => {
                warn!(error = %e, "Write failed, closing writer");
                break;
            }
            Err(e) => warn!(error = %e, "Dropping unsendable line"),
        }
    }

    let _ = sink.close().await;
}
