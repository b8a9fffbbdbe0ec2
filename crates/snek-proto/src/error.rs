//! Error types for the protocol crate.
//!
//! Framing failures and message parse failures are both line-local: the
//! offending bytes have already been consumed from the buffer when one of
//! these is returned, so a reader may log the error and keep going.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Extract the verb from raw line bytes, for error reporting.
///
/// Works on bytes so it can still say something useful about a line that
/// failed UTF-8 decoding.
pub(crate) fn extract_command_hint(raw_line: &[u8]) -> Option<String> {
    let mut pos = 0;

    if raw_line.first() == Some(&b':') {
        while pos < raw_line.len() && raw_line[pos] != b' ' {
            pos += 1;
        }
        while pos < raw_line.len() && raw_line[pos] == b' ' {
            pos += 1;
        }
    }

    let start = pos;
    while pos < raw_line.len() && raw_line[pos].is_ascii_alphanumeric() {
        pos += 1;
    }

    if pos > start {
        String::from_utf8(raw_line[start..pos].to_vec()).ok()
    } else {
        None
    }
}

/// Top-level protocol errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A received line was not valid UTF-8.
    #[error("invalid utf-8 at byte {byte_pos} (command: {command_hint:?})")]
    InvalidUtf8 {
        /// The raw line, terminator stripped.
        raw_line: Vec<u8>,
        /// Offset of the first invalid byte.
        byte_pos: usize,
        /// Verb of the line, if it could be recovered.
        command_hint: Option<String>,
    },

    /// A line exceeded the configured maximum length.
    #[error("line too long: {actual} bytes (limit {limit})")]
    LineTooLong {
        /// Number of bytes seen.
        actual: usize,
        /// Configured limit.
        limit: usize,
    },

    /// Outgoing text contained a character that cannot be put on the wire.
    #[error("illegal control character {0:?}")]
    IllegalControlChar(char),

    /// A line could not be parsed as a message.
    #[error("invalid message {string:?}: {cause}")]
    InvalidMessage {
        /// The offending line.
        string: String,
        /// Why it was rejected.
        #[source]
        cause: MessageParseError,
    },
}

/// Reasons a line fails to parse as a message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MessageParseError {
    /// Nothing but whitespace.
    #[error("empty message")]
    EmptyMessage,

    /// A prefix with no verb after it.
    #[error("missing command")]
    MissingCommand,

    /// The verb is neither letters nor a 3-digit numeric.
    #[error("invalid command at position {position}")]
    InvalidCommand {
        /// Character offset where parsing stopped.
        position: usize,
    },
}
