//! # snek-proto
//!
//! Protocol pieces for the snekbot IRC client:
//!
//! - [`LineCodec`]: newline framing with partial-line buffering
//! - [`Message`]: parsed inbound lines (prefix, verb, params)
//! - [`Prefix`]: `nick!user@host` or server origin
//! - [`Response`]: the numeric replies the client acts on
//! - [`Command`]: outbound lines
//!
//! ```rust
//! use snek_proto::{Command, Message};
//!
//! let msg: Message = ":nick!user@host PRIVMSG #chan :hello".parse().unwrap();
//! assert_eq!(msg.source_nick(), Some("nick"));
//!
//! let reply = Command::PRIVMSG("#chan".into(), "hi nick".into());
//! assert_eq!(reply.to_string(), "PRIVMSG #chan :hi nick");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod command;
pub mod error;
pub mod format;
pub mod line;
pub mod message;
pub mod prefix;
pub mod response;

pub use self::command::Command;
pub use self::error::{MessageParseError, ProtocolError};
pub use self::line::{LineCodec, DEFAULT_MAX_LINE_LEN};
pub use self::message::Message;
pub use self::prefix::Prefix;
pub use self::response::Response;
