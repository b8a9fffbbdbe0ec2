//! Inbound message parsing.
//!
//! Format:
//! ```text
//! [@tags] [:prefix] <command> [params...] [:trailing]
//! ```
//! Tags are skipped; the client never negotiates capabilities that would
//! make a server send them.

use std::fmt;
use std::str::FromStr;

use nom::{
    bytes::complete::{take_until, take_while1},
    character::complete::{char, space0},
    combinator::opt,
    error::ErrorKind,
    sequence::preceded,
    IResult,
};
use smallvec::SmallVec;

use crate::error::{MessageParseError, ProtocolError};
use crate::prefix::Prefix;
use crate::response::Response;

fn parse_tags(input: &str) -> IResult<&str, &str> {
    preceded(char('@'), take_until(" "))(input)
}

fn parse_prefix(input: &str) -> IResult<&str, &str> {
    preceded(char(':'), take_while1(|c| c != ' '))(input)
}

/// Parse the command name (1*letter or 3digit).
fn parse_command(input: &str) -> IResult<&str, &str> {
    let (rest, cmd) = take_while1(|c: char| c.is_ascii_alphanumeric())(input)?;

    let is_all_letters = cmd.chars().all(|c| c.is_ascii_alphabetic());
    let is_three_digits = cmd.len() == 3 && cmd.chars().all(|c| c.is_ascii_digit());
    let ends_cleanly = rest.is_empty() || rest.starts_with(' ');

    if (is_all_letters || is_three_digits) && ends_cleanly {
        Ok((rest, cmd))
    } else {
        Err(nom::Err::Error(nom::error::Error::new(
            input,
            ErrorKind::AlphaNumeric,
        )))
    }
}

/// Parse parameters after the command, including the trailing one.
///
/// Runs of spaces count as one separator.
fn parse_params(input: &str) -> SmallVec<[&str; 15]> {
    let mut params: SmallVec<[&str; 15]> = SmallVec::new();
    let mut rest = input;

    while rest.starts_with(' ') {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            break;
        }

        if let Some(trailing) = rest.strip_prefix(':') {
            params.push(trailing);
            break;
        }

        let end = rest.find(' ').unwrap_or(rest.len());
        params.push(&rest[..end]);
        rest = &rest[end..];
    }

    params
}

fn parse_message(input: &str) -> IResult<&str, (Option<&str>, &str, SmallVec<[&str; 15]>)> {
    let (input, _) = opt(parse_tags)(input)?;
    let (input, _) = space0(input)?;
    let (input, prefix) = opt(parse_prefix)(input)?;
    let (input, _) = space0(input)?;
    let (input, command) = parse_command(input)?;
    let params = parse_params(input);
    Ok(("", (prefix, command, params)))
}

/// A parsed protocol line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// Origin of the message, if the line carried one.
    pub prefix: Option<Prefix>,
    /// Verb or 3-digit numeric, uppercased.
    pub command: String,
    /// Parameters, trailing parameter last.
    pub params: Vec<String>,
}

impl Message {
    /// Parameter at `index`.
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }

    /// Last parameter, which is where free text lives.
    pub fn trailing(&self) -> Option<&str> {
        self.params.last().map(String::as_str)
    }

    /// Parameters from `index` on, joined by single spaces.
    pub fn args_from(&self, index: usize) -> String {
        self.params.get(index..).map(|p| p.join(" ")).unwrap_or_default()
    }

    /// Numeric code, if the command is a 3-digit reply.
    pub fn code(&self) -> Option<u16> {
        if self.command.len() == 3 {
            self.command.parse().ok()
        } else {
            None
        }
    }

    /// Known numeric reply, if the command is one this crate names.
    pub fn response(&self) -> Option<Response> {
        self.code().and_then(Response::from_code)
    }

    /// Nickname of the sender, when it is a user.
    pub fn source_nick(&self) -> Option<&str> {
        self.prefix.as_ref().and_then(Prefix::nick)
    }
}

impl FromStr for Message {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Message, Self::Err> {
        let line = s.trim_end_matches(['\r', '\n']).trim();
        let invalid = |cause| ProtocolError::InvalidMessage {
            string: s.to_owned(),
            cause,
        };

        if line.is_empty() {
            return Err(invalid(MessageParseError::EmptyMessage));
        }

        let (prefix, command, params) = match parse_message(line) {
            Ok((_, parsed)) => parsed,
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
                let position = line.len() - e.input.len();
                let cause = if e.input.is_empty() {
                    MessageParseError::MissingCommand
                } else {
                    MessageParseError::InvalidCommand { position }
                };
                return Err(invalid(cause));
            }
            Err(nom::Err::Incomplete(_)) => return Err(invalid(MessageParseError::MissingCommand)),
        };

        Ok(Message {
            prefix: prefix.map(Prefix::new_from_str),
            command: command.to_ascii_uppercase(),
            params: params.iter().map(|p| (*p).to_owned()).collect(),
        })
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = &self.prefix {
            write!(f, ":{prefix} ")?;
        }
        f.write_str(&self.command)?;
        if let Some((last, init)) = self.params.split_last() {
            for p in init {
                write!(f, " {p}")?;
            }
            if last.is_empty() || last.contains(' ') || last.starts_with(':') {
                write!(f, " :{last}")?;
            } else {
                write!(f, " {last}")?;
            }
        }
        Ok(())
    }
}
