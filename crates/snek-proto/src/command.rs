//! Outbound commands.
//!
//! Every line the client sends is built from one of these variants, so the
//! wire format lives in one place.

use std::fmt;

/// A command the client sends to the server.
#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum Command {
    /// `NICK <name>`
    NICK(String),
    /// `USER <ident> <host> <token> :<realname>`
    USER {
        /// Username part of the mask.
        ident: String,
        /// Host the client says it connects from.
        host: String,
        /// Fixed third parameter, ignored by servers.
        token: String,
        /// Free-text real name.
        realname: String,
    },
    /// `JOIN <channel>`
    JOIN(String),
    /// `PART <channel>`
    PART(String),
    /// `PRIVMSG <target> :<text>`
    PRIVMSG(String, String),
    /// `PONG <token>`
    PONG(String),
    /// `MODE <channel> <+flag|-flag> <nick>`
    MODE {
        /// Channel the mode applies to.
        channel: String,
        /// `true` for `+`, `false` for `-`.
        add: bool,
        /// Mode letter.
        flag: char,
        /// Target nickname.
        nick: String,
    },
    /// `WHOIS <nick>`
    WHOIS(String),
    /// `QUIT :<message>`
    QUIT(String),
}

fn needs_trailing(param: &str) -> bool {
    param.is_empty() || param.contains(' ') || param.starts_with(':')
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::NICK(nick) => write!(f, "NICK {nick}"),
            Command::USER {
                ident,
                host,
                token,
                realname,
            } => write!(f, "USER {ident} {host} {token} :{realname}"),
            Command::JOIN(channel) => write!(f, "JOIN {channel}"),
            Command::PART(channel) => write!(f, "PART {channel}"),
            Command::PRIVMSG(target, text) => write!(f, "PRIVMSG {target} :{text}"),
            Command::PONG(token) if needs_trailing(token) => write!(f, "PONG :{token}"),
            Command::PONG(token) => write!(f, "PONG {token}"),
            Command::MODE {
                channel,
                add,
                flag,
                nick,
            } => {
                let sign = if *add { '+' } else { '-' };
                write!(f, "MODE {channel} {sign}{flag} {nick}")
            }
            Command::WHOIS(nick) => write!(f, "WHOIS {nick}"),
            Command::QUIT(message) => write!(f, "QUIT :{message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_handshake() {
        assert_eq!(Command::NICK("snek".into()).to_string(), "NICK snek");
        let user = Command::USER {
            ident: "snek".into(),
            host: "irc.example.net".into(),
            token: "snekbot".into(),
            realname: "Snek Bot".into(),
        };
        assert_eq!(user.to_string(), "USER snek irc.example.net snekbot :Snek Bot");
    }

    #[test]
    fn serializes_messages() {
        assert_eq!(
            Command::PRIVMSG("#c".into(), "hi there".into()).to_string(),
            "PRIVMSG #c :hi there"
        );
        assert_eq!(Command::QUIT("brb!".into()).to_string(), "QUIT :brb!");
        assert_eq!(Command::WHOIS("op".into()).to_string(), "WHOIS op");
    }

    #[test]
    fn serializes_modes() {
        let op = Command::MODE {
            channel: "#c".into(),
            add: true,
            flag: 'o',
            nick: "admin".into(),
        };
        assert_eq!(op.to_string(), "MODE #c +o admin");
        let deop = Command::MODE {
            channel: "#c".into(),
            add: false,
            flag: 'o',
            nick: "admin".into(),
        };
        assert_eq!(deop.to_string(), "MODE #c -o admin");
    }

    #[test]
    fn pong_echoes_token() {
        assert_eq!(Command::PONG("abc123".into()).to_string(), "PONG abc123");
        assert_eq!(Command::PONG("two words".into()).to_string(), "PONG :two words");
    }
}
