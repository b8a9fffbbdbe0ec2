//! Numeric server replies the client acts on.

/// Numeric replies, named as in RFC 2812.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
#[repr(u16)]
pub enum Response {
    /// `001` - registration accepted.
    RPL_WELCOME = 1,
    /// `311` - `<me> <nick> <user> <host> * :<realname>`
    RPL_WHOISUSER = 311,
    /// `353` - `<me> <type> <channel> :<members...>`
    RPL_NAMREPLY = 353,
    /// `376` - end of the message of the day.
    RPL_ENDOFMOTD = 376,
    /// `422` - server has no message of the day.
    ERR_NOMOTD = 422,
    /// `433` - `<me> <nick> :Nickname is already in use`
    ERR_NICKNAMEINUSE = 433,
}

impl Response {
    /// Look up a numeric code.
    pub fn from_code(code: u16) -> Option<Self> {
        Some(match code {
            1 => Self::RPL_WELCOME,
            311 => Self::RPL_WHOISUSER,
            353 => Self::RPL_NAMREPLY,
            376 => Self::RPL_ENDOFMOTD,
            422 => Self::ERR_NOMOTD,
            433 => Self::ERR_NICKNAMEINUSE,
            _ => return None,
        })
    }

    /// The numeric code.
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Whether this reply closes the connect burst, after which the client
    /// may join channels.
    pub fn is_end_of_burst(self) -> bool {
        matches!(self, Self::RPL_ENDOFMOTD | Self::ERR_NOMOTD)
    }
}

/// Strip channel status markers (`@` op, `+` voice, and the other common
/// ones) from a NAMES entry.
pub fn strip_member_prefix(entry: &str) -> &str {
    entry.trim_start_matches(['~', '&', '@', '%', '+'])
}
