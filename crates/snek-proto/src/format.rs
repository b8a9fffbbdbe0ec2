//! Character rules for text that goes on the wire.

use crate::error::{ProtocolError, Result};

/// mIRC-style formatting codes that are allowed inside message text.
pub fn is_irc_format_code(ch: char) -> bool {
    matches!(
        ch,
        '\x02' | '\x03' | '\x04' | '\x0F' | '\x11' | '\x16' | '\x1D' | '\x1E' | '\x1F'
    )
}

/// Characters that must never appear inside an outgoing line.
///
/// CR, LF and NUL would split or truncate the line on the server side; the
/// remaining control characters are rejected unless they are formatting codes.
pub fn is_illegal_control_char(ch: char) -> bool {
    match ch {
        '\r' | '\n' | '\0' => true,
        c => c.is_control() && !is_irc_format_code(c),
    }
}

/// Strip surrounding whitespace and line terminators from an outgoing line
/// and check what is left.
///
/// The returned slice carries no terminator; the encoder appends CRLF.
pub fn normalize_line(line: &str) -> Result<&str> {
    let trimmed = line.trim();
    if let Some(bad) = trimmed.chars().find(|c| is_illegal_control_char(*c)) {
        return Err(ProtocolError::IllegalControlChar(bad));
    }
    Ok(trimmed)
}
