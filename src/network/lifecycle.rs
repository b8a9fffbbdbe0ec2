//! Connection lifecycle decisions.

/// What a server `ERROR` line means for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorAction {
    /// Wait, then connect again from scratch.
    Reconnect,
    /// Stop for good.
    Halt,
}

/// Why one connection's read loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// Recoverable server-side drop.
    Reconnect,
    /// Unrecoverable error, socket failure or end of stream.
    Halt,
    /// Local shutdown request.
    Shutdown,
}

impl From<ErrorAction> for LoopExit {
    fn from(action: ErrorAction) -> Self {
        match action {
            ErrorAction::Reconnect => Self::Reconnect,
            ErrorAction::Halt => Self::Halt,
        }
    }
}

/// Classify the text of a server `ERROR` line.
///
/// Ping timeouts (any capitalization) and forced link closures are worth a
/// reconnect. Anything else, such as a ban, is final.
pub fn classify_server_error(text: &str) -> ErrorAction {
    if text.to_ascii_lowercase().contains("ping timeout") || text.contains("Closing link") {
        ErrorAction::Reconnect
    } else {
        ErrorAction::Halt
    }
}
