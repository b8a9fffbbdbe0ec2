//! Unified error handling for snekbot.
//!
//! Errors are split by how far they are allowed to travel: a
//! [`HandlerError`] never leaves the processing of one line, a
//! [`SessionError`] ends the session.

use snek_proto::ProtocolError;
use thiserror::Error;

use crate::db::DbError;

// ============================================================================
// Handler Errors (line and command processing)
// ============================================================================

/// Errors that can occur while routing one inbound line or running one
/// command unit. Logged and dropped by the read loop.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("not enough parameters for {0}")]
    NeedMoreParams(&'static str),

    #[error("storage error: {0}")]
    Storage(#[from] DbError),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("outgoing queue closed")]
    OutboxClosed,
}

impl HandlerError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NeedMoreParams(_) => "need_more_params",
            Self::Storage(_) => "storage_error",
            Self::Protocol(_) => "protocol_error",
            Self::OutboxClosed => "outbox_closed",
        }
    }
}

// ============================================================================
// Session Errors (connection lifecycle)
// ============================================================================

/// Errors that end a session for good.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to connect to {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("socket error: {0}")]
    Io(#[from] std::io::Error),
}
