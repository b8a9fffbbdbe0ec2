//! Telemetry utilities for command timing and span construction.

use std::time::Instant;

/// Guard for timing command execution.
///
/// Logs the elapsed time at debug level when dropped.
pub struct CommandTimer {
    command: String,
    start: Instant,
}

impl CommandTimer {
    /// Start timing a command.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            start: Instant::now(),
        }
    }
}

impl Drop for CommandTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        tracing::debug!(command = %self.command, elapsed_ms, "Command finished");
    }
}

/// Standardized span constructors.
pub mod spans {
    use tracing::{Span, info_span};

    /// Create a span for one connection attempt.
    pub fn connection(address: &str, attempt: u32) -> Span {
        info_span!("connection", address = %address, attempt)
    }

    /// Create a span for a command dispatch.
    pub fn command(name: &str, source: &str, target: Option<&str>) -> Span {
        if let Some(target) = target {
            info_span!("command", name = %name, source = %source, target = %target)
        } else {
            info_span!("command", name = %name, source = %source)
        }
    }
}
