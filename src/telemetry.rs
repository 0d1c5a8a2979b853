//! Telemetry utilities for command timing and tracing spans.

use std::time::Instant;

/// Guard for timing command execution and recording metrics.
///
/// Records command latency when dropped, including on unwind.
pub struct CommandTimer {
    command: &'static str,
    start: Instant,
}

impl CommandTimer {
    /// Start timing a command.
    pub fn new(command: &'static str) -> Self {
        Self {
            command,
            start: Instant::now(),
        }
    }
}

impl Drop for CommandTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        crate::metrics::record_command(self.command, duration);
    }
}

/// Standardized span constructors.
pub mod spans {
    use tracing::{Span, info_span};
    use uuid::Uuid;

    /// Create a span for a command execution.
    pub fn command(name: &str, user: &str, room: Option<&str>, connection: Uuid, depth: usize) -> Span {
        if let Some(room) = room {
            info_span!("command", name = %name, user = %user, room = %room, conn = %connection, depth)
        } else {
            info_span!("command", name = %name, user = %user, conn = %connection, depth)
        }
    }

    /// Create a span for the console session.
    pub fn console(user: &str, room: &str) -> Span {
        info_span!("console", user = %user, room = %room)
    }
}
