//! Settle and timeout durations
//!
//! The module has no flow control: after each request the host waits a
//! fixed time for it to process the command, then reads once.

use std::time::Duration;

use sa_protocol::Command;

/// Pacing for request/reply transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Delay after sending a command before reading its reply
    pub settle: Duration,
    /// Delay after a command that commits to flash
    pub write_settle: Duration,
    /// Maximum time to wait for a full reply line
    pub read_timeout: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(500),
            write_settle: Duration::from_secs(3),
            read_timeout: Duration::from_secs(3),
        }
    }
}

impl Timing {
    /// No settle delays, for in-process transports
    pub fn immediate() -> Self {
        Self {
            settle: Duration::ZERO,
            write_settle: Duration::ZERO,
            read_timeout: Duration::from_millis(100),
        }
    }

    /// Same delays with a different read timeout
    pub fn with_read_timeout(self, read_timeout: Duration) -> Self {
        Self {
            read_timeout,
            ..self
        }
    }

    /// Settle delay to apply after sending `command`
    pub fn settle_for(&self, command: &Command) -> Duration {
        if command.writes_flash() {
            self.write_settle
        } else {
            self.settle
        }
    }
}
