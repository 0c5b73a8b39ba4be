//! Result of one external tool invocation.

use serde::Serialize;
use std::ffi::OsString;

/// Result of one external tool invocation. Output lives in the capture file.
#[derive(Debug, Clone, Serialize)]
pub struct ToolRun {
    /// The command that was executed (display form).
    command: String,
    /// Process exit code (-1 if unavailable, e.g., killed by signal).
    exit_code: i32,
    /// Whether the wall-clock ceiling was reached and the process killed.
    timed_out: bool,
    /// Execution time in milliseconds.
    duration_ms: u64,
}

impl ToolRun {
    #[must_use]
    pub fn new(command: String, exit_code: i32, timed_out: bool, duration_ms: u64) -> Self {
        Self {
            command,
            exit_code,
            timed_out,
            duration_ms,
        }
    }

    /// The command that was executed.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    #[must_use]
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }
}

/// Renders an argv for messages and logs.
#[must_use]
pub fn display_command(argv: &[OsString]) -> String {
    argv.iter()
        .map(|arg| arg.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}
