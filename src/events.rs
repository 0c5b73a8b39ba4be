// src/events.rs
//! Machine-readable event logging for audit trails.
//!
//! Events are appended to `<work_root>/events.jsonl`.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub const EVENTS_FILE: &str = "events.jsonl";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    PassStarted {
        pass: u32,
    },
    PassCompleted {
        pass: u32,
        changed: usize,
    },
    WorkspaceCreated {
        path: String,
    },
    WorkspaceChained {
        from: String,
        files_copied: usize,
    },
    SourcesMaterialized {
        count: usize,
    },
    ToolStarted {
        command: String,
    },
    ToolFinished {
        input: String,
        exit_code: i32,
        duration_ms: u64,
    },
    ToolFailed {
        input: String,
        error: String,
    },
    ChangesDetected {
        count: usize,
    },
    NodeReplaced {
        path: String,
    },
    NodeAnnotated {
        path: String,
        message: String,
    },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DriverEvent {
    pub timestamp: u64,
    pub kind: EventKind,
}

#[derive(Debug, Clone)]
pub struct EventLogger {
    log_path: PathBuf,
}

impl EventLogger {
    #[must_use]
    pub fn new(work_root: &Path) -> Self {
        let log_path = work_root.join(EVENTS_FILE);
        Self { log_path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.log_path
    }

    pub fn log(&self, kind: EventKind) {
        // Best-effort: a broken audit trail must not fail the run.
        if let Ok(json) = Self::serialize_event(kind) {
            let _ = self.append_to_file(&json);
        }
    }

    fn serialize_event(kind: EventKind) -> Result<String> {
        let timestamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
        let event = DriverEvent { timestamp, kind };
        Ok(serde_json::to_string(&event)?)
    }

    fn append_to_file(&self, line: &str) -> Result<()> {
        if let Some(parent) = self.log_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}

/// Reads back every event in a log file.
///
/// # Errors
/// Returns error if the file cannot be read or a line is not an event.
pub fn read_events(path: &Path) -> Result<Vec<DriverEvent>> {
    let text = fs::read_to_string(path)?;
    text.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| Ok(serde_json::from_str(l)?))
        .collect()
}
