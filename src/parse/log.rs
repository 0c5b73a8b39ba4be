// src/parse/log.rs
//! State machine over the tool's streamed console output.
//!
//! The tool announces each file with a line whose first token starts with
//! `file.` and whose second token is the file name (possibly suffixed with
//! `...`). Progress lines follow until one of `Succeeded`, `Skipped` or
//! `Failed` closes the block. The lines between the announcement and a
//! `Failed` become that file's error text.
//!
//! Keywords are only recognised at column 0. The framework sentinel is the
//! exception: it aborts the input even when indented.

use serde::Serialize;
use std::io::{self, BufRead};

/// Line prefix that aborts the whole input.
pub const UNKNOWN_FRAMEWORK: &str = "Unknown target framework";

const FILE_TOKEN_PREFIX: &str = "file.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "snake_case")]
pub enum FileStatus {
    Succeeded,
    Skipped,
    Failed(String),
}

/// Terminal outcome for one announced file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    /// File name as printed by the tool, `...` removed.
    pub file: String,
    pub status: FileStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ParserState {
    Idle,
    Reporting(String),
}

/// Whether the caller should keep feeding lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Halt,
}

/// Everything the parser learned from one capture.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LogReport {
    pub outcomes: Vec<FileOutcome>,
    /// File still being reported when input ended. Its outcome is unknown.
    pub unterminated: Option<String>,
    /// Input-level fatal line, if one was seen.
    pub fatal: Option<String>,
}

impl LogReport {
    /// Failed files with their collected error text, in report order.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes.iter().filter_map(|o| match &o.status {
            FileStatus::Failed(msg) => Some((o.file.as_str(), msg.as_str())),
            _ => None,
        })
    }

    #[must_use]
    pub fn is_fatal(&self) -> bool {
        self.fatal.is_some()
    }
}

#[derive(Debug)]
pub struct LogParser {
    state: ParserState,
    pending: Vec<String>,
    outcomes: Vec<FileOutcome>,
    fatal: Option<String>,
}

impl Default for LogParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LogParser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: ParserState::Idle,
            pending: Vec::new(),
            outcomes: Vec::new(),
            fatal: None,
        }
    }

    /// Consumes one line (without its terminator).
    pub fn feed(&mut self, line: &str) -> Flow {
        if self.fatal.is_some() {
            return Flow::Halt;
        }

        let trimmed = line.trim_start();
        if trimmed.starts_with(UNKNOWN_FRAMEWORK) {
            self.fatal = Some(trimmed.trim_end().to_string());
            return Flow::Halt;
        }

        // Keywords only count at column 0; an indented line yields an empty
        // first token and is plain log text.
        let first = line.split(char::is_whitespace).next().unwrap_or_default();

        if first.starts_with(FILE_TOKEN_PREFIX) {
            self.pending.clear();
            self.state = match line.split_whitespace().nth(1) {
                Some(name) => ParserState::Reporting(name.replace("...", "")),
                None => ParserState::Idle,
            };
            return Flow::Continue;
        }

        let status = match first {
            "Succeeded" => Some(FileStatus::Succeeded),
            "Skipped" => Some(FileStatus::Skipped),
            "Failed" => Some(FileStatus::Failed(self.pending.join("\n"))),
            _ => None,
        };

        match (status, &self.state) {
            (Some(status), ParserState::Reporting(file)) => {
                self.outcomes.push(FileOutcome {
                    file: file.clone(),
                    status,
                });
                self.pending.clear();
                self.state = ParserState::Idle;
            }
            (None, ParserState::Reporting(_)) => self.buffer(trimmed),
            (_, ParserState::Idle) => {}
        }
        Flow::Continue
    }

    fn buffer(&mut self, line: &str) {
        if matches!(self.state, ParserState::Reporting(_)) {
            self.pending.push(line.to_string());
        }
    }

    #[must_use]
    pub fn finish(self) -> LogReport {
        let unterminated = match self.state {
            ParserState::Reporting(file) if self.fatal.is_none() => Some(file),
            _ => None,
        };
        LogReport {
            outcomes: self.outcomes,
            unterminated,
            fatal: self.fatal,
        }
    }
}

/// Parses a complete capture held in memory.
#[must_use]
pub fn parse_log(text: &str) -> LogReport {
    let mut parser = LogParser::new();
    for line in text.lines() {
        if parser.feed(line) == Flow::Halt {
            break;
        }
    }
    parser.finish()
}

/// Parses a capture line by line. Invalid UTF-8 is replaced, not rejected.
///
/// # Errors
/// Returns error if reading fails.
pub fn parse_reader<R: BufRead>(mut reader: R) -> io::Result<LogReport> {
    let mut parser = LogParser::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);
        if parser.feed(line) == Flow::Halt {
            break;
        }
    }
    Ok(parser.finish())
}
