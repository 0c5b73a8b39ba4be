// src/parse/mod.rs
//! Decoders for what the tool leaves behind: its console log and, for
//! analysis runs, a JSON report.

pub mod log;
pub mod report;
pub mod snippet;

pub use log::{parse_log, parse_reader, FileOutcome, FileStatus, Flow, LogParser, LogReport};
pub use report::{load_report, report_path, AnalysisReport, RuleInstance};
pub use snippet::{split_snippet, SnippetParts};
