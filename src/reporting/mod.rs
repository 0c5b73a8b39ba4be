// src/reporting/mod.rs
//! Result sink and run output.

pub mod console;
pub mod json;
mod table;

pub use table::{AnalysisRow, AnalysisTable};

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
}
