// src/reporting/json.rs
//! Machine-readable run summary.

use crate::pipeline::RunOutcome;
use crate::reporting::AnalysisRow;
use crate::types::ToolRun;
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AnnotationEntry<'a> {
    pub path: String,
    pub message: &'a str,
}

#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub passes: u32,
    pub changed: Vec<String>,
    pub annotations: Vec<AnnotationEntry<'a>>,
    pub findings: &'a [AnalysisRow],
    pub runs: &'a [ToolRun],
}

impl<'a> JsonReport<'a> {
    #[must_use]
    pub fn from_outcome(outcome: &'a RunOutcome) -> Self {
        let annotations = outcome
            .nodes
            .iter()
            .filter(|n| outcome.annotated.contains(n.path()))
            .flat_map(|n| {
                n.annotations().iter().map(move |a| AnnotationEntry {
                    path: n.path().display().to_string(),
                    message: &a.message,
                })
            })
            .collect();
        Self {
            passes: outcome.passes,
            changed: outcome.changed.iter().map(|p| p.display().to_string()).collect(),
            annotations,
            findings: outcome.table.rows(),
            runs: &outcome.runs,
        }
    }
}

/// Renders the outcome as pretty JSON.
///
/// # Errors
/// Returns error if serialization fails.
pub fn render(outcome: &RunOutcome) -> Result<String> {
    Ok(serde_json::to_string_pretty(&JsonReport::from_outcome(outcome))?)
}
