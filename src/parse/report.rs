// src/parse/report.rs
//! Decoder for the JSON report written by `analyze --serializer JSON`.

use crate::error::{Result, UpgradeError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Suffix the report file name carries instead of `.sln`.
pub const REPORT_SUFFIX: &str = "-analyze.json";

#[derive(Debug, Default, Clone, Deserialize)]
pub struct AnalysisReport {
    #[serde(default)]
    pub rules: BTreeMap<String, RuleInfo>,
    #[serde(default)]
    pub projects: Vec<ProjectReport>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct RuleInfo {
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectReport {
    #[serde(default)]
    pub rule_instances: Vec<RuleInstance>,
}

/// One finding of one rule at one location.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleInstance {
    #[serde(default)]
    pub project_path: String,
    pub rule_id: String,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Location {
    pub path: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Link {
    pub url: String,
}

impl RuleInstance {
    /// The first link, if it is a well-formed absolute URL.
    #[must_use]
    pub fn first_link(&self) -> Option<Url> {
        self.location
            .links
            .first()
            .and_then(|link| Url::parse(&link.url).ok())
    }
}

impl AnalysisReport {
    /// Every rule instance across all projects, in report order.
    pub fn instances(&self) -> impl Iterator<Item = &RuleInstance> {
        self.projects.iter().flat_map(|p| p.rule_instances.iter())
    }
}

/// Report file name for a solution: `All.sln` becomes `All-analyze.json`.
#[must_use]
pub fn report_file_name(solution: &Path) -> String {
    let name = solution
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.strip_suffix(".sln") {
        Some(stem) => format!("{stem}{REPORT_SUFFIX}"),
        None => format!("{name}{REPORT_SUFFIX}"),
    }
}

/// Location of the report for `solution` inside `directory`.
#[must_use]
pub fn report_path(directory: &Path, solution: &Path) -> PathBuf {
    directory.join(report_file_name(solution))
}

/// Reads and decodes a report file.
///
/// # Errors
/// Returns an I/O error if the file cannot be read, or `Report` if it is
/// not a valid report.
pub fn load_report(path: &Path) -> Result<AnalysisReport> {
    let bytes = fs::read(path).map_err(|e| UpgradeError::io(e, path))?;
    serde_json::from_slice(&bytes).map_err(|source| UpgradeError::Report {
        source,
        path: path.to_path_buf(),
    })
}
