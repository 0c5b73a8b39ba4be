// src/reporting/table.rs
//! The analysis result sink.

use crate::parse::{split_snippet, RuleInstance};
use serde::Serialize;

/// One finding, flattened for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRow {
    pub project_path: String,
    pub source_path: String,
    pub rule_id: String,
    pub rule_label: String,
    pub code_snippet: String,
    pub recommendation: Option<String>,
    pub link: Option<String>,
}

impl AnalysisRow {
    /// Builds a row from a report record. `label` falls back to the rule id.
    #[must_use]
    pub fn from_instance(instance: &RuleInstance, label: Option<&str>) -> Self {
        let parts = split_snippet(&instance.location.snippet);
        Self {
            project_path: instance.project_path.clone(),
            source_path: instance.location.path.clone(),
            rule_id: instance.rule_id.clone(),
            rule_label: label.unwrap_or(&instance.rule_id).to_string(),
            code_snippet: parts.code.to_string(),
            recommendation: parts.recommendation.map(str::to_string),
            link: instance.first_link().map(String::from),
        }
    }
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct AnalysisTable {
    rows: Vec<AnalysisRow>,
}

impl AnalysisTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_row(&mut self, row: AnalysisRow) {
        self.rows.push(row);
    }

    #[must_use]
    pub fn rows(&self) -> &[AnalysisRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::report::{Link, Location};

    fn instance(snippet: &str, links: Vec<Link>) -> RuleInstance {
        RuleInstance {
            project_path: "App/App.csproj".into(),
            rule_id: "UA102".into(),
            location: Location {
                path: "App/App.csproj".into(),
                snippet: snippet.into(),
                links,
            },
        }
    }

    #[test]
    fn row_splits_snippet_and_keeps_link() {
        let links = vec![Link {
            url: "https://aka.ms/ua".into(),
        }];
        let row = AnalysisRow::from_instance(
            &instance("Current: net6.0\nNew: net9.0", links),
            Some("Update TFM"),
        );
        assert_eq!(row.rule_label, "Update TFM");
        assert_eq!(row.code_snippet, "net6.0");
        assert_eq!(row.recommendation.as_deref(), Some("net9.0"));
        assert_eq!(row.link.as_deref(), Some("https://aka.ms/ua"));
    }

    #[test]
    fn label_falls_back_to_rule_id() {
        let row = AnalysisRow::from_instance(&instance("plain", Vec::new()), None);
        assert_eq!(row.rule_label, "UA102");
        assert_eq!(row.code_snippet, "plain");
        assert_eq!(row.recommendation, None);
        assert_eq!(row.link, None);
    }

    #[test]
    fn malformed_link_is_dropped() {
        let links = vec![Link { url: "::nope".into() }];
        let row = AnalysisRow::from_instance(&instance("x", links), None);
        assert_eq!(row.link, None);
    }

    #[test]
    fn table_keeps_insertion_order() {
        let mut table = AnalysisTable::new();
        assert!(table.is_empty());
        table.insert_row(AnalysisRow::from_instance(&instance("a", Vec::new()), None));
        table.insert_row(AnalysisRow::from_instance(&instance("b", Vec::new()), None));
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1].code_snippet, "b");
    }
}
