// src/strategy/analyze.rs
//! Solution-level analysis into a result table. Never modifies the tree
//! and never aborts the run: failures become annotations.

use super::Strategy;
use crate::error::{Result, UpgradeError};
use crate::parse::report::{load_report, report_file_name, report_path};
use crate::pipeline::Accumulator;
use crate::reconcile;
use crate::reporting::{AnalysisRow, AnalysisTable};
use crate::types::SourceNode;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AnalyzeStrategy {
    target_framework: String,
}

impl AnalyzeStrategy {
    #[must_use]
    pub fn new(target_framework: impl Into<String>) -> Self {
        Self {
            target_framework: target_framework.into(),
        }
    }
}

impl Strategy for AnalyzeStrategy {
    fn name(&self) -> &'static str {
        "analyze"
    }

    fn inputs(&self, acc: &Accumulator) -> Result<Vec<PathBuf>> {
        if acc.solution_files().is_empty() {
            warn!(directory = %acc.directory().display(), "no solution files to analyze");
        }
        Ok(acc.solution_files().to_vec())
    }

    /// Removes a report left behind by an earlier run.
    fn before_invoke(&self, acc: &Accumulator, input: &Path) -> Result<()> {
        let stale = report_path(acc.directory(), input);
        match fs::remove_file(&stale) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(UpgradeError::io(e, stale)),
        }
    }

    fn build_command(&self, _acc: &Accumulator, input: &Path) -> Vec<OsString> {
        vec![
            "analyze".into(),
            input.as_os_str().to_os_string(),
            "--source".into(),
            "Solution".into(),
            "--non-interactive".into(),
            "--targetFramework".into(),
            OsString::from(&self.target_framework),
            "--serializer".into(),
            "JSON".into(),
            "--report".into(),
            report_file_name(input).into(),
        ]
    }

    fn process_output(&self, acc: &mut Accumulator, _tool: &str, input: &Path, _capture: &Path) -> Result<()> {
        let path = report_path(acc.directory(), input);
        let report = match load_report(&path) {
            Ok(report) => report,
            Err(e) => {
                warn!(input = %input.display(), "unusable analysis report: {e}");
                acc.record_file_error(input.to_path_buf(), e.to_string());
                return Ok(());
            }
        };

        for (rule_id, info) in &report.rules {
            if let Some(label) = &info.label {
                acc.add_rule(rule_id.clone(), label.clone());
            }
        }
        let directory = acc.directory().to_path_buf();
        for instance in report.instances() {
            acc.add_file_result(directory.join(&instance.location.path), instance.clone());
        }
        Ok(())
    }

    fn reconcile_node(
        &self,
        node: &SourceNode,
        acc: &Accumulator,
        table: &mut AnalysisTable,
    ) -> Result<SourceNode> {
        let path = acc.resolved_path(node);
        if let Some(error) = acc.file_error(&path) {
            return Ok(reconcile::annotate_failure(node, error));
        }

        for instance in acc.file_results(&path).unwrap_or_default() {
            table.insert_row(AnalysisRow::from_instance(
                instance,
                acc.rule_label(&instance.rule_id),
            ));
        }
        reconcile::pass_or_replace(node, acc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::{create_workspace, write_source};
    use tempfile::TempDir;

    const REPORT: &str = r#"{
        "rules": { "UA102": { "label": "Update TFM" } },
        "projects": [{
            "ruleInstances": [{
                "projectPath": "App/App.csproj",
                "ruleId": "UA102",
                "location": {
                    "path": "App/App.csproj",
                    "snippet": "Current: net6.0\nNew: net9.0",
                    "links": [{ "url": "https://aka.ms/ua" }]
                }
            }]
        }]
    }"#;

    #[test]
    fn no_solutions_means_no_inputs() -> anyhow::Result<()> {
        let acc = Accumulator::new(PathBuf::from("/r"));
        assert!(AnalyzeStrategy::new("net9.0").inputs(&acc)?.is_empty());
        Ok(())
    }

    #[test]
    fn command_line() {
        let acc = Accumulator::new(PathBuf::from("/r"));
        let args = AnalyzeStrategy::new("net9.0").build_command(&acc, Path::new("/r/All.sln"));
        assert_eq!(
            args,
            [
                "analyze",
                "/r/All.sln",
                "--source",
                "Solution",
                "--non-interactive",
                "--targetFramework",
                "net9.0",
                "--serializer",
                "JSON",
                "--report",
                "All-analyze.json"
            ]
            .map(OsString::from)
        );
    }

    #[test]
    fn stale_report_is_removed() -> anyhow::Result<()> {
        let work = TempDir::new()?;
        let acc = Accumulator::new(create_workspace(work.path())?);
        let sln = acc.directory().join("All.sln");
        let stale = acc.directory().join("All-analyze.json");
        fs::write(&stale, "{}")?;

        let strategy = AnalyzeStrategy::new("net9.0");
        strategy.before_invoke(&acc, &sln)?;
        assert!(!stale.exists());
        strategy.before_invoke(&acc, &sln)?;
        Ok(())
    }

    #[test]
    fn report_becomes_rows() -> anyhow::Result<()> {
        let work = TempDir::new()?;
        let mut acc = Accumulator::new(create_workspace(work.path())?);
        let sln = write_source(&mut acc, &SourceNode::new("All.sln", "sln"))?;
        let project = SourceNode::new("App/App.csproj", "<Project/>");
        write_source(&mut acc, &project)?;
        fs::write(acc.directory().join("All-analyze.json"), REPORT)?;

        let strategy = AnalyzeStrategy::new("net9.0");
        strategy.process_output(&mut acc, "upgrade-assistant", &sln, Path::new("unused"))?;

        let mut table = AnalysisTable::new();
        let after = strategy.reconcile_node(&project, &acc, &mut table)?;
        assert_eq!(after, project);
        assert_eq!(table.len(), 1);
        let row = &table.rows()[0];
        assert_eq!(row.rule_label, "Update TFM");
        assert_eq!(row.code_snippet, "net6.0");
        assert_eq!(row.recommendation.as_deref(), Some("net9.0"));
        Ok(())
    }

    #[test]
    fn missing_report_annotates_solution() -> anyhow::Result<()> {
        let work = TempDir::new()?;
        let mut acc = Accumulator::new(create_workspace(work.path())?);
        let node = SourceNode::new("All.sln", "Microsoft Visual Studio Solution File\nrest");
        let sln = write_source(&mut acc, &node)?;

        let strategy = AnalyzeStrategy::new("net9.0");
        strategy.process_output(&mut acc, "upgrade-assistant", &sln, Path::new("unused"))?;

        let mut table = AnalysisTable::new();
        let after = strategy.reconcile_node(&node, &acc, &mut table)?;
        assert_eq!(after.content(), "Microsoft Visual Studio Solution File");
        assert_eq!(after.annotations().len(), 1);
        assert!(table.is_empty());
        Ok(())
    }
}
