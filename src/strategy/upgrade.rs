// src/strategy/upgrade.rs
//! In-place upgrade of each project file.

use super::Strategy;
use crate::error::{Result, UpgradeError};
use crate::parse::parse_reader;
use crate::pipeline::Accumulator;
use crate::reconcile;
use crate::reporting::AnalysisTable;
use crate::types::SourceNode;
use std::ffi::OsString;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct UpgradeStrategy {
    target_framework: Option<String>,
}

impl UpgradeStrategy {
    #[must_use]
    pub fn new(target_framework: Option<String>) -> Self {
        Self { target_framework }
    }
}

impl Strategy for UpgradeStrategy {
    fn name(&self) -> &'static str {
        "upgrade"
    }

    fn inputs(&self, acc: &Accumulator) -> Result<Vec<PathBuf>> {
        if acc.project_files().is_empty() {
            return Err(UpgradeError::NoProjectFiles);
        }
        Ok(acc.project_files().to_vec())
    }

    fn build_command(&self, _acc: &Accumulator, input: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "upgrade".into(),
            input.as_os_str().to_os_string(),
            "--non-interactive".into(),
            "--operation".into(),
            "Inplace".into(),
        ];
        if let Some(fw) = &self.target_framework {
            args.push("--targetFramework".into());
            args.push(fw.into());
        }
        args
    }

    fn process_output(&self, acc: &mut Accumulator, tool: &str, input: &Path, capture: &Path) -> Result<()> {
        let file = File::open(capture).map_err(|e| UpgradeError::io(e, capture))?;
        let report = parse_reader(BufReader::new(file)).map_err(|e| UpgradeError::io(e, capture))?;

        if let Some(fatal) = &report.fatal {
            acc.record_file_error(input.to_path_buf(), format!("{tool}: {fatal}"));
            return Ok(());
        }

        let project_dir = input.parent().unwrap_or(acc.directory()).to_path_buf();
        for (file, message) in report.failures() {
            acc.record_file_error(project_dir.join(file), message.to_string());
        }
        if let Some(file) = &report.unterminated {
            debug!(file = %file, input = %input.display(), "tool output ended mid-report");
        }
        Ok(())
    }

    fn reconcile_node(
        &self,
        node: &SourceNode,
        acc: &Accumulator,
        _table: &mut AnalysisTable,
    ) -> Result<SourceNode> {
        let path = acc.resolved_path(node);
        if let Some(error) = acc.file_error(&path) {
            return Err(UpgradeError::FileFailed {
                path: node.path().to_path_buf(),
                message: error.to_string(),
            });
        }
        reconcile::pass_or_replace(node, acc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::{create_workspace, write_source};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn no_projects_is_fatal() {
        let acc = Accumulator::new(PathBuf::from("/r"));
        let err = UpgradeStrategy::default().inputs(&acc).unwrap_err();
        assert_eq!(err.to_string(), "No project files found in repository");
    }

    #[test]
    fn command_line() {
        let acc = Accumulator::new(PathBuf::from("/r"));
        let input = Path::new("/r/App/App.csproj");

        let args = UpgradeStrategy::new(Some("net9.0".into())).build_command(&acc, input);
        assert_eq!(
            args,
            [
                "upgrade",
                "/r/App/App.csproj",
                "--non-interactive",
                "--operation",
                "Inplace",
                "--targetFramework",
                "net9.0"
            ]
            .map(OsString::from)
        );

        let args = UpgradeStrategy::default().build_command(&acc, input);
        assert_eq!(args.len(), 5);
    }

    #[test]
    fn failures_resolve_against_project_dir() -> anyhow::Result<()> {
        let work = TempDir::new()?;
        let mut acc = Accumulator::new(create_workspace(work.path())?);
        let project = write_source(&mut acc, &SourceNode::new("App/App.csproj", "<Project/>"))?;
        let capture = work.path().join("capture.log");
        fs::write(
            &capture,
            "file. Program.cs...\n   could not parse\nFailed\nfile. App.csproj\nSucceeded\n",
        )?;

        UpgradeStrategy::default().process_output(&mut acc, "upgrade-assistant", &project, &capture)?;

        let program = acc.directory().join("App/Program.cs");
        assert_eq!(acc.file_error(&program), Some("could not parse"));
        assert_eq!(acc.file_error(&project), None);
        Ok(())
    }

    #[test]
    fn unknown_framework_in_output_fails_input() -> anyhow::Result<()> {
        let work = TempDir::new()?;
        let mut acc = Accumulator::new(create_workspace(work.path())?);
        let project = write_source(&mut acc, &SourceNode::new("App.csproj", "<Project/>"))?;
        let capture = work.path().join("capture.log");
        fs::write(&capture, "  Unknown target framework: foo-bar\n")?;

        UpgradeStrategy::default().process_output(&mut acc, "upgrade-assistant", &project, &capture)?;
        assert_eq!(
            acc.file_error(&project),
            Some("upgrade-assistant: Unknown target framework: foo-bar")
        );
        Ok(())
    }

    #[test]
    fn fatal_message_names_configured_tool() -> anyhow::Result<()> {
        let work = TempDir::new()?;
        let mut acc = Accumulator::new(create_workspace(work.path())?);
        let project = write_source(&mut acc, &SourceNode::new("App.csproj", "<Project/>"))?;
        let capture = work.path().join("capture.log");
        fs::write(&capture, "Unknown target framework: foo-bar\n")?;

        UpgradeStrategy::default().process_output(&mut acc, "ua-custom", &project, &capture)?;
        assert_eq!(
            acc.file_error(&project),
            Some("ua-custom: Unknown target framework: foo-bar")
        );
        Ok(())
    }

    #[test]
    fn recorded_error_aborts_reconcile() -> anyhow::Result<()> {
        let work = TempDir::new()?;
        let mut acc = Accumulator::new(create_workspace(work.path())?);
        let node = SourceNode::new("App.csproj", "<Project/>");
        let path = write_source(&mut acc, &node)?;
        acc.record_file_error(path, "broken".into());

        let err = UpgradeStrategy::default()
            .reconcile_node(&node, &acc, &mut AnalysisTable::new())
            .unwrap_err();
        assert!(matches!(err, UpgradeError::FileFailed { .. }));
        assert_eq!(err.to_string(), "broken");
        Ok(())
    }
}
