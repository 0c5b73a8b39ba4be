// src/process/driver.rs
//! Runs the tool once per input and turns each run into accumulator state.

use super::env::ToolEnv;
use super::locate::locate_tool;
use super::runner::{run_captured, Invocation};
use crate::config::Config;
use crate::error::{Result, UpgradeError};
use crate::events::{EventKind, EventLogger};
use crate::pipeline::Accumulator;
use crate::stage::detect_changes;
use crate::strategy::Strategy;
use crate::types::ToolRun;
use std::collections::BTreeMap;
use std::env;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Output lines that mean the invocation failed even when it exited 0.
pub const FATAL_SENTINELS: [&str; 2] = ["Project path does not exist", "Unknown target framework"];

/// How to find and run the tool.
#[derive(Debug, Clone)]
pub struct ToolSettings {
    pub name: String,
    pub home: PathBuf,
    pub timeout: Duration,
    pub extra_env: BTreeMap<String, String>,
}

impl ToolSettings {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            name: config.tool_name.clone(),
            home: config.tool_home.clone(),
            timeout: config.timeout,
            extra_env: config.env.clone(),
        }
    }
}

/// What one step's execution did.
#[derive(Debug, Default, Clone)]
pub struct DriveSummary {
    pub runs: Vec<ToolRun>,
    pub failed_inputs: Vec<PathBuf>,
    pub changed: usize,
}

#[derive(Debug, Clone)]
pub struct ProcessDriver {
    settings: ToolSettings,
    events: Option<EventLogger>,
}

impl ProcessDriver {
    #[must_use]
    pub fn new(settings: ToolSettings) -> Self {
        Self {
            settings,
            events: None,
        }
    }

    #[must_use]
    pub fn with_events(mut self, events: EventLogger) -> Self {
        self.events = Some(events);
        self
    }

    #[must_use]
    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    /// Invokes the tool on every input of `strategy`, strictly in order.
    ///
    /// Capture files are created in `step_dir` and removed after each
    /// invocation. A failed invocation is recorded against its input and
    /// does not stop the remaining ones.
    ///
    /// A strategy with no inputs returns an empty summary without looking
    /// for the tool.
    ///
    /// # Errors
    /// Returns error if the strategy rejects an empty input set, the tool
    /// cannot be found, or
    /// a filesystem operation outside the tool's control fails.
    pub fn drive(
        &self,
        strategy: &dyn Strategy,
        acc: &mut Accumulator,
        step_dir: &Path,
    ) -> Result<DriveSummary> {
        let inputs = strategy.inputs(acc)?;
        if inputs.is_empty() {
            debug!("{}: nothing to run on", strategy.name());
            return Ok(DriveSummary::default());
        }
        let path_var = env::var_os("PATH");
        let program = locate_tool(&self.settings.name, &self.settings.home, path_var.as_deref())?;
        let tool_env = ToolEnv::build(&self.settings.home, path_var.as_deref(), &self.settings.extra_env);
        info!(tool = %program.display(), inputs = inputs.len(), "running {}", strategy.name());
        debug!(path = ?tool_env.get("PATH"), "tool environment");

        let mut summary = DriveSummary::default();
        for input in inputs {
            strategy.before_invoke(acc, &input)?;
            let args = strategy.build_command(acc, &input);
            let capture = tempfile::Builder::new()
                .prefix(&self.settings.name)
                .suffix(".log")
                .tempfile_in(step_dir)
                .map_err(|e| UpgradeError::io(e, step_dir))?;

            let invocation = Invocation {
                program: &program,
                args: &args,
                cwd: acc.directory(),
                env: &tool_env,
                timeout: self.settings.timeout,
            };
            self.log(EventKind::ToolStarted {
                command: invocation.display(),
            });
            let run = run_captured(&invocation, capture.as_file())?;
            let verdict = self.judge(&run, &input, &capture);

            let changed = detect_changes(acc)?;
            summary.changed += changed;
            if changed > 0 {
                self.log(EventKind::ChangesDetected { count: changed });
            }

            match verdict {
                Ok(()) => {
                    self.log(EventKind::ToolFinished {
                        input: input.display().to_string(),
                        exit_code: run.exit_code(),
                        duration_ms: run.duration_ms(),
                    });
                    strategy.process_output(acc, &self.settings.name, &input, capture.path())?;
                }
                Err(e) => {
                    warn!(input = %input.display(), "{e}");
                    self.log(EventKind::ToolFailed {
                        input: input.display().to_string(),
                        error: e.to_string(),
                    });
                    acc.record_file_error(input.clone(), e.to_string());
                    summary.failed_inputs.push(input);
                }
            }
            summary.runs.push(run);
        }
        Ok(summary)
    }

    /// Decides whether a finished run succeeded: not timed out, no fatal
    /// sentinel in its output, and a zero exit code, checked in that order.
    fn judge(&self, run: &ToolRun, input: &Path, capture: &NamedTempFile) -> Result<()> {
        if run.timed_out() {
            return Err(UpgradeError::TimedOut {
                tool: self.settings.name.clone(),
                input: input.to_path_buf(),
                after: self.settings.timeout,
            });
        }
        if let Some(line) = find_sentinel(capture.path()) {
            return Err(UpgradeError::Invocation {
                input: input.to_path_buf(),
                message: format!("{}: {line}", self.settings.name),
            });
        }
        if run.exit_code() != 0 {
            let output = read_capture(capture.path());
            return Err(UpgradeError::Invocation {
                input: input.to_path_buf(),
                message: format!("Command failed: {}\n{output}", run.command()),
            });
        }
        debug!(input = %input.display(), ms = run.duration_ms(), "tool finished");
        Ok(())
    }

    fn log(&self, kind: EventKind) {
        if let Some(events) = &self.events {
            events.log(kind);
        }
    }
}

/// First output line starting with a fatal sentinel. An unreadable capture
/// has no sentinel.
fn find_sentinel(capture: &Path) -> Option<String> {
    let file = File::open(capture).ok()?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) | Err(_) => return None,
            Ok(_) => {}
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);
        if FATAL_SENTINELS.iter().any(|s| line.starts_with(s)) {
            return Some(line.to_string());
        }
    }
}

fn read_capture(capture: &Path) -> String {
    let mut bytes = Vec::new();
    let read = File::open(capture).and_then(|mut file| file.read_to_end(&mut bytes));
    if let Err(e) = read {
        warn!(capture = %capture.display(), "failed to read tool output: {e}");
    }
    String::from_utf8_lossy(&bytes).trim_end().to_string()
}
