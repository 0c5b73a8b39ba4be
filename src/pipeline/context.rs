//! Facts shared between steps and passes of one run.

use std::path::{Path, PathBuf};

/// Explicit run-wide state: which step materializes the tree and which
/// scratch directory the next step chains from.
#[derive(Debug, Clone)]
pub struct RunContext {
    work_root: PathBuf,
    first_step: Option<usize>,
    previous_dir: Option<PathBuf>,
}

impl RunContext {
    #[must_use]
    pub fn new(work_root: &Path) -> Self {
        Self {
            work_root: work_root.to_path_buf(),
            first_step: None,
            previous_dir: None,
        }
    }

    /// Working directory of one step within one pass. The scratch root and
    /// capture files of that step live under it.
    #[must_use]
    pub fn step_dir(&self, pass: u32, position: usize) -> PathBuf {
        self.work_root
            .join(format!("pass-{pass}"))
            .join(format!("step-{position}"))
    }

    /// Claims the first-step slot for `position` if no step has yet.
    pub fn register_step(&mut self, position: usize) {
        if self.first_step.is_none() {
            self.first_step = Some(position);
        }
    }

    /// Whether `position` is the step that materializes the tree.
    #[must_use]
    pub fn is_first_step(&self, position: usize) -> bool {
        self.first_step == Some(position)
    }

    #[must_use]
    pub fn previous_dir(&self) -> Option<&Path> {
        self.previous_dir.as_deref()
    }

    pub fn set_previous_dir(&mut self, dir: &Path) {
        self.previous_dir = Some(dir.to_path_buf());
    }
}
