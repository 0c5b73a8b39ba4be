//! Scratch directory creation.

use super::REPO_DIR;
use crate::error::{Result, UpgradeError};
use std::fs;
use std::path::{Path, PathBuf};

/// Creates `<step_dir>/repo` and returns its canonical path.
///
/// The directory must not already exist: each step of each pass owns a
/// fresh one so that no run clobbers another's files.
///
/// # Errors
/// Returns `WorkspaceInit` if the directory cannot be created.
pub fn create_workspace(step_dir: &Path) -> Result<PathBuf> {
    let repo = step_dir.join(REPO_DIR);
    let init_err = |source| UpgradeError::WorkspaceInit {
        source,
        path: repo.clone(),
    };

    fs::create_dir_all(step_dir).map_err(init_err)?;
    fs::create_dir(&repo).map_err(init_err)?;
    repo.canonicalize().map_err(init_err)
}
