// src/stage/mod.rs
//! Scratch Workspace Management
//!
//! Every step of every pass gets its own scratch directory mirroring the
//! in-memory tree. The external tool runs inside it; afterwards the
//! directory is compared against recorded baselines to find what changed.
//! Directories are never deleted here; the caller owns cleanup.

mod copy;
mod detect;
mod materialize;
mod workspace;

pub use copy::{chain_from, CopyStats};
pub use detect::detect_changes;
pub use materialize::write_source;
pub use workspace::create_workspace;

use crate::error::{Result, UpgradeError};
use std::fs;
use std::path::Path;
use std::time::SystemTime;

/// The scratch root within a step's working directory.
pub const REPO_DIR: &str = "repo";

/// Reads the modification time of `path`.
pub(crate) fn modified_time(path: &Path) -> Result<SystemTime> {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|e| UpgradeError::io(e, path))
}
