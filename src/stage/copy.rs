// src/stage/copy.rs
//! Copy-forward of a previous step's scratch tree into the current one.

use super::modified_time;
use crate::error::{Result, UpgradeError};
use crate::pipeline::Accumulator;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use walkdir::WalkDir;

/// Statistics from a chaining copy.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CopyStats {
    pub files_copied: usize,
    pub dirs_created: usize,
    /// Files that disappeared between listing and copying.
    pub files_vanished: usize,
}

impl CopyStats {
    /// Returns a human-readable summary.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Copied {} files, {} dirs. {} vanished during copy.",
            self.files_copied, self.dirs_created, self.files_vanished
        )
    }
}

/// Copies every directory and file of `previous` into the accumulator's
/// scratch root, recording each copied file's post-copy modification time
/// as its new baseline.
///
/// A file that vanishes mid-walk is skipped and gets no baseline. Copied
/// project and solution files are added to the discovered inputs.
///
/// # Errors
/// Returns error on any other filesystem failure.
pub fn chain_from(previous: &Path, acc: &mut Accumulator) -> Result<CopyStats> {
    let mut stats = CopyStats::default();
    let directory = acc.directory().to_path_buf();

    let walker = WalkDir::new(previous)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) if is_not_found(&e) => {
                stats.files_vanished += 1;
                continue;
            }
            Err(e) => {
                let path = e.path().unwrap_or(previous).to_path_buf();
                return Err(UpgradeError::io(e.into(), path));
            }
        };

        let Ok(rel_path) = entry.path().strip_prefix(previous) else {
            continue;
        };
        let target = directory.join(rel_path);

        if entry.file_type().is_dir() {
            if !target.exists() {
                fs::create_dir(&target).map_err(|e| UpgradeError::io(e, &target))?;
                stats.dirs_created += 1;
            }
            continue;
        }

        match fs::copy(entry.path(), &target) {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound && !entry.path().exists() => {
                stats.files_vanished += 1;
                continue;
            }
            Err(e) => return Err(UpgradeError::io(e, entry.path())),
        }

        let baseline = modified_time(&target)?;
        acc.record_baseline(target.clone(), baseline);
        acc.record_input(&target);
        stats.files_copied += 1;
    }

    Ok(stats)
}

fn is_not_found(err: &walkdir::Error) -> bool {
    err.io_error()
        .is_some_and(|io| io.kind() == ErrorKind::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::create_workspace;
    use tempfile::TempDir;

    #[test]
    fn test_copy_basic() -> anyhow::Result<()> {
        let src = TempDir::new()?;
        let work = TempDir::new()?;

        fs::write(src.path().join("file.txt"), "hello")?;
        fs::create_dir(src.path().join("subdir"))?;
        fs::write(src.path().join("subdir/nested.txt"), "world")?;

        let mut acc = Accumulator::new(create_workspace(work.path())?);
        let stats = chain_from(src.path(), &mut acc)?;

        assert_eq!(stats.files_copied, 2);
        assert_eq!(stats.dirs_created, 1);
        let dest = acc.directory();
        assert_eq!(fs::read_to_string(dest.join("file.txt"))?, "hello");
        assert_eq!(fs::read_to_string(dest.join("subdir/nested.txt"))?, "world");
        Ok(())
    }

    #[test]
    fn test_baseline_is_post_copy_mtime() -> anyhow::Result<()> {
        let src = TempDir::new()?;
        let work = TempDir::new()?;
        fs::write(src.path().join("Proj.csproj"), "<Project/>")?;

        let mut acc = Accumulator::new(create_workspace(work.path())?);
        chain_from(src.path(), &mut acc)?;

        let copied = acc.directory().join("Proj.csproj");
        let on_disk = fs::metadata(&copied)?.modified()?;
        assert_eq!(acc.baseline(&copied), Some(on_disk));
        Ok(())
    }

    #[test]
    fn test_copied_inputs_are_discovered() -> anyhow::Result<()> {
        let src = TempDir::new()?;
        let work = TempDir::new()?;
        fs::create_dir(src.path().join("src"))?;
        fs::write(src.path().join("src/Proj.csproj"), "<Project/>")?;
        fs::write(src.path().join("All.sln"), "")?;
        fs::write(src.path().join("src/Program.cs"), "")?;

        let mut acc = Accumulator::new(create_workspace(work.path())?);
        chain_from(src.path(), &mut acc)?;

        assert_eq!(acc.project_files(), &[acc.directory().join("src/Proj.csproj")]);
        assert_eq!(acc.solution_files(), &[acc.directory().join("All.sln")]);
        Ok(())
    }

    #[test]
    fn test_empty_previous_copies_nothing() -> anyhow::Result<()> {
        let src = TempDir::new()?;
        let work = TempDir::new()?;
        let mut acc = Accumulator::new(create_workspace(work.path())?);
        let stats = chain_from(src.path(), &mut acc)?;
        assert_eq!(stats, CopyStats::default());
        assert!(acc.baselines().is_empty());
        Ok(())
    }
}
