//! Modification-time sweep over every baselined path.

use crate::error::{Result, UpgradeError};
use crate::pipeline::Accumulator;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Flags every baselined path that disappeared or whose modification time
/// is strictly later than its baseline. Sweeps the whole workspace, not just
/// the files of the input just processed.
///
/// Returns the number of newly flagged paths.
///
/// # Errors
/// Returns error if a path exists but cannot be stat'ed.
pub fn detect_changes(acc: &mut Accumulator) -> Result<usize> {
    let mut changed: Vec<PathBuf> = Vec::new();

    for (path, baseline) in acc.baselines() {
        let is_changed = match fs::metadata(path) {
            Ok(meta) => {
                let current = meta.modified().map_err(|e| UpgradeError::io(e, path))?;
                current > *baseline
            }
            Err(e) if e.kind() == ErrorKind::NotFound => true,
            Err(e) => return Err(UpgradeError::io(e, path)),
        };
        if is_changed {
            changed.push(path.clone());
        }
    }

    Ok(changed
        .into_iter()
        .filter(|path| acc.mark_modified(path.clone()))
        .count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::{create_workspace, write_source};
    use crate::types::SourceNode;
    use std::fs::File;
    use std::time::Duration;
    use tempfile::TempDir;

    fn bump_mtime(path: &std::path::Path) -> anyhow::Result<()> {
        let later = fs::metadata(path)?.modified()? + Duration::from_secs(5);
        File::options().write(true).open(path)?.set_modified(later)?;
        Ok(())
    }

    #[test]
    fn untouched_files_are_not_flagged() -> anyhow::Result<()> {
        let work = TempDir::new()?;
        let mut acc = Accumulator::new(create_workspace(work.path())?);
        write_source(&mut acc, &SourceNode::new("a.cs", "a"))?;

        assert_eq!(detect_changes(&mut acc)?, 0);
        assert!(acc.modified().is_empty());
        Ok(())
    }

    #[test]
    fn later_mtime_is_flagged() -> anyhow::Result<()> {
        let work = TempDir::new()?;
        let mut acc = Accumulator::new(create_workspace(work.path())?);
        let a = write_source(&mut acc, &SourceNode::new("a.cs", "a"))?;
        let b = write_source(&mut acc, &SourceNode::new("b.cs", "b"))?;

        bump_mtime(&a)?;

        assert_eq!(detect_changes(&mut acc)?, 1);
        assert!(acc.was_modified(&a));
        assert!(!acc.was_modified(&b));
        Ok(())
    }

    #[test]
    fn deleted_file_is_flagged() -> anyhow::Result<()> {
        let work = TempDir::new()?;
        let mut acc = Accumulator::new(create_workspace(work.path())?);
        let a = write_source(&mut acc, &SourceNode::new("dir/a.cs", "a"))?;

        fs::remove_file(&a)?;

        assert_eq!(detect_changes(&mut acc)?, 1);
        assert!(acc.was_modified(&a));
        Ok(())
    }

    #[test]
    fn sweep_is_idempotent() -> anyhow::Result<()> {
        let work = TempDir::new()?;
        let mut acc = Accumulator::new(create_workspace(work.path())?);
        let a = write_source(&mut acc, &SourceNode::new("a.cs", "a"))?;
        bump_mtime(&a)?;

        assert_eq!(detect_changes(&mut acc)?, 1);
        assert_eq!(detect_changes(&mut acc)?, 0);
        assert_eq!(acc.modified().len(), 1);
        Ok(())
    }
}
