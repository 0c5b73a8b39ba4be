//! Writes in-memory nodes into the scratch root.

use super::modified_time;
use crate::error::{Result, UpgradeError};
use crate::pipeline::Accumulator;
use crate::types::SourceNode;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Serializes `node` into the scratch root, records its baseline and
/// classifies it as a tool input.
///
/// # Errors
/// Returns `InvalidPath` for paths that would escape the scratch root, or
/// an I/O error if writing fails.
pub fn write_source(acc: &mut Accumulator, node: &SourceNode) -> Result<PathBuf> {
    ensure_contained(node.path())?;
    let path = acc.resolved_path(node);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| UpgradeError::io(e, parent))?;
    }
    fs::write(&path, node.to_bytes()).map_err(|e| UpgradeError::io(e, &path))?;

    let baseline = modified_time(&path)?;
    acc.record_baseline(path.clone(), baseline);
    acc.record_input(&path);
    Ok(path)
}

fn ensure_contained(rel: &Path) -> Result<()> {
    let escapes = rel.as_os_str().is_empty()
        || rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(UpgradeError::InvalidPath {
            path: rel.to_path_buf(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::create_workspace;
    use crate::types::Charset;
    use tempfile::TempDir;

    #[test]
    fn writes_nested_file_and_records_baseline() -> anyhow::Result<()> {
        let work = TempDir::new()?;
        let mut acc = Accumulator::new(create_workspace(work.path())?);
        let node = SourceNode::new("src/Proj.csproj", "<Project/>");

        let written = write_source(&mut acc, &node)?;

        assert_eq!(fs::read_to_string(&written)?, "<Project/>");
        assert_eq!(acc.baseline(&written), Some(fs::metadata(&written)?.modified()?));
        assert_eq!(acc.project_files(), &[written]);
        Ok(())
    }

    #[test]
    fn encodes_with_declared_charset() -> anyhow::Result<()> {
        let work = TempDir::new()?;
        let mut acc = Accumulator::new(create_workspace(work.path())?);
        let node = SourceNode::new("a.txt", "hi").with_charset(Charset::Utf16Le, true);

        let written = write_source(&mut acc, &node)?;

        assert_eq!(fs::read(&written)?, vec![0xFF, 0xFE, b'h', 0, b'i', 0]);
        assert!(acc.project_files().is_empty());
        assert!(acc.solution_files().is_empty());
        Ok(())
    }

    #[test]
    fn rejects_escaping_paths() -> anyhow::Result<()> {
        let work = TempDir::new()?;
        let mut acc = Accumulator::new(create_workspace(work.path())?);

        for bad in ["../outside.cs", "/etc/passwd", ""] {
            let err = write_source(&mut acc, &SourceNode::new(bad, "x")).unwrap_err();
            assert!(matches!(err, UpgradeError::InvalidPath { .. }), "{bad}");
        }
        assert!(acc.baselines().is_empty());
        Ok(())
    }

    #[test]
    fn inputs_follow_write_order() -> anyhow::Result<()> {
        let work = TempDir::new()?;
        let mut acc = Accumulator::new(create_workspace(work.path())?);
        let b = write_source(&mut acc, &SourceNode::new("b/B.csproj", ""))?;
        let a = write_source(&mut acc, &SourceNode::new("a/A.vbproj", ""))?;
        let sln = write_source(&mut acc, &SourceNode::new("All.sln", ""))?;

        assert_eq!(acc.project_files(), &[b, a]);
        assert_eq!(acc.solution_files(), &[sln]);
        Ok(())
    }
}
