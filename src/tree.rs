// src/tree.rs
//! Loading a project directory into nodes and writing results back.

use crate::error::{Result, UpgradeError};
use crate::types::{Charset, SourceNode};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Directories never loaded: VCS metadata, build output, package caches.
pub const PRUNE_DIRS: [&str; 6] = [".git", "bin", "obj", "node_modules", ".vs", "packages"];

#[derive(Debug, Clone)]
pub struct SourceTree {
    root: PathBuf,
    nodes: Vec<SourceNode>,
}

impl SourceTree {
    #[must_use]
    pub fn from_nodes(root: &Path, nodes: Vec<SourceNode>) -> Self {
        Self {
            root: root.to_path_buf(),
            nodes,
        }
    }

    /// Walks `root` and loads every text file as a node, in file-name order.
    ///
    /// # Errors
    /// Returns error if the walk or a read fails.
    pub fn load(root: &Path) -> Result<Self> {
        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !should_prune(&e.file_name().to_string_lossy()));

        let mut nodes = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                UpgradeError::io(e.into(), path)
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(root) else {
                continue;
            };
            let bytes = fs::read(entry.path()).map_err(|e| UpgradeError::io(e, entry.path()))?;
            match decode_text(rel, &bytes) {
                Some(node) => nodes.push(node),
                None => debug!(path = %rel.display(), "skipping binary file"),
            }
        }
        Ok(Self::from_nodes(root, nodes))
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn nodes(&self) -> &[SourceNode] {
        &self.nodes
    }

    /// Writes the nodes whose relative path is in `paths` under the root,
    /// re-encoded with their charset. Returns the number written.
    ///
    /// # Errors
    /// Returns error if a write fails.
    pub fn write_changed(&self, paths: &BTreeSet<PathBuf>) -> Result<usize> {
        let mut written = 0;
        for node in self.nodes.iter().filter(|n| paths.contains(n.path())) {
            let target = self.root.join(node.path());
            fs::write(&target, node.to_bytes()).map_err(|e| UpgradeError::io(e, &target))?;
            written += 1;
        }
        Ok(written)
    }
}

fn should_prune(name: &str) -> bool {
    PRUNE_DIRS.contains(&name)
}

/// A node for `bytes` if they are text: BOM-marked, or valid UTF-8 without
/// NUL bytes.
fn decode_text(rel: &Path, bytes: &[u8]) -> Option<SourceNode> {
    if let Some(charset) = Charset::detect_bom(bytes) {
        return Some(SourceNode::new(rel, charset.decode(bytes)).with_charset(charset, true));
    }
    if bytes.contains(&0) {
        return None;
    }
    let text = std::str::from_utf8(bytes).ok()?;
    Some(SourceNode::new(rel, text))
}
