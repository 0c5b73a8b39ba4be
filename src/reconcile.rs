// src/reconcile.rs
//! Folding on-disk results back into nodes.
//!
//! Strategies decide what an error means; these helpers only implement
//! the two shared outcomes: keep or replace, and annotate.

use crate::error::{Result, UpgradeError};
use crate::pipeline::Accumulator;
use crate::types::SourceNode;
use std::fs;
use std::io::ErrorKind;

/// Returns `node` unchanged if its path was not flagged, otherwise a node
/// with the same identity whose content is re-read from disk.
///
/// # Errors
/// Returns `Vanished` if a flagged file no longer exists, or an I/O error
/// if it cannot be read.
pub fn pass_or_replace(node: &SourceNode, acc: &Accumulator) -> Result<SourceNode> {
    let path = acc.resolved_path(node);
    if !acc.was_modified(&path) {
        return Ok(node.clone());
    }

    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(UpgradeError::Vanished { path });
        }
        Err(e) => return Err(UpgradeError::io(e, &path)),
    };
    Ok(node.with_content(node.effective_charset().decode(&bytes)))
}

/// Keeps only the first line of the content and attaches `message`.
#[must_use]
pub fn annotate_failure(node: &SourceNode, message: &str) -> SourceNode {
    let first_line = node.content().lines().next().unwrap_or_default();
    node.with_content(first_line).with_annotation(message)
}
