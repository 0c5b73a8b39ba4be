//! In-memory source nodes handed to and returned from the pipeline.

use super::Charset;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of a node across replacements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(u64);

impl NodeId {
    #[must_use]
    pub fn fresh() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A non-fatal note attached to a node (e.g. analysis error text).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    pub message: String,
}

/// One source artifact of the project tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceNode {
    id: NodeId,
    path: PathBuf,
    charset: Option<Charset>,
    bom: bool,
    content: String,
    annotations: Vec<Annotation>,
}

impl SourceNode {
    /// Creates a node with default (absent) charset and no BOM.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            id: NodeId::fresh(),
            path: path.into(),
            charset: None,
            bom: false,
            content: content.into(),
            annotations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_charset(mut self, charset: Charset, bom: bool) -> Self {
        self.charset = Some(charset);
        self.bom = bom;
        self
    }

    /// Same identity, path, charset and markers; new content.
    #[must_use]
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..self.clone()
        }
    }

    /// Same node with one more annotation.
    #[must_use]
    pub fn with_annotation(mut self, message: impl Into<String>) -> Self {
        self.annotations.push(Annotation {
            message: message.into(),
        });
        self
    }

    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Path relative to the tree root.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Declared charset, if any.
    #[must_use]
    pub fn charset(&self) -> Option<Charset> {
        self.charset
    }

    /// Declared charset, falling back to UTF-8.
    #[must_use]
    pub fn effective_charset(&self) -> Charset {
        self.charset.unwrap_or_default()
    }

    #[must_use]
    pub fn is_bom_marked(&self) -> bool {
        self.bom
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Serializes content to bytes in the node's encoding.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.effective_charset().encode(&self.content, self.bom)
    }
}
