mod charset;
mod command;
mod node;

pub use charset::Charset;
pub use command::{display_command, ToolRun};
pub use node::{Annotation, NodeId, SourceNode};

use std::path::Path;

/// How a materialized path participates in driving the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// `.csproj`, `.vbproj`, `.fsproj`
    Project,
    /// `.sln`
    Solution,
    Other,
}

impl InputKind {
    /// Classifies a path by its suffix.
    #[must_use]
    pub fn classify(path: &Path) -> Self {
        let name = path.to_string_lossy();
        if name.ends_with(".csproj") || name.ends_with(".vbproj") || name.ends_with(".fsproj") {
            Self::Project
        } else if name.ends_with(".sln") {
            Self::Solution
        } else {
            Self::Other
        }
    }
}
