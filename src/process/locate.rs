// src/process/locate.rs
//! Finds the tool executable.

use crate::error::{Result, UpgradeError};
use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Platform file name for a tool: `name.exe` on Windows, `name` elsewhere.
#[must_use]
pub fn tool_file_name(name: &str) -> String {
    if cfg!(windows) {
        format!("{name}.exe")
    } else {
        name.to_string()
    }
}

/// Looks in `<home>/tools` first, then in each entry of `path_var` in order.
///
/// # Errors
/// Returns `ToolNotFound` if no regular file with the tool's name exists in
/// any searched location.
pub fn locate_tool(name: &str, home: &Path, path_var: Option<&OsStr>) -> Result<PathBuf> {
    let file_name = tool_file_name(name);

    let conventional = home.join("tools").join(&file_name);
    if conventional.is_file() {
        return Ok(conventional);
    }

    path_var
        .into_iter()
        .flat_map(env::split_paths)
        .map(|dir| dir.join(&file_name))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| UpgradeError::ToolNotFound {
            name: file_name.clone(),
        })
}
