// src/config/io.rs
use super::types::DriverToml;
use crate::error::UpgradeError;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "upgrade-driver.toml";

/// Parses TOML text into the file schema. Missing sections take defaults.
///
/// # Errors
/// Returns error on malformed TOML or mistyped values.
pub fn parse_toml(content: &str) -> Result<DriverToml> {
    Ok(toml::from_str(content).map_err(|e| UpgradeError::Config(e.to_string()))?)
}

/// # Errors
/// Returns error if the file cannot be read or parsed.
pub fn read_toml(path: &Path) -> Result<DriverToml> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    parse_toml(&content).with_context(|| format!("In {}", path.display()))
}

/// `upgrade-driver.toml` in `root`, if present.
#[must_use]
pub fn find_config(root: &Path) -> Option<PathBuf> {
    let candidate = root.join(CONFIG_FILE);
    candidate.is_file().then_some(candidate)
}
