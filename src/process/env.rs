// src/process/env.rs
//! Environment overrides applied on top of the inherited environment.

use std::collections::BTreeMap;
use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::warn;

/// Variables that keep the tool non-interactive and quiet.
pub const FIXED_VARS: [(&str, &str); 3] = [
    ("TERM", "dumb"),
    ("DOTNET_UPGRADEASSISTANT_TELEMETRY_OPTOUT", "1"),
    ("DOTNET_UPGRADEASSISTANT_SKIP_FIRST_TIME_EXPERIENCE", "1"),
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolEnv {
    vars: Vec<(OsString, OsString)>,
}

impl ToolEnv {
    /// Builds the overrides: fixed variables, then `PATH` extended with the
    /// tool home and its `tools` directory, then `extra` (which wins).
    #[must_use]
    pub fn build(home: &Path, inherited_path: Option<&OsStr>, extra: &BTreeMap<String, String>) -> Self {
        let mut vars: Vec<(OsString, OsString)> = FIXED_VARS
            .iter()
            .map(|(k, v)| (OsString::from(k), OsString::from(v)))
            .collect();

        if let Some(path) = extended_path(home, inherited_path) {
            vars.push((OsString::from("PATH"), path));
        }

        for (key, value) in extra {
            vars.retain(|(k, _)| k.as_os_str() != OsStr::new(key));
            vars.push((OsString::from(key), OsString::from(value)));
        }

        Self { vars }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&OsStr> {
        self.vars
            .iter()
            .rev()
            .find(|(k, _)| k.as_os_str() == OsStr::new(key))
            .map(|(_, v)| v.as_os_str())
    }

    pub fn apply(&self, command: &mut Command) {
        for (key, value) in &self.vars {
            command.env(key, value);
        }
    }
}

fn extended_path(home: &Path, inherited: Option<&OsStr>) -> Option<OsString> {
    let mut entries: Vec<PathBuf> = inherited.map(|p| env::split_paths(p).collect()).unwrap_or_default();
    entries.push(home.to_path_buf());
    entries.push(home.join("tools"));

    match env::join_paths(entries) {
        Ok(joined) => Some(joined),
        Err(e) => {
            warn!("Leaving PATH untouched: {e}");
            None
        }
    }
}
