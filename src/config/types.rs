use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TOOL_NAME: &str = "upgrade-assistant";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSection {
    #[serde(default = "default_tool_name")]
    pub name: String,
    /// Defaults to `$HOME/.dotnet`.
    #[serde(default)]
    pub home: Option<PathBuf>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ToolSection {
    fn default() -> Self {
        Self {
            name: default_tool_name(),
            home: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSection {
    #[serde(default = "default_max_passes")]
    pub max_passes: u32,
    /// Defaults to a fresh temporary directory.
    #[serde(default)]
    pub work_dir: Option<PathBuf>,
}

impl Default for PipelineSection {
    fn default() -> Self {
        Self {
            max_passes: default_max_passes(),
            work_dir: None,
        }
    }
}

fn default_tool_name() -> String { DEFAULT_TOOL_NAME.to_string() }
const fn default_timeout_secs() -> u64 { 20 * 60 }
const fn default_max_passes() -> u32 { 3 }

/// On-disk schema of `upgrade-driver.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DriverToml {
    #[serde(default)]
    pub tool: ToolSection,
    #[serde(default)]
    pub pipeline: PipelineSection,
    /// Extra variables for the tool process, applied last.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub tool_name: String,
    pub tool_home: PathBuf,
    pub timeout: Duration,
    pub max_passes: u32,
    pub work_dir: Option<PathBuf>,
    pub env: BTreeMap<String, String>,
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub tool_home: Option<PathBuf>,
    pub work_dir: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}
