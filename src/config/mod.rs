// src/config/mod.rs
pub mod io;
pub mod types;

pub use self::types::{Config, ConfigOverrides, DriverToml, PipelineSection, ToolSection, DEFAULT_TOOL_NAME};
use crate::error::UpgradeError;
use anyhow::{bail, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

impl Default for Config {
    fn default() -> Self {
        Self::from_toml(DriverToml::default())
    }
}

impl Config {
    /// Resolves defaults that depend on the environment (the tool home).
    #[must_use]
    pub fn from_toml(file: DriverToml) -> Self {
        Self {
            tool_name: file.tool.name,
            tool_home: file.tool.home.unwrap_or_else(default_tool_home),
            timeout: Duration::from_secs(file.tool.timeout_secs),
            max_passes: file.pipeline.max_passes,
            work_dir: file.pipeline.work_dir,
            env: file.env,
        }
    }

    /// Loads `explicit` if given, else `upgrade-driver.toml` under
    /// `project_root` if present, else defaults. Overrides are applied
    /// last and the result is validated.
    ///
    /// # Errors
    /// Returns error if a config file cannot be read or is invalid.
    pub fn load(project_root: &Path, explicit: Option<&Path>, overrides: ConfigOverrides) -> Result<Self> {
        let file = match explicit.map(Path::to_path_buf).or_else(|| io::find_config(project_root)) {
            Some(path) => io::read_toml(&path)?,
            None => DriverToml::default(),
        };
        let mut config = Self::from_toml(file);
        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(home) = overrides.tool_home {
            self.tool_home = home;
        }
        if let Some(dir) = overrides.work_dir {
            self.work_dir = Some(dir);
        }
        if let Some(secs) = overrides.timeout_secs {
            self.timeout = Duration::from_secs(secs);
        }
    }

    /// # Errors
    /// Returns error if a value is out of range.
    pub fn validate(&self) -> Result<()> {
        if self.tool_name.trim().is_empty() {
            bail!(UpgradeError::Config("tool.name must not be empty".into()));
        }
        if self.timeout.is_zero() {
            bail!(UpgradeError::Config("tool.timeout_secs must be at least 1".into()));
        }
        if self.max_passes == 0 {
            bail!(UpgradeError::Config("pipeline.max_passes must be at least 1".into()));
        }
        Ok(())
    }
}

/// `$HOME/.dotnet`, or a relative `.dotnet` when no home is known.
#[must_use]
pub fn default_tool_home() -> PathBuf {
    dirs::home_dir().map_or_else(|| PathBuf::from(".dotnet"), |home| home.join(".dotnet"))
}
