// src/cli/handlers.rs
use crate::cli::args::RunArgs;
use crate::config::{Config, ConfigOverrides};
use crate::exit::DriverExit;
use crate::pipeline::{Pipeline, RunOutcome};
use crate::process::{ProcessDriver, ToolSettings};
use crate::reporting::{console, json, OutputFormat};
use crate::strategy::{AnalyzeStrategy, Strategy, UpgradeStrategy};
use crate::tree::SourceTree;
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::info;

/// Options that apply to every command.
#[derive(Debug, Clone, Default)]
pub struct GlobalOpts {
    pub config: Option<PathBuf>,
}

/// Scratch area of one run. Removed on drop unless kept.
enum WorkArea {
    Temp(TempDir),
    Kept(PathBuf),
}

impl WorkArea {
    fn create(parent: Option<&Path>, keep: bool) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("upgrade-driver-");
        let dir = match parent {
            Some(parent) => {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create work dir {}", parent.display()))?;
                builder.tempdir_in(parent)
            }
            None => builder.tempdir(),
        }
        .context("Failed to create scratch directory")?;

        if keep {
            #[allow(deprecated)]
            let path = dir.into_path();
            Ok(Self::Kept(path))
        } else {
            Ok(Self::Temp(dir))
        }
    }

    fn path(&self) -> &Path {
        match self {
            Self::Temp(dir) => dir.path(),
            Self::Kept(path) => path.as_path(),
        }
    }
}

fn load_config(root: &Path, global: &GlobalOpts, run: &RunArgs) -> Result<Config> {
    let overrides = ConfigOverrides {
        tool_home: run.tool_home.clone(),
        work_dir: run.work_dir.clone(),
        timeout_secs: run.timeout,
    };
    Config::load(root, global.config.as_deref(), overrides)
}

fn run_pipeline(
    root: &Path,
    config: &Config,
    strategy: Box<dyn Strategy>,
    keep: bool,
) -> Result<(SourceTree, RunOutcome)> {
    let tree = SourceTree::load(root)
        .with_context(|| format!("Failed to load project tree at {}", root.display()))?;
    info!(files = tree.nodes().len(), root = %root.display(), "loaded tree");

    let area = WorkArea::create(config.work_dir.as_deref(), keep)?;
    let driver = ProcessDriver::new(ToolSettings::from_config(config));
    let mut pipeline = Pipeline::new(area.path(), driver).with_max_passes(config.max_passes);
    pipeline.add_step(strategy);

    let outcome = pipeline.run(tree.nodes().to_vec())?;
    if let WorkArea::Kept(path) = &area {
        eprintln!("{} Work dir kept at {}", "INFO".cyan(), path.display());
    }
    Ok((SourceTree::from_nodes(root, outcome.nodes.clone()), outcome))
}

/// Handles the upgrade command.
///
/// # Errors
/// Returns error if configuration, the run, or writing results fails.
pub fn handle_upgrade(
    global: &GlobalOpts,
    path: &Path,
    target_framework: Option<String>,
    dry_run: bool,
    run: &RunArgs,
) -> Result<DriverExit> {
    let config = load_config(path, global, run)?;
    let strategy = Box::new(UpgradeStrategy::new(target_framework));
    let (tree, outcome) = run_pipeline(path, &config, strategy, run.keep_work_dir)?;

    let written = if dry_run {
        None
    } else {
        Some(tree.write_changed(&outcome.changed).context("Failed to write upgraded files")?)
    };
    console::print_upgrade(&outcome, written);
    Ok(DriverExit::Success)
}

/// Handles the analyze command.
///
/// # Errors
/// Returns error if configuration or the run fails.
pub fn handle_analyze(
    global: &GlobalOpts,
    path: &Path,
    target_framework: String,
    format: OutputFormat,
    run: &RunArgs,
) -> Result<DriverExit> {
    let config = load_config(path, global, run)?;
    let strategy = Box::new(AnalyzeStrategy::new(target_framework));
    let (_, outcome) = run_pipeline(path, &config, strategy, run.keep_work_dir)?;

    match format {
        OutputFormat::Terminal => console::print_analysis(&outcome),
        OutputFormat::Json => println!("{}", json::render(&outcome)?),
    }

    if outcome.annotated.is_empty() {
        Ok(DriverExit::Success)
    } else {
        Ok(DriverExit::InvocationFailed)
    }
}
