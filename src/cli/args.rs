// src/cli/args.rs
use crate::reporting::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "upgrade-driver",
    version,
    about = "Drives upgrade-assistant over a .NET project tree"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
    /// Config file (default: upgrade-driver.toml in the project root)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Debug-level diagnostics on stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Options shared by every command that runs the tool.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Parent directory for scratch workspaces
    #[arg(long, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,
    /// Keep scratch workspaces after the run
    #[arg(long)]
    pub keep_work_dir: bool,
    /// Tool installation root (default: ~/.dotnet)
    #[arg(long, value_name = "DIR")]
    pub tool_home: Option<PathBuf>,
    /// Per-invocation ceiling in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upgrade every project in place and write the results back
    Upgrade {
        #[arg(value_name = "PATH", default_value = ".")]
        path: PathBuf,
        /// Target framework moniker, e.g. net9.0
        #[arg(long, short = 't', value_name = "FW")]
        target_framework: Option<String>,
        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Analyze every solution and report findings
    Analyze {
        #[arg(value_name = "PATH", default_value = ".")]
        path: PathBuf,
        /// Target framework moniker, e.g. net9.0
        #[arg(long, short = 't', value_name = "FW")]
        target_framework: String,
        #[arg(long, value_enum, default_value_t = OutputFormat::Terminal)]
        format: OutputFormat,
        #[command(flatten)]
        run: RunArgs,
    },
}
