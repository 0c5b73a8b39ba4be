//! Command dispatch logic extracted from binary to reduce main function size.

use super::args::{Cli, Commands};
use super::handlers::{handle_analyze, handle_upgrade, GlobalOpts};
use crate::exit::DriverExit;
use anyhow::Result;

/// Executes the parsed command.
///
/// # Errors
/// Returns error if the command handler fails.
pub fn execute(cli: Cli) -> Result<DriverExit> {
    let global = GlobalOpts { config: cli.config };
    match cli.command {
        Some(Commands::Upgrade {
            path,
            target_framework,
            dry_run,
            run,
        }) => handle_upgrade(&global, &path, target_framework, dry_run, &run),
        Some(Commands::Analyze {
            path,
            target_framework,
            format,
            run,
        }) => handle_analyze(&global, &path, target_framework, format, &run),
        None => {
            use clap::CommandFactory;
            let _ = Cli::command().print_help();
            Ok(DriverExit::Success)
        }
    }
}
