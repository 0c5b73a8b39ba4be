use clap::Parser;
use colored::Colorize;
use upgrade_driver::cli::{self, Cli};
use upgrade_driver::exit::DriverExit;

fn main() -> DriverExit {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    match cli::dispatch::execute(cli) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red(), e);
            DriverExit::from(&e)
        }
    }
}
