//! modelgate - coding assistant launcher
//!
//! Exports gateway settings to a coding assistant and starts it, and can
//! install itself onto the user's PATH and remove itself again.

use clap::Parser;
use miette::Diagnostic;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod error;
mod launcher;
mod npm;
mod paths;
mod process;
mod progress;
mod selfinstall;

#[cfg(test)]
mod test_fixtures;

use cli::{Cli, Commands, LaunchArgs};
use error::Result;

/// Log to stderr; `RUST_LOG` wins over `--verbose`
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Run the selected command and return the process exit code
fn dispatch(cli: Cli) -> Result<i32> {
    let verbose = cli.verbose;
    let command = cli
        .command
        .unwrap_or_else(|| Commands::Launch(LaunchArgs::default()));

    match command {
        Commands::Launch(args) => return commands::launch::run(args),
        Commands::Install(args) => commands::install::run(args, verbose)?,
        Commands::Uninstall(args) => commands::uninstall::run(args, verbose)?,
        Commands::Verify => commands::verify::run()?,
        Commands::CleanLinks(args) => commands::clean_links::run(args)?,
        Commands::Config(args) => commands::config::run(args)?,
        Commands::Model(args) => commands::model::run(args)?,
        Commands::Version => commands::version::run()?,
        Commands::Completions(args) => commands::completions::run(args)?,
    }
    Ok(0)
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match dispatch(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            if let Some(help) = e.help() {
                eprintln!("  help: {help}");
            }
            std::process::exit(1);
        }
    }
}
