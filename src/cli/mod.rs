//! CLI definitions using clap derive API
//!
//! Argument types for each command live in their own submodule.

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};

pub mod clean_links;
pub mod completions;
pub mod config;
pub mod install;
pub mod launch;
pub mod model;
pub mod uninstall;

pub use clean_links::CleanLinksArgs;
pub use completions::CompletionsArgs;
pub use config::{ConfigArgs, ConfigSubcommand};
pub use install::InstallArgs;
pub use launch::LaunchArgs;
pub use model::ModelArgs;
pub use uninstall::UninstallArgs;

/// modelgate - launch a coding assistant through a model gateway
#[derive(Parser, Debug)]
#[command(
    name = "modelgate",
    author,
    version,
    color = clap::ColorChoice::Auto,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Launch a coding assistant against the model gateway of your choice",
    long_about = "modelgate exports the configured gateway endpoint, key and model to a coding \
                  assistant and starts it. It can also install itself onto your PATH and remove \
                  itself again.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  modelgate                              \x1b[90m# Launch with the selected model\x1b[0m\n   \
                  modelgate launch -- --resume           \x1b[90m# Forward arguments to the assistant\x1b[0m\n   \
                  modelgate model                        \x1b[90m# Pick a model interactively\x1b[0m\n   \
                  modelgate config set base_url <url>    \x1b[90m# Point at a gateway\x1b[0m\n   \
                  modelgate install                      \x1b[90m# Put modelgate on your PATH\x1b[0m\n   \
                  modelgate uninstall                    \x1b[90m# Remove modelgate\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Defaults to `launch` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the assistant with the configured model
    Launch(LaunchArgs),

    /// Install modelgate and put it on your PATH
    Install(InstallArgs),

    /// Remove modelgate, its PATH entry and its configuration
    Uninstall(UninstallArgs),

    /// Check that the installed modelgate command runs
    Verify,

    /// Remove dangling modelgate links from system binary directories
    #[command(name = "clean-links")]
    CleanLinks(CleanLinksArgs),

    /// Read and write settings
    Config(ConfigArgs),

    /// Choose the model to launch with
    Model(ModelArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_no_subcommand_means_launch() {
        let cli = Cli::try_parse_from(["modelgate"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_parsing_verify() {
        let cli = Cli::try_parse_from(["modelgate", "verify"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Verify)));
    }

    #[test]
    fn test_cli_parsing_version() {
        let cli = Cli::try_parse_from(["modelgate", "version"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Version)));
    }

    #[test]
    fn test_cli_global_verbose_after_subcommand() {
        let cli = Cli::try_parse_from(["modelgate", "install", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Some(Commands::Install(_))));
    }

    #[test]
    fn test_cli_parsing_clean_links() {
        let cli = Cli::try_parse_from(["modelgate", "clean-links", "--dry-run"]).unwrap();
        match cli.command {
            Some(Commands::CleanLinks(args)) => assert!(args.dry_run),
            _ => panic!("Expected CleanLinks command"),
        }
    }

    #[test]
    fn test_cli_unknown_subcommand_fails() {
        assert!(Cli::try_parse_from(["modelgate", "frobnicate"]).is_err());
    }
}
