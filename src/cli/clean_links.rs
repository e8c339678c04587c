use clap::Parser;

/// Arguments for the clean-links command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Remove dangling links:\n    modelgate clean-links\n\n\
                  Show what would be removed:\n    modelgate clean-links --dry-run")]
pub struct CleanLinksArgs {
    /// Report dangling links without removing them
    #[arg(long)]
    pub dry_run: bool,
}
