use clap::Parser;

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Install and update your shell profile:\n    modelgate install\n\n\
                  Reinstall over an existing copy:\n    modelgate install --force\n\n\
                  Install without touching shell startup files:\n    modelgate install --skip-path-update")]
pub struct InstallArgs {
    /// Reinstall even if the package is already present
    #[arg(long, short = 'f')]
    pub force: bool,

    /// Do not add the binary directory to your shell profile
    #[arg(long)]
    pub skip_path_update: bool,
}
