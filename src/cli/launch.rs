use std::ffi::OsString;

use clap::Parser;

/// Arguments for the launch command
#[derive(Parser, Debug, Default)]
#[command(after_help = "EXAMPLES:\n  \
                  Launch with the selected model:\n    modelgate launch\n\n\
                  Forward arguments to the assistant:\n    modelgate launch -- --resume")]
pub struct LaunchArgs {
    /// Arguments passed through to the assistant
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<OsString>,
}
