//! Launch command: start the assistant with the configured model

use crate::cli::LaunchArgs;
use crate::config::ConfigStore;
use crate::error::Result;
use crate::launcher;

/// Returns the assistant's exit code
pub fn run(args: LaunchArgs) -> Result<i32> {
    let settings = ConfigStore::open()?.load()?;
    let plan = launcher::plan(&settings, args.args)?;
    launcher::launch(&plan)
}
