//! Verify command: check that the installed `modelgate` runs

use std::fs;

use super::helpers::self_installer;
use crate::error::{LauncherError, Result};
use crate::paths::InstallLayout;
use crate::selfinstall::InstallStrategy;

pub fn run() -> Result<()> {
    let installer = self_installer()?;
    let strategy = installed_strategy(installer.layout());
    let result = installer.verify_installation(strategy);

    if !result.success {
        return Err(LauncherError::VerifyFailed {
            message: result
                .error
                .unwrap_or_else(|| "modelgate did not run".to_string()),
        });
    }

    println!(
        "modelgate {} ({})",
        result.version.as_deref().unwrap_or("unknown version"),
        result.command_path.display()
    );
    Ok(())
}

/// Manual installs leave a link in the private bin directory; everything
/// else is found through PATH
fn installed_strategy(layout: &InstallLayout) -> InstallStrategy {
    if fs::symlink_metadata(layout.private_link()).is_ok() {
        InstallStrategy::ManualLocal
    } else {
        InstallStrategy::GlobalPrefix
    }
}
