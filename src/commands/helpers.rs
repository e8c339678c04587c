//! Shared wiring for the self-install commands

use std::path::Path;

use crate::error::Result;
use crate::paths::InstallLayout;
use crate::process::SystemRunner;
use crate::selfinstall::{HostEnv, SelfInstaller};

/// Installer wired to the real system
pub fn self_installer() -> Result<SelfInstaller<SystemRunner>> {
    Ok(SelfInstaller::new(
        SystemRunner,
        InstallLayout::detect()?,
        HostEnv::from_process(),
    ))
}

/// Command that loads an edited profile into the current shell
pub fn reload_command(profile: &Path) -> String {
    format!("source {}", profile.display())
}
