//! Choosing how to install from what the probe found

use std::fmt;

use super::probe::ProbeResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStrategy {
    /// Point npm at a user-owned prefix and install globally there
    UserPrefix,
    /// Install into the existing system-wide prefix, which is writable
    GlobalPrefix,
    /// Install into a private directory and symlink the entry script
    ManualLocal,
}

impl fmt::Display for InstallStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InstallStrategy::UserPrefix => "user prefix",
            InstallStrategy::GlobalPrefix => "global prefix",
            InstallStrategy::ManualLocal => "manual local",
        };
        f.write_str(name)
    }
}

/// Map a probe result to a strategy. Pure and deterministic.
pub fn select_strategy(probe: &ProbeResult) -> InstallStrategy {
    if probe.prefix_is_user_owned {
        InstallStrategy::UserPrefix
    } else if probe.bin_dir_writable {
        InstallStrategy::GlobalPrefix
    } else {
        InstallStrategy::ManualLocal
    }
}
