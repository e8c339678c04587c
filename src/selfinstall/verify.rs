//! Post-install check that the `modelgate` command runs

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::strategy::InstallStrategy;
use crate::paths::{APP_NAME, InstallLayout};
use crate::process::{CommandRunner, CommandSpec, QUICK_TIMEOUT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyResult {
    pub success: bool,
    /// Trimmed `--version` output
    pub version: Option<String>,
    /// The command that was run: an absolute path, or the bare name when it
    /// could not be located on PATH
    pub command_path: PathBuf,
    pub error: Option<String>,
}

/// Run `modelgate --version` the way the chosen strategy exposes it.
///
/// The manual strategy's symlink is run by absolute path, since the running
/// process's PATH predates the profile edit. Other strategies run the bare
/// name through the OS executable search; `extra_dir`, when given, is
/// appended to the child's PATH to mirror an edit made during this install.
pub fn verify(
    runner: &dyn CommandRunner,
    layout: &InstallLayout,
    strategy: InstallStrategy,
    live_path: Option<&OsString>,
    extra_dir: Option<&Path>,
) -> VerifyResult {
    let search_path = extended_path(live_path, extra_dir);

    let (program, command_path) = match strategy {
        InstallStrategy::ManualLocal => {
            let link = layout.private_link();
            (link.display().to_string(), link)
        }
        InstallStrategy::UserPrefix | InstallStrategy::GlobalPrefix => {
            let resolved = search_path
                .as_ref()
                .and_then(|path| find_on_path(APP_NAME, path))
                .unwrap_or_else(|| PathBuf::from(APP_NAME));
            (APP_NAME.to_string(), resolved)
        }
    };

    let mut spec = CommandSpec::new(program, ["--version"]).timeout(QUICK_TIMEOUT);
    if strategy != InstallStrategy::ManualLocal && extra_dir.is_some() {
        if let Some(path) = &search_path {
            spec = spec.env("PATH", path.to_string_lossy());
        }
    }

    match runner.run(&spec) {
        Ok(output) if output.success() => {
            let version = output.stdout.trim().to_string();
            debug!(command = %command_path.display(), %version, "verified installation");
            VerifyResult {
                success: true,
                version: Some(version),
                command_path,
                error: None,
            }
        }
        Ok(output) => {
            let error = format!(
                "'{} --version' failed: {}",
                command_path.display(),
                output.failure_text()
            );
            warn!(%error, "verification failed");
            VerifyResult {
                success: false,
                version: None,
                command_path,
                error: Some(error),
            }
        }
        Err(e) => {
            warn!(error = %e, "verification failed");
            VerifyResult {
                success: false,
                version: None,
                command_path,
                error: Some(e.to_string()),
            }
        }
    }
}

fn extended_path(live_path: Option<&OsString>, extra_dir: Option<&Path>) -> Option<OsString> {
    let mut entries: Vec<PathBuf> = live_path
        .map(|path| std::env::split_paths(path).collect())
        .unwrap_or_default();
    if let Some(dir) = extra_dir {
        if !entries.iter().any(|entry| entry == dir) {
            entries.push(dir.to_path_buf());
        }
    }
    if entries.is_empty() {
        return None;
    }
    std::env::join_paths(entries).ok()
}

/// First file named `name` in the directories of `path`
fn find_on_path(name: &str, path: &OsString) -> Option<PathBuf> {
    std::env::split_paths(path)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}
