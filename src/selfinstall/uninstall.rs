//! Reversing an install, plus the stale-symlink sweep
//!
//! Cleanup is an ordered list of independent steps. Each step's failure is
//! captured in its own [`CleanupStep`] and never stops the steps after it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::profile::ProfileEditor;
use crate::config::CONFIG_FILE;
use crate::error::Result;
use crate::npm::Npm;
use crate::paths::InstallLayout;
use crate::process::CommandRunner;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UninstallOptions {
    /// Echo each cleanup step as it runs
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Done,
    /// Nothing to remove
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupStep {
    pub name: String,
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UninstallResult {
    pub success: bool,
    pub error: Option<String>,
    /// `npm uninstall -g` succeeded, so no fallback cleanup ran
    pub package_removed: bool,
    pub steps: Vec<CleanupStep>,
}

impl UninstallResult {
    pub fn failed_steps(&self) -> impl Iterator<Item = &CleanupStep> {
        self.steps
            .iter()
            .filter(|step| matches!(step.outcome, StepOutcome::Failed(_)))
    }
}

/// Remove modelgate.
///
/// `npm uninstall -g` alone covers the common case. When it fails, the
/// manual artifacts are removed step by step: private package, symlink,
/// PATH guard block, settings file and private npm root. The result is
/// unsuccessful only when every one of those steps failed.
pub fn uninstall(
    runner: &dyn CommandRunner,
    layout: &InstallLayout,
    editor: &ProfileEditor,
    options: UninstallOptions,
) -> UninstallResult {
    match Npm::new(runner).uninstall_global() {
        Ok(_) => {
            info!("removed global package");
            return UninstallResult {
                success: true,
                error: None,
                package_removed: true,
                steps: Vec::new(),
            };
        }
        Err(e) => warn!(error = %e, "global uninstall failed, falling back to manual cleanup"),
    }

    let package_dir = layout.private_package_dir();
    let link = layout.private_link();
    let steps = vec![
        run_step("remove private package", options, || remove_tree(&package_dir)),
        run_step("remove binary link", options, || remove_link(&link)),
        run_step("remove PATH entry", options, || {
            editor.remove_path_entry().map(|changed| {
                if changed {
                    StepOutcome::Done
                } else {
                    StepOutcome::Skipped
                }
            })
        }),
        run_step("remove configuration", options, || {
            remove_settings(&layout.config_dir)
        }),
        run_step("remove private npm root", options, || {
            remove_tree(&layout.private_root)
        }),
    ];

    let all_failed = steps
        .iter()
        .all(|step| matches!(step.outcome, StepOutcome::Failed(_)));
    UninstallResult {
        success: !all_failed,
        error: all_failed.then(|| "npm uninstall and every cleanup step failed".to_string()),
        package_removed: false,
        steps,
    }
}

fn run_step(
    name: &str,
    options: UninstallOptions,
    step: impl FnOnce() -> Result<StepOutcome>,
) -> CleanupStep {
    let outcome = match step() {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(step = name, error = %e, "cleanup step failed");
            StepOutcome::Failed(e.to_string())
        }
    };
    debug!(step = name, ?outcome, "cleanup step finished");
    if options.verbose {
        eprintln!("  {name}: {outcome:?}");
    }
    CleanupStep {
        name: name.to_string(),
        outcome,
    }
}

/// Recursively remove a directory; a missing directory is skipped
fn remove_tree(path: &Path) -> Result<StepOutcome> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(StepOutcome::Done),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(StepOutcome::Skipped),
        Err(e) => Err(e.into()),
    }
}

/// Remove the settings file, then `dir` itself only if nothing else is in it.
/// The directory may be shared through `MODELGATE_CONFIG_DIR`.
fn remove_settings(dir: &Path) -> Result<StepOutcome> {
    let outcome = match fs::remove_file(dir.join(CONFIG_FILE)) {
        Ok(()) => StepOutcome::Done,
        Err(e) if e.kind() == io::ErrorKind::NotFound => StepOutcome::Skipped,
        Err(e) => return Err(e.into()),
    };
    match fs::remove_dir(dir) {
        Ok(()) => Ok(StepOutcome::Done),
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "configuration directory kept");
            Ok(outcome)
        }
    }
}

/// Remove a link or file at `path` without following it
fn remove_link(path: &Path) -> Result<StepOutcome> {
    if fs::symlink_metadata(path).is_err() {
        return Ok(StepOutcome::Skipped);
    }
    fs::remove_file(path)?;
    Ok(StepOutcome::Done)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepOptions {
    /// Report stale links without removing them
    pub dry_run: bool,
}

/// A stale link that could not be removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleLink {
    pub path: PathBuf,
    pub reason: String,
    /// Privileged command that removes it
    pub hint: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub cleaned: Vec<PathBuf>,
    pub failed: Vec<StaleLink>,
}

/// Remove symlinks among `candidates` whose targets no longer exist.
///
/// Live links and regular files are never touched. Links that cannot be
/// removed are reported with the privileged command to run instead.
pub fn sweep_stale_symlinks(candidates: &[PathBuf], options: SweepOptions) -> SweepReport {
    let mut report = SweepReport::default();

    for path in candidates {
        let Ok(metadata) = fs::symlink_metadata(path) else {
            continue;
        };
        // fs::metadata follows the link; failure means the target is unreachable
        if !metadata.file_type().is_symlink() || fs::metadata(path).is_ok() {
            continue;
        }

        if options.dry_run {
            report.cleaned.push(path.clone());
            continue;
        }

        match fs::remove_file(path) {
            Ok(()) => {
                info!(link = %path.display(), "removed stale link");
                report.cleaned.push(path.clone());
            }
            Err(e) => {
                warn!(link = %path.display(), error = %e, "could not remove stale link");
                report.failed.push(StaleLink {
                    path: path.clone(),
                    reason: e.to_string(),
                    hint: format!("sudo rm {}", path.display()),
                });
            }
        }
    }

    report
}
