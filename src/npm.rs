//! Thin wrapper over the npm command line
//!
//! npm is treated as an opaque executable: fixed argument lists in, trimmed
//! stdout and exit codes out. A non-zero exit becomes
//! [`LauncherError::PackageManagerFailed`] carrying npm's stderr verbatim.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{LauncherError, Result};
use crate::process::{CommandOutput, CommandRunner, CommandSpec, INSTALL_TIMEOUT};

/// Name of the package manager executable
pub const NPM: &str = "npm";

/// Name of the published package
pub const PACKAGE_NAME: &str = "modelgate";

pub struct Npm<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> Npm<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    /// `npm config get prefix`
    pub fn configured_prefix(&self) -> Result<PathBuf> {
        self.query_path(&["config", "get", "prefix"], "prefix")
    }

    /// `npm config set prefix <dir>`
    pub fn set_prefix(&self, dir: &Path) -> Result<()> {
        let dir = dir.to_string_lossy();
        self.checked(CommandSpec::new(NPM, ["config", "set", "prefix", &*dir]))?;
        Ok(())
    }

    /// `npm root -g`: directory holding globally installed packages
    pub fn global_root(&self) -> Result<PathBuf> {
        self.query_path(&["root", "-g"], "global root")
    }

    /// Global binary directory, `$(npm prefix -g)/bin`
    pub fn global_bin_dir(&self) -> Result<PathBuf> {
        Ok(self
            .query_path(&["prefix", "-g"], "global prefix")?
            .join("bin"))
    }

    /// `npm install -g modelgate --unsafe-perm`
    pub fn install_global(&self, force: bool) -> Result<CommandOutput> {
        let mut args = vec!["install", "-g", PACKAGE_NAME, "--unsafe-perm"];
        if force {
            args.push("--force");
        }
        self.checked(CommandSpec::new(NPM, args).timeout(INSTALL_TIMEOUT))
    }

    /// `npm install --prefix <root> modelgate --unsafe-perm`
    pub fn install_into(&self, root: &Path, force: bool) -> Result<CommandOutput> {
        let root = root.to_string_lossy();
        let mut args = vec![
            "install",
            "--prefix",
            &*root,
            PACKAGE_NAME,
            "--unsafe-perm",
        ];
        if force {
            args.push("--force");
        }
        self.checked(CommandSpec::new(NPM, args).timeout(INSTALL_TIMEOUT))
    }

    /// `npm uninstall -g modelgate`
    pub fn uninstall_global(&self) -> Result<CommandOutput> {
        self.checked(
            CommandSpec::new(NPM, ["uninstall", "-g", PACKAGE_NAME]).timeout(INSTALL_TIMEOUT),
        )
    }

    fn query_path(&self, args: &[&str], what: &str) -> Result<PathBuf> {
        let output = self.checked(CommandSpec::new(NPM, args.iter().copied()))?;
        let value = output.stdout.trim();
        // npm prints "undefined" for unset config keys
        if value.is_empty() || value == "undefined" || !Path::new(value).is_absolute() {
            return Err(LauncherError::PackageManagerOutput {
                what: what.to_string(),
                value: value.to_string(),
            });
        }
        debug!(what, value, "npm query");
        Ok(PathBuf::from(value))
    }

    fn checked(&self, spec: CommandSpec) -> Result<CommandOutput> {
        let output = self.runner.run(&spec)?;
        if output.success() {
            Ok(output)
        } else {
            Err(LauncherError::PackageManagerFailed {
                command: spec.display(),
                reason: output.failure_text(),
            })
        }
    }
}
