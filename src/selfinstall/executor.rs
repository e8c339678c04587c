//! Running one install strategy to completion

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::profile::{PathUpdateResult, ProfileEditor};
use super::probe::{HostEnv, is_user_owned, prefix_bin_dir};
use super::strategy::InstallStrategy;
use super::verify::verify;
use crate::error::{LauncherError, Result};
use crate::npm::Npm;
use crate::paths::InstallLayout;
use crate::process::{CommandOutput, CommandRunner};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallOptions {
    /// Echo npm's output
    pub verbose: bool,
    /// Pass `--force` to npm
    pub force: bool,
    /// Leave shell startup files untouched
    pub skip_path_update: bool,
}

/// Outcome of one install call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallResult {
    pub success: bool,
    pub strategy: InstallStrategy,
    pub bin_dir: Option<PathBuf>,
    /// Directory the package was installed into
    pub install_dir: Option<PathBuf>,
    pub profile_modified: bool,
    pub profile: Option<PathBuf>,
    pub needs_reload: bool,
    /// Set when the PATH edit failed; the install itself may still have succeeded
    pub path_warning: Option<String>,
    pub version: Option<String>,
    pub error: Option<String>,
}

impl InstallResult {
    fn new(strategy: InstallStrategy) -> Self {
        Self {
            success: false,
            strategy,
            bin_dir: None,
            install_dir: None,
            profile_modified: false,
            profile: None,
            needs_reload: false,
            path_warning: None,
            version: None,
            error: None,
        }
    }

    fn record_path_update(&mut self, update: PathUpdateResult) {
        if update.success {
            self.profile_modified |= update.path_added;
            self.needs_reload |= update.needs_reload;
            if update.profile.is_some() {
                self.profile = update.profile;
            }
        } else {
            self.path_warning = update.error;
            self.profile = update.profile;
        }
    }
}

/// Collaborators an install runs against
pub struct ExecContext<'a> {
    pub runner: &'a dyn CommandRunner,
    pub layout: &'a InstallLayout,
    pub env: &'a HostEnv,
    pub editor: &'a ProfileEditor,
    /// npm prefix found by the probe; queried again when absent
    pub prefix: Option<&'a Path>,
}

/// Run `strategy`, then verify the result.
///
/// Never retries with a different strategy. Any failure, including a failed
/// verification, is reported in [`InstallResult::error`].
pub fn execute(
    ctx: &ExecContext<'_>,
    strategy: InstallStrategy,
    options: InstallOptions,
) -> InstallResult {
    let mut result = InstallResult::new(strategy);
    info!(%strategy, "installing");

    let outcome = match strategy {
        InstallStrategy::UserPrefix => install_user_prefix(ctx, options, &mut result),
        InstallStrategy::GlobalPrefix => install_global_prefix(ctx, options, &mut result),
        InstallStrategy::ManualLocal => install_manual_local(ctx, options, &mut result),
    };
    if let Err(e) = outcome {
        warn!(%strategy, error = %e, "install step failed");
        result.error = Some(e.to_string());
        return result;
    }

    let verification = verify(
        ctx.runner,
        ctx.layout,
        strategy,
        ctx.env.path.as_ref(),
        result.bin_dir.as_deref(),
    );
    if verification.success {
        result.success = true;
        result.version = verification.version;
    } else {
        result.error = Some(
            verification
                .error
                .unwrap_or_else(|| "verification failed".to_string()),
        );
    }
    result
}

fn install_user_prefix(
    ctx: &ExecContext<'_>,
    options: InstallOptions,
    result: &mut InstallResult,
) -> Result<()> {
    let npm = Npm::new(ctx.runner);
    let current = match ctx.prefix {
        Some(prefix) => Some(prefix.to_path_buf()),
        None => npm.configured_prefix().ok(),
    };

    // nvm, fnm and Volta prefixes already belong to the user; keep them
    let prefix = match current {
        Some(current) if is_user_owned(&current, &ctx.layout.home) => {
            debug!(prefix = %current.display(), "keeping user-owned npm prefix");
            current
        }
        _ => {
            let prefix = ctx.layout.user_prefix.clone();
            fs::create_dir_all(&prefix)?;
            npm.set_prefix(&prefix)?;
            info!(prefix = %prefix.display(), "configured npm prefix");
            prefix
        }
    };
    let bin_dir = prefix_bin_dir(&prefix);

    if !options.skip_path_update {
        result.record_path_update(ctx.editor.ensure_path_entry(&bin_dir));
    }

    echo(options, &npm.install_global(options.force)?);

    result.install_dir = Some(
        npm.global_root()
            .unwrap_or_else(|_| prefix.join("lib").join("node_modules")),
    );
    result.bin_dir = Some(npm.global_bin_dir().unwrap_or(bin_dir));
    Ok(())
}

fn install_global_prefix(
    ctx: &ExecContext<'_>,
    options: InstallOptions,
    result: &mut InstallResult,
) -> Result<()> {
    let npm = Npm::new(ctx.runner);
    echo(options, &npm.install_global(options.force)?);

    let bin_dir = npm.global_bin_dir()?;
    result.install_dir = npm.global_root().ok();

    // The editor leaves the profile alone when bin_dir is already on PATH
    if !options.skip_path_update {
        result.record_path_update(ctx.editor.ensure_path_entry(&bin_dir));
    }
    result.bin_dir = Some(bin_dir);
    Ok(())
}

fn install_manual_local(
    ctx: &ExecContext<'_>,
    options: InstallOptions,
    result: &mut InstallResult,
) -> Result<()> {
    let layout = ctx.layout;
    fs::create_dir_all(&layout.private_root)?;
    fs::create_dir_all(&layout.private_bin)?;

    let npm = Npm::new(ctx.runner);
    echo(options, &npm.install_into(&layout.private_root, options.force)?);

    let entry = layout.entry_script();
    if !entry.is_file() {
        return Err(LauncherError::EntryScriptNotFound {
            path: entry.display().to_string(),
        });
    }

    let link = layout.private_link();
    replace_symlink(&entry, &link)?;
    make_executable(&entry)?;
    info!(link = %link.display(), target = %entry.display(), "linked entry script");

    if !options.skip_path_update {
        result.record_path_update(ctx.editor.ensure_path_entry(&layout.private_bin));
    }

    result.install_dir = Some(layout.private_package_dir());
    result.bin_dir = Some(layout.private_bin.clone());
    Ok(())
}

fn echo(options: InstallOptions, output: &CommandOutput) {
    if options.verbose {
        for line in output.stdout.lines().chain(output.stderr.lines()) {
            eprintln!("  npm: {line}");
        }
    }
}

/// Point `link` at `target`, replacing whatever link or file sits at `link`
#[cfg(unix)]
fn replace_symlink(target: &Path, link: &Path) -> Result<()> {
    if fs::symlink_metadata(link).is_ok() {
        debug!(link = %link.display(), "replacing existing link");
        fs::remove_file(link)?;
    }
    std::os::unix::fs::symlink(target, link)?;
    Ok(())
}

#[cfg(not(unix))]
fn replace_symlink(_target: &Path, _link: &Path) -> Result<()> {
    Err(LauncherError::UnsupportedPlatform)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_mode(permissions.mode() | 0o755);
    fs::set_permissions(path, permissions)?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selfinstall::probe::{ShellInfo, ShellKind};
    use crate::test_fixtures::{ScriptedRunner, create_home, create_temp_dir};

    fn bash_editor(layout: &InstallLayout, env: &HostEnv) -> ProfileEditor {
        ProfileEditor::new(
            &ShellInfo {
                kind: ShellKind::Bash,
                profile: layout.home.join(".bashrc"),
            },
            env.path.clone(),
        )
    }

    #[test]
    fn test_global_install_failure_surfaces_stderr_and_skips_verify() {
        let (_temp, layout) = create_home();
        let env = HostEnv::default();
        let editor = bash_editor(&layout, &env);
        let runner = ScriptedRunner::new()
            .fail("npm install -g", 1, "permission denied")
            .ok("modelgate --version", "1.0.0");
        let ctx = ExecContext {
            runner: &runner,
            layout: &layout,
            env: &env,
            editor: &editor,
            prefix: None,
        };

        let result = execute(&ctx, InstallStrategy::GlobalPrefix, InstallOptions::default());

        assert!(!result.success);
        assert_eq!(result.strategy, InstallStrategy::GlobalPrefix);
        assert!(result.error.unwrap().contains("permission denied"));
        assert!(!runner.ran("modelgate --version"));
        assert!(!layout.home.join(".bashrc").exists());
    }

    #[test]
    fn test_global_install_success_extends_path() {
        let (temp, layout) = create_home();
        let system = create_temp_dir();
        let bin = system.path().join("bin");
        let env = HostEnv {
            path: Some("/usr/bin".into()),
            ..HostEnv::default()
        };
        let editor = bash_editor(&layout, &env);
        let runner = ScriptedRunner::new()
            .ok("npm install -g", "added 1 package")
            .ok("npm prefix -g", &format!("{}\n", system.path().display()))
            .ok("npm root -g", &format!("{}/lib/node_modules\n", system.path().display()))
            .ok("modelgate --version", "1.0.0\n");
        let ctx = ExecContext {
            runner: &runner,
            layout: &layout,
            env: &env,
            editor: &editor,
            prefix: None,
        };

        let result = execute(&ctx, InstallStrategy::GlobalPrefix, InstallOptions::default());

        assert!(result.success, "{:?}", result.error);
        assert_eq!(result.version.as_deref(), Some("1.0.0"));
        assert_eq!(result.bin_dir, Some(bin.clone()));
        assert!(result.profile_modified);
        assert!(result.needs_reload);
        let bashrc = std::fs::read_to_string(temp.path().join(".bashrc")).unwrap();
        assert!(bashrc.contains(&format!("export PATH=\"$PATH:{}\"", bin.display())));
    }

    #[test]
    fn test_user_prefix_configures_prefix_before_install() {
        let (_temp, layout) = create_home();
        let env = HostEnv::default();
        let editor = bash_editor(&layout, &env);
        let prefix = layout.user_prefix.display().to_string();
        let runner = ScriptedRunner::new()
            .ok("npm config get prefix", "/usr/local\n")
            .ok("npm config set prefix", "")
            .ok("npm install -g", "")
            .ok("npm prefix -g", &format!("{prefix}\n"))
            .ok("npm root -g", &format!("{prefix}/lib/node_modules\n"))
            .ok("modelgate --version", "1.0.0\n");
        let ctx = ExecContext {
            runner: &runner,
            layout: &layout,
            env: &env,
            editor: &editor,
            prefix: None,
        };

        let result = execute(&ctx, InstallStrategy::UserPrefix, InstallOptions::default());

        assert!(result.success, "{:?}", result.error);
        assert!(layout.user_prefix.is_dir());
        assert_eq!(result.bin_dir, Some(layout.user_prefix.join("bin")));

        let lines: Vec<String> = runner.calls().iter().map(|c| c.display()).collect();
        let set = lines.iter().position(|l| l.starts_with("npm config set prefix"));
        let install = lines.iter().position(|l| l.starts_with("npm install -g"));
        assert!(set.unwrap() < install.unwrap());
        assert_eq!(lines[set.unwrap()], format!("npm config set prefix {prefix}"));
    }

    #[test]
    fn test_user_prefix_already_configured_is_not_reset() {
        let (_temp, layout) = create_home();
        let env = HostEnv::default();
        let editor = bash_editor(&layout, &env);
        let prefix = layout.user_prefix.display().to_string();
        let runner = ScriptedRunner::new()
            .ok("npm config get prefix", &format!("{prefix}\n"))
            .ok("npm install -g", "")
            .ok("modelgate --version", "1.0.0\n");
        let ctx = ExecContext {
            runner: &runner,
            layout: &layout,
            env: &env,
            editor: &editor,
            prefix: None,
        };

        let options = InstallOptions {
            skip_path_update: true,
            ..InstallOptions::default()
        };
        let result = execute(&ctx, InstallStrategy::UserPrefix, options);

        assert!(result.success, "{:?}", result.error);
        assert!(!runner.ran("npm config set prefix"));
        assert!(!result.profile_modified);
        assert!(!layout.home.join(".bashrc").exists());
        // Root queries were unscripted; layout defaults fill in
        assert_eq!(result.bin_dir, Some(layout.user_prefix.join("bin")));
    }

    #[test]
    fn test_user_owned_prefix_is_kept() {
        let (_temp, layout) = create_home();
        let env = HostEnv::default();
        let editor = bash_editor(&layout, &env);
        let nvm = layout.home.join(".nvm/versions/node/v20");
        let runner = ScriptedRunner::new()
            .ok("npm config set prefix", "")
            .ok("npm install -g", "")
            .ok("npm prefix -g", &format!("{}\n", nvm.display()))
            .ok("modelgate --version", "1.0.0\n");
        let ctx = ExecContext {
            runner: &runner,
            layout: &layout,
            env: &env,
            editor: &editor,
            prefix: Some(nvm.as_path()),
        };

        let result = execute(&ctx, InstallStrategy::UserPrefix, InstallOptions::default());

        assert!(result.success, "{:?}", result.error);
        assert!(!runner.ran("npm config set prefix"));
        assert!(!runner.ran("npm config get prefix"));
        assert!(!layout.user_prefix.exists());
        assert_eq!(result.bin_dir, Some(nvm.join("bin")));
        let bashrc = std::fs::read_to_string(layout.home.join(".bashrc")).unwrap();
        assert!(bashrc.contains(&nvm.join("bin").display().to_string()));
        assert!(!bashrc.contains(".npm-global"));
    }

    #[test]
    fn test_install_timeout_is_reported_not_retried() {
        let (_temp, layout) = create_home();
        let env = HostEnv::default();
        let editor = bash_editor(&layout, &env);
        let runner = ScriptedRunner::new().timeout("npm install -g");
        let ctx = ExecContext {
            runner: &runner,
            layout: &layout,
            env: &env,
            editor: &editor,
            prefix: None,
        };

        let result = execute(&ctx, InstallStrategy::GlobalPrefix, InstallOptions::default());

        assert!(!result.success);
        assert!(result.error.unwrap().contains("timed out"));
        let installs = runner
            .calls()
            .iter()
            .filter(|c| c.display().starts_with("npm install"))
            .count();
        assert_eq!(installs, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_manual_install_links_entry_script() {
        let (_temp, layout) = create_home();
        let env = HostEnv::default();
        let editor = bash_editor(&layout, &env);

        // Stand in for npm: the package tree already exists, plus a stale link
        let entry = layout.entry_script();
        std::fs::create_dir_all(entry.parent().unwrap()).unwrap();
        std::fs::write(&entry, "#!/usr/bin/env node\n").unwrap();
        std::fs::create_dir_all(&layout.private_bin).unwrap();
        std::os::unix::fs::symlink("/nonexistent/old.js", layout.private_link()).unwrap();

        let link = layout.private_link().display().to_string();
        let runner = ScriptedRunner::new()
            .ok("npm install --prefix", "")
            .ok(&format!("{link} --version"), "1.0.0\n");
        let ctx = ExecContext {
            runner: &runner,
            layout: &layout,
            env: &env,
            editor: &editor,
            prefix: None,
        };

        let result = execute(&ctx, InstallStrategy::ManualLocal, InstallOptions::default());

        assert!(result.success, "{:?}", result.error);
        assert_eq!(std::fs::read_link(layout.private_link()).unwrap(), entry);
        assert_eq!(result.bin_dir, Some(layout.private_bin.clone()));
        assert_eq!(result.install_dir, Some(layout.private_package_dir()));

        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&entry).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);

        let bashrc = std::fs::read_to_string(layout.home.join(".bashrc")).unwrap();
        assert!(bashrc.contains(&layout.private_bin.display().to_string()));
    }

    #[test]
    fn test_manual_install_missing_entry_script() {
        let (_temp, layout) = create_home();
        let env = HostEnv::default();
        let editor = bash_editor(&layout, &env);
        let runner = ScriptedRunner::new().ok("npm install --prefix", "");
        let ctx = ExecContext {
            runner: &runner,
            layout: &layout,
            env: &env,
            editor: &editor,
            prefix: None,
        };

        let result = execute(&ctx, InstallStrategy::ManualLocal, InstallOptions::default());

        assert!(!result.success);
        assert!(result.error.unwrap().contains("Entry script not found"));
        assert!(!layout.private_link().exists());
    }

    #[test]
    fn test_verification_failure_fails_install() {
        let (_temp, layout) = create_home();
        let env = HostEnv::default();
        let editor = bash_editor(&layout, &env);
        let runner = ScriptedRunner::new()
            .ok("npm install -g", "")
            .ok("npm prefix -g", "/opt/node\n")
            .fail("modelgate --version", 1, "cannot find module");
        let ctx = ExecContext {
            runner: &runner,
            layout: &layout,
            env: &env,
            editor: &editor,
            prefix: None,
        };

        let options = InstallOptions {
            skip_path_update: true,
            ..InstallOptions::default()
        };
        let result = execute(&ctx, InstallStrategy::GlobalPrefix, options);

        assert!(!result.success);
        assert!(result.error.unwrap().contains("cannot find module"));
    }
}
