//! Self-installation and PATH management
//!
//! The install flow probes the machine ([`probe`]), picks one of three
//! strategies ([`strategy`]), runs it ([`executor`]) with shell profile
//! edits ([`profile`]) and confirms the command runs ([`verify`]).
//! [`uninstall`] reverses all of it.
//!
//! [`SelfInstaller`] is the entry point used by the CLI. It owns its
//! collaborators (command runner, filesystem layout, environment snapshot)
//! so tests can substitute every one of them.

pub mod executor;
pub mod probe;
pub mod profile;
pub mod strategy;
pub mod uninstall;
pub mod verify;

pub use executor::{InstallOptions, InstallResult};
pub use probe::{HostEnv, ProbeResult};
pub use strategy::InstallStrategy;
pub use uninstall::{SweepOptions, SweepReport, UninstallOptions, UninstallResult};
pub use verify::VerifyResult;

use std::path::Path;

use tracing::info;

use crate::paths::InstallLayout;
use crate::process::CommandRunner;
use executor::ExecContext;
use probe::ShellInfo;
use profile::ProfileEditor;

pub struct SelfInstaller<R> {
    runner: R,
    layout: InstallLayout,
    env: HostEnv,
}

impl<R: CommandRunner> SelfInstaller<R> {
    pub fn new(runner: R, layout: InstallLayout, env: HostEnv) -> Self {
        Self {
            runner,
            layout,
            env,
        }
    }

    pub fn layout(&self) -> &InstallLayout {
        &self.layout
    }

    #[cfg(test)]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn probe(&self) -> ProbeResult {
        probe::probe(&self.runner, &self.env, &self.layout)
    }

    /// Probe, choose a strategy and run it
    pub fn install(&self, options: InstallOptions) -> InstallResult {
        let probed = self.probe();
        let strategy = strategy::select_strategy(&probed);
        info!(%strategy, prefix = ?probed.prefix, "selected install strategy");
        self.run_strategy(&probed.shell, probed.prefix.as_deref(), strategy, options)
    }

    /// Run a specific strategy against a given shell
    pub fn execute(
        &self,
        shell: &ShellInfo,
        strategy: InstallStrategy,
        options: InstallOptions,
    ) -> InstallResult {
        self.run_strategy(shell, None, strategy, options)
    }

    fn run_strategy(
        &self,
        shell: &ShellInfo,
        prefix: Option<&Path>,
        strategy: InstallStrategy,
        options: InstallOptions,
    ) -> InstallResult {
        let editor = ProfileEditor::new(shell, self.env.path.clone());
        let ctx = ExecContext {
            runner: &self.runner,
            layout: &self.layout,
            env: &self.env,
            editor: &editor,
            prefix,
        };
        executor::execute(&ctx, strategy, options)
    }

    pub fn verify_installation(&self, strategy: InstallStrategy) -> VerifyResult {
        verify::verify(
            &self.runner,
            &self.layout,
            strategy,
            self.env.path.as_ref(),
            None,
        )
    }

    pub fn uninstall(&self, options: UninstallOptions) -> UninstallResult {
        uninstall::uninstall(&self.runner, &self.layout, &self.profile_editor(), options)
    }

    pub fn sweep_stale_symlinks(&self, options: SweepOptions) -> SweepReport {
        uninstall::sweep_stale_symlinks(&self.layout.stale_link_candidates, options)
    }

    fn profile_editor(&self) -> ProfileEditor {
        let shell = ShellInfo::detect(&self.env, &self.layout.home);
        ProfileEditor::new(&shell, self.env.path.clone())
    }
}
