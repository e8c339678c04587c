//! Uninstall command: remove modelgate, its PATH entry and settings

use console::Style;
use inquire::Confirm;

use super::clean_links::print_report;
use super::helpers::self_installer;
use crate::cli::UninstallArgs;
use crate::error::{LauncherError, Result};
use crate::selfinstall::uninstall::{CleanupStep, StepOutcome};
use crate::selfinstall::{SweepOptions, UninstallOptions};

pub fn run(args: UninstallArgs, verbose: bool) -> Result<()> {
    if !args.yes && !confirm()? {
        println!("Uninstall cancelled.");
        return Ok(());
    }

    let installer = self_installer()?;
    let result = installer.uninstall(UninstallOptions { verbose });

    if result.package_removed {
        println!("Removed the global modelgate package.");
    }
    for step in &result.steps {
        println!("  {}", step_line(step));
    }

    let sweep = installer.sweep_stale_symlinks(SweepOptions::default());
    print_report(&sweep, false);

    if !result.success {
        return Err(LauncherError::UninstallFailed {
            message: result
                .error
                .unwrap_or_else(|| "cleanup did not complete".to_string()),
        });
    }

    let failed = result.failed_steps().count();
    if failed == 0 {
        println!("{}", Style::new().bold().green().apply_to("modelgate uninstalled."));
    } else {
        println!(
            "{} {failed} cleanup step(s) failed; remove the paths above manually.",
            Style::new().bold().yellow().apply_to("Warning:")
        );
    }
    Ok(())
}

fn confirm() -> Result<bool> {
    let answer = Confirm::new("Remove modelgate, its PATH entry and its settings?")
        .with_default(false)
        .with_help_message("Pass --yes to skip this prompt")
        .prompt()?;
    Ok(answer)
}

fn step_line(step: &CleanupStep) -> String {
    match &step.outcome {
        StepOutcome::Done => format!("{}: done", step.name),
        StepOutcome::Skipped => format!("{}: nothing to remove", step.name),
        StepOutcome::Failed(reason) => format!("{}: failed ({reason})", step.name),
    }
}
