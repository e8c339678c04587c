//! Install command: put modelgate on the user's PATH

use console::Style;

use super::helpers::{reload_command, self_installer};
use crate::cli::InstallArgs;
use crate::error::{LauncherError, Result};
use crate::progress::Spinner;
use crate::selfinstall::{InstallOptions, InstallResult};

pub fn run(args: InstallArgs, verbose: bool) -> Result<()> {
    let installer = self_installer()?;
    let options = InstallOptions {
        verbose,
        force: args.force,
        skip_path_update: args.skip_path_update,
    };

    let spinner = Spinner::start("Installing modelgate", verbose);
    let result = installer.install(options);
    spinner.finish();

    if !result.success {
        return Err(LauncherError::InstallFailed {
            message: result
                .error
                .unwrap_or_else(|| format!("{} install did not complete", result.strategy)),
        });
    }

    print_summary(&result, args.skip_path_update);
    Ok(())
}

fn print_summary(result: &InstallResult, path_skipped: bool) {
    let version = result.version.as_deref().unwrap_or("unknown version");
    println!(
        "{} modelgate {} ({})",
        Style::new().bold().green().apply_to("Installed"),
        version,
        result.strategy
    );
    for line in summary_lines(result, path_skipped) {
        println!("  {line}");
    }

    if let Some(warning) = &result.path_warning {
        println!(
            "{} {}",
            Style::new().bold().yellow().apply_to("Warning:"),
            warning
        );
    }

    if result.needs_reload {
        if let Some(profile) = &result.profile {
            println!();
            println!(
                "Restart your shell or run: {}",
                Style::new().cyan().apply_to(reload_command(profile))
            );
        }
    }
}

fn summary_lines(result: &InstallResult, path_skipped: bool) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(bin_dir) = &result.bin_dir {
        lines.push(format!("Binary directory: {}", bin_dir.display()));
    }
    if let Some(install_dir) = &result.install_dir {
        lines.push(format!("Package directory: {}", install_dir.display()));
    }
    match (&result.profile, result.profile_modified) {
        _ if path_skipped => lines.push("Shell profile left unchanged".to_string()),
        (Some(profile), true) => lines.push(format!("Updated PATH in {}", profile.display())),
        (_, false) if result.path_warning.is_none() => {
            lines.push("PATH entry already in place".to_string());
        }
        _ => {}
    }
    lines
}
