//! Clean-links command: sweep dangling links from system binary directories

use console::Style;

use super::helpers::self_installer;
use crate::cli::CleanLinksArgs;
use crate::error::Result;
use crate::selfinstall::{SweepOptions, SweepReport};

pub fn run(args: CleanLinksArgs) -> Result<()> {
    let installer = self_installer()?;
    let report = installer.sweep_stale_symlinks(SweepOptions {
        dry_run: args.dry_run,
    });

    if report.cleaned.is_empty() && report.failed.is_empty() {
        println!("No stale modelgate links found.");
        return Ok(());
    }
    print_report(&report, args.dry_run);
    Ok(())
}

/// Print what a sweep removed and how to remove what it could not
pub fn print_report(report: &SweepReport, dry_run: bool) {
    let verb = if dry_run { "Would remove" } else { "Removed" };
    for path in &report.cleaned {
        println!("{verb} stale link {}", path.display());
    }

    if report.failed.is_empty() {
        return;
    }
    println!(
        "{}",
        Style::new()
            .bold()
            .yellow()
            .apply_to("Some stale links need elevated permissions to remove:")
    );
    for link in &report.failed {
        println!("  {} ({})", link.path.display(), link.reason);
        println!("    {}", Style::new().cyan().apply_to(&link.hint));
    }
}
