//! Model command: choose the model the assistant launches with

use inquire::Select;

use crate::cli::ModelArgs;
use crate::config::{ConfigStore, SettingKey};
use crate::error::{LauncherError, Result};

pub fn run(args: ModelArgs) -> Result<()> {
    let store = ConfigStore::open()?;
    let mut settings = store.load()?;

    if let Some(id) = args.set {
        settings.set(SettingKey::Model, &id);
        store.save(&settings)?;
        println!("Selected model: {id}");
        return Ok(());
    }

    let candidates = if args.ids.is_empty() {
        settings.models.clone()
    } else {
        args.ids
    };
    if candidates.is_empty() {
        return Err(LauncherError::NoModelsAvailable);
    }

    let cursor = starting_cursor(&candidates, settings.model.as_deref());
    let Some(selection) = Select::new("Select model", candidates.clone())
        .with_starting_cursor(cursor)
        .with_page_size(10)
        .with_help_message("↑↓ to move, type to filter, ENTER to select, ESC to cancel")
        .prompt_skippable()?
    else {
        println!("No model selected.");
        return Ok(());
    };

    settings.set(SettingKey::Model, &selection);
    settings.models = candidates;
    store.save(&settings)?;
    println!("Selected model: {selection}");
    Ok(())
}

/// Index of the current model, or the first entry
fn starting_cursor(candidates: &[String], current: Option<&str>) -> usize {
    current
        .and_then(|current| candidates.iter().position(|id| id == current))
        .unwrap_or(0)
}
