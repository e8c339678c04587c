//! Config command: read and write settings

use console::Style;

use crate::cli::{ConfigArgs, ConfigSubcommand};
use crate::config::{ConfigStore, SettingKey};
use crate::error::Result;

pub fn run(args: ConfigArgs) -> Result<()> {
    let store = ConfigStore::open()?;

    match args.command.unwrap_or(ConfigSubcommand::List) {
        ConfigSubcommand::Get { key } => {
            if let Some(value) = store.get(&key)? {
                println!("{value}");
            }
        }
        ConfigSubcommand::Set { key, value } => {
            store.set(&key, &value)?;
            println!("Set {key}");
        }
        ConfigSubcommand::Unset { key } => {
            store.unset(&key)?;
            println!("Unset {key}");
        }
        ConfigSubcommand::List => {
            println!(
                "{} {}",
                Style::new().bold().apply_to("Settings file:"),
                store.path().display()
            );
            for (key, value) in store.list()? {
                println!("  {}", list_line(key, value.as_deref()));
            }
        }
    }
    Ok(())
}

fn list_line(key: SettingKey, value: Option<&str>) -> String {
    match value {
        Some(value) if key.is_secret() => format!("{key} = {}", mask(value)),
        Some(value) => format!("{key} = {value}"),
        None => format!("{key} = (not set)"),
    }
}

/// Keep the first four characters of a secret
fn mask(secret: &str) -> String {
    let shown: String = secret.chars().take(4).collect();
    format!("{shown}****")
}
