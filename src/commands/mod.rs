//! Command implementations for the modelgate CLI
//!
//! Each command is a thin wrapper that prints results; the work happens in
//! `selfinstall`, `config` and `launcher`.

pub mod clean_links;
pub mod completions;
pub mod config;
mod helpers;
pub mod install;
pub mod launch;
pub mod model;
pub mod uninstall;
pub mod verify;
pub mod version;
