//! Error types and handling for modelgate
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//! The self-install core converts these into the `error` strings of its result
//! records; the CLI layer prints them directly.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for modelgate operations
#[derive(Error, Diagnostic, Debug)]
pub enum LauncherError {
    // Subprocess errors
    #[error("Failed to run '{program}': {reason}")]
    #[diagnostic(
        code(modelgate::process::spawn_failed),
        help("Check that the program is installed and on your PATH")
    )]
    SpawnFailed { program: String, reason: String },

    #[error("Command timed out after {seconds}s: {command}")]
    #[diagnostic(code(modelgate::process::timed_out))]
    CommandTimedOut { command: String, seconds: u64 },

    // Package manager errors
    #[error("'{command}' failed: {reason}")]
    #[diagnostic(
        code(modelgate::npm::command_failed),
        help("Re-run with --verbose to see the full npm output")
    )]
    PackageManagerFailed { command: String, reason: String },

    #[error("npm reported an unusable {what}: '{value}'")]
    #[diagnostic(code(modelgate::npm::bad_output))]
    PackageManagerOutput { what: String, value: String },

    // Install errors
    #[error("Entry script not found after install: {path}")]
    #[diagnostic(
        code(modelgate::install::entry_missing),
        help("The published package layout may have changed; try 'modelgate install --force'")
    )]
    EntryScriptNotFound { path: String },

    #[error("Installation failed: {message}")]
    #[diagnostic(code(modelgate::install::failed))]
    InstallFailed { message: String },

    #[error("Verification failed: {message}")]
    #[diagnostic(
        code(modelgate::install::verify_failed),
        help("Run 'modelgate install' and open a new shell")
    )]
    VerifyFailed { message: String },

    #[error("Uninstall failed: {message}")]
    #[diagnostic(code(modelgate::uninstall::failed))]
    UninstallFailed { message: String },

    #[error("Could not determine home directory")]
    #[diagnostic(
        code(modelgate::paths::no_home),
        help("Set the HOME environment variable")
    )]
    HomeDirNotFound,

    #[error("Symbolic links are not supported on this platform")]
    #[diagnostic(code(modelgate::install::unsupported_platform))]
    UnsupportedPlatform,

    // Configuration errors
    #[error("Failed to parse configuration file: {path}")]
    #[diagnostic(code(modelgate::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Unknown setting: {key}")]
    #[diagnostic(
        code(modelgate::config::unknown_key),
        help("Known settings: model, base_url, api_key, assistant, models")
    )]
    UnknownSetting { key: String },

    #[error("No model selected")]
    #[diagnostic(
        code(modelgate::config::no_model),
        help("Run 'modelgate model' to choose one, or 'modelgate model --set <id>'")
    )]
    NoModelSelected,

    #[error("No models available to choose from")]
    #[diagnostic(
        code(modelgate::config::no_models),
        help("Pass model ids on the command line or run 'modelgate config set models a,b,c'")
    )]
    NoModelsAvailable,

    // File system errors
    #[error("Failed to read file: {path}")]
    #[diagnostic(code(modelgate::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}")]
    #[diagnostic(code(modelgate::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(modelgate::fs::io_error))]
    IoError { message: String },

    // CLI errors
    #[error("Unknown shell: {shell}")]
    #[diagnostic(
        code(modelgate::cli::unknown_shell),
        help("Supported shells: bash, elvish, fish, powershell, zsh")
    )]
    UnknownShell { shell: String },
}

impl From<std::io::Error> for LauncherError {
    fn from(err: std::io::Error) -> Self {
        LauncherError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for LauncherError {
    fn from(err: serde_yaml::Error) -> Self {
        LauncherError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for LauncherError {
    fn from(err: inquire::InquireError) -> Self {
        LauncherError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, LauncherError>;
