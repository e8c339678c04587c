//! Launching the assistant with gateway settings exported

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::process::{Command, ExitStatus};

use tracing::{debug, info};

use crate::config::Settings;
use crate::error::{LauncherError, Result};

pub const BASE_URL_VAR: &str = "ANTHROPIC_BASE_URL";
pub const AUTH_TOKEN_VAR: &str = "ANTHROPIC_AUTH_TOKEN";
pub const MODEL_VAR: &str = "ANTHROPIC_MODEL";
pub const SMALL_FAST_MODEL_VAR: &str = "ANTHROPIC_SMALL_FAST_MODEL";

/// Everything needed to start the assistant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub program: String,
    /// Added on top of the inherited environment
    pub env: BTreeMap<String, String>,
    pub args: Vec<OsString>,
}

/// Build a launch plan from settings and forwarded arguments.
///
/// A selected model is required; endpoint and key are exported only when set.
pub fn plan(settings: &Settings, args: Vec<OsString>) -> Result<LaunchPlan> {
    let model = settings
        .model
        .as_deref()
        .filter(|model| !model.is_empty())
        .ok_or(LauncherError::NoModelSelected)?;

    let mut env = BTreeMap::new();
    env.insert(MODEL_VAR.to_string(), model.to_string());
    env.insert(SMALL_FAST_MODEL_VAR.to_string(), model.to_string());
    if let Some(url) = &settings.base_url {
        env.insert(BASE_URL_VAR.to_string(), url.clone());
    }
    if let Some(key) = &settings.api_key {
        env.insert(AUTH_TOKEN_VAR.to_string(), key.clone());
    }

    Ok(LaunchPlan {
        program: settings.assistant().to_string(),
        env,
        args,
    })
}

/// Run the plan in the foreground and return the assistant's exit code
pub fn launch(plan: &LaunchPlan) -> Result<i32> {
    info!(program = %plan.program, args = plan.args.len(), "launching assistant");
    debug!(vars = ?plan.env.keys().collect::<Vec<_>>(), "exported environment");

    let status = Command::new(&plan.program)
        .args(&plan.args)
        .envs(&plan.env)
        .status()
        .map_err(|e| LauncherError::SpawnFailed {
            program: plan.program.clone(),
            reason: e.to_string(),
        })?;

    let code = exit_code(status);
    debug!(code, "assistant exited");
    Ok(code)
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
