//! Test fixtures shared by the unit tests.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_fixtures::{ScriptedRunner, create_home};
//!
//! #[test]
//! fn my_test() {
//!     let (temp, layout) = create_home();
//!     let runner = ScriptedRunner::new()
//!         .ok("npm config get prefix", "/usr/local\n")
//!         .fail("npm install -g", 1, "permission denied");
//! }
//! ```
//!
//! [`ScriptedRunner`] answers commands by prefix match on the command line
//! and records every invocation, so tests can assert on what was (and was
//! not) run without touching a real package manager.

use std::cell::RefCell;

use tempfile::TempDir;

use crate::error::{LauncherError, Result};
use crate::paths::InstallLayout;
use crate::process::{CommandOutput, CommandRunner, CommandSpec};

/// Create a temp directory in the system temp location.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// Create a temp directory acting as a home directory, with its layout.
#[must_use]
pub fn create_home() -> (TempDir, InstallLayout) {
    let temp = create_temp_dir();
    let layout = InstallLayout::under_home(temp.path());
    (temp, layout)
}

#[derive(Debug, Clone)]
enum Reply {
    Output(CommandOutput),
    TimedOut,
}

/// Fake [`CommandRunner`] answering from a script
///
/// Unscripted commands fail as if the program did not exist.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    replies: Vec<(String, Reply)>,
    calls: RefCell<Vec<CommandSpec>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands starting with `prefix` exit 0 with `stdout`
    #[must_use]
    pub fn ok(mut self, prefix: &str, stdout: &str) -> Self {
        self.replies.push((
            prefix.to_string(),
            Reply::Output(CommandOutput {
                code: Some(0),
                stdout: stdout.to_string(),
                stderr: String::new(),
            }),
        ));
        self
    }

    /// Commands starting with `prefix` exit with `code` and `stderr`
    #[must_use]
    pub fn fail(mut self, prefix: &str, code: i32, stderr: &str) -> Self {
        self.replies.push((
            prefix.to_string(),
            Reply::Output(CommandOutput {
                code: Some(code),
                stdout: String::new(),
                stderr: stderr.to_string(),
            }),
        ));
        self
    }

    /// Commands starting with `prefix` hit their timeout
    #[must_use]
    pub fn timeout(mut self, prefix: &str) -> Self {
        self.replies.push((prefix.to_string(), Reply::TimedOut));
        self
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.borrow().clone()
    }

    /// Whether any recorded command line starts with `prefix`
    pub fn ran(&self, prefix: &str) -> bool {
        self.calls
            .borrow()
            .iter()
            .any(|spec| spec.display().starts_with(prefix))
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        self.calls.borrow_mut().push(spec.clone());
        let line = spec.display();
        let reply = self
            .replies
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map(|(_, reply)| reply.clone());

        match reply {
            Some(Reply::Output(output)) => Ok(output),
            Some(Reply::TimedOut) => Err(LauncherError::CommandTimedOut {
                command: line,
                seconds: spec.timeout.as_secs(),
            }),
            None => Err(LauncherError::SpawnFailed {
                program: spec.program.clone(),
                reason: "No such file or directory (os error 2)".to_string(),
            }),
        }
    }
}
