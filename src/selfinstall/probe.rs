//! Environment probing: npm prefix, prefix ownership, live writability, shell

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::npm::Npm;
use crate::paths::InstallLayout;
use crate::process::CommandRunner;

/// Path fragments of prefixes that belong to a user even outside `$HOME`
/// (version managers and conventional user-local prefixes).
const USER_PREFIX_MARKERS: &[&str] = &[
    "/.npm-global",
    "/.nvm/",
    "/.volta/",
    "/.fnm/",
    "/.asdf/",
    "/.local/",
];

/// Prefix of the marker file created by the writability probe
const WRITE_PROBE_PREFIX: &str = ".modelgate-write-probe-";

/// Snapshot of the environment variables the installer reads
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostEnv {
    /// `SHELL`
    pub shell: Option<String>,
    /// `PATH`
    pub path: Option<OsString>,
    /// `ZDOTDIR`
    pub zdotdir: Option<PathBuf>,
    /// `XDG_CONFIG_HOME`
    pub xdg_config_home: Option<PathBuf>,
}

impl HostEnv {
    pub fn from_process() -> Self {
        Self {
            shell: std::env::var("SHELL").ok(),
            path: std::env::var_os("PATH"),
            zdotdir: non_empty_path("ZDOTDIR"),
            xdg_config_home: non_empty_path("XDG_CONFIG_HOME"),
        }
    }
}

fn non_empty_path(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellKind {
    Bash,
    Zsh,
    Fish,
    Unknown,
}

impl ShellKind {
    /// Classify a shell from its executable path, e.g. `/usr/bin/zsh`
    pub fn from_shell_path(shell: &str) -> Self {
        let name = Path::new(shell.trim())
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        match name {
            "bash" => ShellKind::Bash,
            "zsh" => ShellKind::Zsh,
            "fish" => ShellKind::Fish,
            _ => ShellKind::Unknown,
        }
    }

    /// Whether PATH lines use fish syntax rather than POSIX `export`
    pub fn is_fish(self) -> bool {
        self == ShellKind::Fish
    }
}

impl fmt::Display for ShellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShellKind::Bash => "bash",
            ShellKind::Zsh => "zsh",
            ShellKind::Fish => "fish",
            ShellKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Detected shell and the startup file modelgate edits for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellInfo {
    pub kind: ShellKind,
    pub profile: PathBuf,
}

impl ShellInfo {
    /// Detect the user's shell and its startup file.
    ///
    /// Unrecognised shells get the bash convention.
    pub fn detect(env: &HostEnv, home: &Path) -> Self {
        let kind = env
            .shell
            .as_deref()
            .map_or(ShellKind::Unknown, ShellKind::from_shell_path);

        let profile = match kind {
            ShellKind::Zsh => env
                .zdotdir
                .clone()
                .unwrap_or_else(|| home.to_path_buf())
                .join(".zshrc"),
            ShellKind::Fish => env
                .xdg_config_home
                .clone()
                .filter(|dir| dir.is_absolute())
                .unwrap_or_else(|| home.join(".config"))
                .join("fish")
                .join("config.fish"),
            ShellKind::Bash | ShellKind::Unknown => bash_profile(home),
        };

        Self { kind, profile }
    }
}

/// `~/.bash_profile` when it exists, `~/.bashrc` otherwise
fn bash_profile(home: &Path) -> PathBuf {
    let profile = home.join(".bash_profile");
    if profile.exists() {
        profile
    } else {
        home.join(".bashrc")
    }
}

/// What the installer learned about the machine. Recomputed on every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    /// npm's configured prefix, `None` when the query failed
    pub prefix: Option<PathBuf>,
    pub prefix_is_user_owned: bool,
    /// Result of the live write test in the prefix's `bin` directory
    pub bin_dir_writable: bool,
    pub shell: ShellInfo,
}

/// Binary directory of an npm prefix
pub fn prefix_bin_dir(prefix: &Path) -> PathBuf {
    prefix.join("bin")
}

/// Probe npm and the filesystem.
///
/// A failed or timed-out prefix query is not fatal: the prefix is reported
/// as unknown, which classifies as neither user-owned nor writable.
pub fn probe(runner: &dyn CommandRunner, env: &HostEnv, layout: &InstallLayout) -> ProbeResult {
    let prefix = match Npm::new(runner).configured_prefix() {
        Ok(prefix) => Some(prefix),
        Err(e) => {
            warn!(error = %e, "could not query npm prefix");
            None
        }
    };

    let prefix_is_user_owned = prefix
        .as_deref()
        .is_some_and(|prefix| is_user_owned(prefix, &layout.home));
    let bin_dir_writable = prefix
        .as_deref()
        .is_some_and(|prefix| is_dir_writable(&prefix_bin_dir(prefix)));
    let shell = ShellInfo::detect(env, &layout.home);

    let result = ProbeResult {
        prefix,
        prefix_is_user_owned,
        bin_dir_writable,
        shell,
    };
    debug!(?result, "probe finished");
    result
}

/// Whether an npm prefix belongs to the user: under `home` or a known user-local convention
pub fn is_user_owned(prefix: &Path, home: &Path) -> bool {
    if !home.as_os_str().is_empty() && prefix.starts_with(home) {
        return true;
    }
    let text = prefix.to_string_lossy();
    USER_PREFIX_MARKERS
        .iter()
        .any(|marker| text.contains(marker) || text.ends_with(marker.trim_end_matches('/')))
}

/// Live write test: create and immediately delete a uniquely named file in `dir`.
///
/// Unlike mode bits this honours ACLs, read-only mounts and ownership.
/// The marker is removed when the temp file handle drops, on every path.
pub fn is_dir_writable(dir: &Path) -> bool {
    match tempfile::Builder::new()
        .prefix(WRITE_PROBE_PREFIX)
        .tempfile_in(dir)
    {
        Ok(marker) => {
            if let Err(e) = marker.close() {
                warn!(dir = %dir.display(), error = %e, "could not remove write probe marker");
            }
            true
        }
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "directory is not writable");
            false
        }
    }
}
