//! Filesystem locations used by install, uninstall and configuration
//!
//! All locations are gathered into an [`InstallLayout`] value so the
//! self-install code never reaches for ambient directories on its own and
//! tests can root everything in a temp directory.

use std::path::{Path, PathBuf};

use crate::error::{LauncherError, Result};

/// Application name: config subdirectory, private root name and binary name
pub const APP_NAME: &str = "modelgate";

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "MODELGATE_CONFIG_DIR";

/// User-owned npm prefix configured by the user-prefix strategy, relative to home
const USER_PREFIX_DIR: &str = ".npm-global";

/// Entry script of the published package, relative to an npm `--prefix` root
pub const ENTRY_SCRIPT: &str = "node_modules/modelgate/bin/modelgate.js";

/// Well-known system binary locations left behind by older installs
const STALE_LINK_DIRS: &[&str] = &["/usr/local/bin", "/usr/bin", "/opt/homebrew/bin"];

/// Get the configuration directory path
///
/// Uses the platform's standard config location with a `modelgate`
/// subdirectory. Can be overridden with the `MODELGATE_CONFIG_DIR` environment variable.
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    let base = dirs::config_dir().ok_or(LauncherError::HomeDirNotFound)?;
    Ok(base.join(APP_NAME))
}

/// npm `--prefix` root under `data_dir`, kept apart from the settings.
///
/// On macOS the data and config directories are both
/// `~/Library/Application Support`, so the root gets its own subdirectory.
fn private_root_in(data_dir: &Path, config_dir: &Path) -> PathBuf {
    let root = data_dir.join(APP_NAME);
    if root.starts_with(config_dir) || config_dir.starts_with(&root) {
        root.join("npm")
    } else {
        root
    }
}

/// Every location the installer and uninstaller touch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    pub home: PathBuf,
    /// npm prefix configured by the user-prefix strategy
    pub user_prefix: PathBuf,
    /// npm `--prefix` root for the manual strategy
    pub private_root: PathBuf,
    /// Directory holding the manual strategy's symlink
    pub private_bin: PathBuf,
    pub config_dir: PathBuf,
    pub stale_link_candidates: Vec<PathBuf>,
}

impl InstallLayout {
    /// Resolve the layout for the current user
    pub fn detect() -> Result<Self> {
        let home = dirs::home_dir().ok_or(LauncherError::HomeDirNotFound)?;
        let data_dir = dirs::data_local_dir().unwrap_or_else(|| home.join(".local/share"));
        let bin_dir = dirs::executable_dir().unwrap_or_else(|| home.join(".local/bin"));
        let config_dir = config_dir()?;

        Ok(Self {
            private_root: private_root_in(&data_dir, &config_dir),
            private_bin: bin_dir,
            config_dir,
            stale_link_candidates: STALE_LINK_DIRS
                .iter()
                .map(|dir| Path::new(dir).join(APP_NAME))
                .collect(),
            ..Self::under_home(&home)
        })
    }

    /// Layout rooted entirely under `home`, with no system locations
    pub fn under_home(home: &Path) -> Self {
        Self {
            home: home.to_path_buf(),
            user_prefix: home.join(USER_PREFIX_DIR),
            private_root: home.join(".local/share").join(APP_NAME),
            private_bin: home.join(".local/bin"),
            config_dir: home.join(".config").join(APP_NAME),
            stale_link_candidates: Vec::new(),
        }
    }

    /// Package directory created by the manual strategy
    pub fn private_package_dir(&self) -> PathBuf {
        self.private_root.join("node_modules").join(APP_NAME)
    }

    pub fn entry_script(&self) -> PathBuf {
        self.private_root.join(ENTRY_SCRIPT)
    }

    /// Symlink created by the manual strategy
    pub fn private_link(&self) -> PathBuf {
        self.private_bin.join(APP_NAME)
    }
}
