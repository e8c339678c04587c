//! Common test utilities for modelgate integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Isolated home, config directory and PATH for one test
pub struct TestEnv {
    /// Temporary directory
    pub temp: TempDir,
    pub home: PathBuf,
    pub config_dir: PathBuf,
    /// Directory placed first on the child's PATH
    pub bin: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let home = temp.path().join("home");
        let config_dir = temp.path().join("config");
        let bin = temp.path().join("fakebin");
        std::fs::create_dir_all(&home).expect("Failed to create home directory");
        std::fs::create_dir_all(&bin).expect("Failed to create bin directory");
        Self {
            temp,
            home,
            config_dir,
            bin,
        }
    }

    /// The modelgate binary, confined to this environment
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("modelgate").expect("modelgate binary not built");
        cmd.env("HOME", &self.home)
            .env("MODELGATE_CONFIG_DIR", &self.config_dir)
            .env("SHELL", "/bin/bash")
            .env("PATH", self.path_var())
            .env_remove("RUST_LOG")
            .env_remove("XDG_CONFIG_HOME")
            .env_remove("XDG_DATA_HOME")
            .env_remove("XDG_BIN_HOME")
            .env_remove("ZDOTDIR");
        cmd
    }

    /// Fake bin directory followed by the system directories the fakes need
    pub fn path_var(&self) -> String {
        format!("{}:/usr/bin:/bin", self.bin.display())
    }

    /// Write an executable shell script into the fake bin directory
    #[cfg(unix)]
    pub fn write_script(&self, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.bin.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}")).expect("Failed to write script");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to make script executable");
        path
    }

    /// Fake npm that installs a stub `modelgate` into `~/.npm-global`.
    /// `uninstall -g` exits with `uninstall_code`.
    #[cfg(unix)]
    pub fn install_fake_npm(&self, uninstall_code: i32) {
        let body = format!(
            r#"PREFIX="$HOME/.npm-global"
case "$1 $2" in
  "config get") echo "$PREFIX" ;;
  "config set") exit 0 ;;
  "prefix -g") echo "$PREFIX" ;;
  "root -g") echo "$PREFIX/lib/node_modules" ;;
  "install -g")
    mkdir -p "$PREFIX/bin"
    printf '#!/bin/sh\necho 4.5.6\n' > "$PREFIX/bin/modelgate"
    chmod +x "$PREFIX/bin/modelgate"
    ;;
  "uninstall -g") echo "npm ERR! uninstall refused" >&2; exit {uninstall_code} ;;
  *) echo "unexpected npm call: $*" >&2; exit 1 ;;
esac
"#
        );
        self.write_script("npm", &body);
    }

    pub fn write_file(&self, path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    pub fn read_file(&self, path: &Path) -> String {
        std::fs::read_to_string(path).expect("Failed to read file")
    }
}
