//! Install and uninstall against a fake npm in an isolated home

#![cfg(unix)]

mod common;

use common::TestEnv;
use predicates::prelude::*;

const GUARD_START: &str = "# >>> modelgate PATH >>>";

#[test]
fn test_install_user_prefix_updates_profile() {
    let env = TestEnv::new();
    env.install_fake_npm(0);

    env.cmd()
        .arg("install")
        .assert()
        .success()
        .stdout(predicate::str::contains("Installed modelgate 4.5.6 (user prefix)"))
        .stdout(predicate::str::contains("source"));

    let bashrc = env.read_file(&env.home.join(".bashrc"));
    assert!(bashrc.contains(GUARD_START));
    let bin = env.home.join(".npm-global/bin");
    assert!(bashrc.contains(&format!("export PATH=\"$PATH:{}\"", bin.display())));
}

#[test]
fn test_install_twice_keeps_single_guard_block() {
    let env = TestEnv::new();
    env.install_fake_npm(0);

    env.cmd().arg("install").assert().success();
    env.cmd().arg("install").assert().success();

    let bashrc = env.read_file(&env.home.join(".bashrc"));
    assert_eq!(bashrc.matches(GUARD_START).count(), 1);
}

#[test]
fn test_install_skip_path_update_leaves_profile_alone() {
    let env = TestEnv::new();
    env.install_fake_npm(0);

    env.cmd()
        .args(["install", "--skip-path-update"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Shell profile left unchanged"));
    assert!(!env.home.join(".bashrc").exists());
}

#[test]
fn test_install_failure_reports_npm_stderr() {
    let env = TestEnv::new();
    env.write_script(
        "npm",
        "case \"$1\" in\n  config) echo \"$HOME/.npm-global\" ;;\n  *) echo \"npm ERR! EACCES\" >&2; exit 1 ;;\nesac\n",
    );

    env.cmd()
        .arg("install")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Installation failed"))
        .stderr(predicate::str::contains("EACCES"));
}

#[test]
fn test_uninstall_fallback_removes_guard_block_and_settings() {
    let env = TestEnv::new();
    env.install_fake_npm(1);
    let bashrc = env.home.join(".bashrc");
    env.write_file(
        &bashrc,
        "alias ll='ls -l'\n# >>> modelgate PATH >>>\nexport PATH=\"$PATH:/somewhere/bin\"\n# <<< modelgate PATH <<<\n",
    );
    env.write_file(&env.config_dir.join("config.yaml"), "model: m1\n");

    env.cmd()
        .args(["uninstall", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("remove PATH entry: done"))
        .stdout(predicate::str::contains("remove configuration: done"));

    assert_eq!(env.read_file(&bashrc), "alias ll='ls -l'\n");
    assert!(!env.config_dir.exists());
}

#[test]
fn test_uninstall_global_success_skips_fallback() {
    let env = TestEnv::new();
    env.install_fake_npm(0);
    env.write_file(&env.config_dir.join("config.yaml"), "model: m1\n");

    env.cmd()
        .args(["uninstall", "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed the global modelgate package"));

    assert!(env.config_dir.join("config.yaml").exists());
}
