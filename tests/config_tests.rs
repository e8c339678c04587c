//! Settings and model selection through the CLI

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_config_round_trip() {
    let env = TestEnv::new();

    env.cmd()
        .args(["config", "set", "base_url", "https://gateway.example/v1"])
        .assert()
        .success();

    env.cmd()
        .args(["config", "get", "base_url"])
        .assert()
        .success()
        .stdout(predicate::str::diff("https://gateway.example/v1\n"));

    let yaml = env.read_file(&env.config_dir.join("config.yaml"));
    assert!(yaml.contains("base_url: https://gateway.example/v1"));

    env.cmd()
        .args(["config", "unset", "base_url"])
        .assert()
        .success();

    env.cmd()
        .args(["config", "get", "base_url"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_config_unknown_key() {
    let env = TestEnv::new();
    env.cmd()
        .args(["config", "set", "colour", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown setting: colour"))
        .stderr(predicate::str::contains("help:"));
    assert!(!env.config_dir.join("config.yaml").exists());
}

#[test]
fn test_config_list_masks_api_key() {
    let env = TestEnv::new();
    env.cmd()
        .args(["config", "set", "api_key", "sk-secret-value"])
        .assert()
        .success();

    env.cmd()
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("api_key = sk-s****"))
        .stdout(predicate::str::contains("secret-value").not())
        .stdout(predicate::str::contains("assistant = claude"))
        .stdout(predicate::str::contains("model = (not set)"));
}

#[test]
fn test_model_set_persists() {
    let env = TestEnv::new();
    env.cmd()
        .args(["model", "--set", "gateway-large"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Selected model: gateway-large"));

    env.cmd()
        .args(["config", "get", "model"])
        .assert()
        .success()
        .stdout(predicate::str::diff("gateway-large\n"));
}

#[test]
fn test_model_without_catalog_fails() {
    let env = TestEnv::new();
    env.cmd()
        .arg("model")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No models available"));
}

#[test]
fn test_malformed_config_is_reported() {
    let env = TestEnv::new();
    env.write_file(&env.config_dir.join("config.yaml"), "model: [unclosed");

    env.cmd()
        .args(["config", "get", "model"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse configuration file"));
}
