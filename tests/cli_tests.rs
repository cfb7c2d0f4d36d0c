//! Integration tests for the CLI

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("dochealth").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("publish health"))
        .stdout(predicate::str::contains("--output"));
}

#[test]
fn test_cli_fails_without_token() {
    let home = tempfile::tempdir().unwrap();
    let output = home.path().join("health.csv");

    let mut cmd = Command::cargo_bin("dochealth").unwrap();
    cmd.env_remove("READTHEDOCS_TOKEN")
        .env("HOME", home.path())
        .arg("--netrc")
        .arg(home.path().join(".netrc"))
        .arg("--output")
        .arg(&output);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No API token"));

    // no request was attempted and nothing was written
    assert!(!output.exists());
}

#[test]
fn test_cli_rejects_bad_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("dochealth.toml");
    std::fs::write(&config, "api_base = \"not a url\"\n").unwrap();

    let mut cmd = Command::cargo_bin("dochealth").unwrap();
    cmd.arg("--config").arg(&config);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
#[ignore] // Requires network access and a real token
fn test_cli_live_run() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("health.csv");

    let mut cmd = Command::cargo_bin("dochealth").unwrap();
    cmd.arg("--output").arg(&output);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("projects"));
    assert!(output.exists());
}
