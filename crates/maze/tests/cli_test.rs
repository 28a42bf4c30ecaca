#![allow(deprecated)] // cargo_bin is deprecated in favour of cargo_bin_cmd!

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn maze(config_dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("maze").unwrap();
    cmd.env("MAZE_CONFIG_DIR", config_dir)
        .env_remove("MAZE_PROFILE")
        .env_remove("MAZE_URL");
    cmd
}

/// Help lists every subcommand
#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("maze").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("configure"))
        .stdout(predicate::str::contains("version"));
}

/// No subcommand prints help instead of doing anything
#[test]
fn test_cli_without_command() {
    let mut cmd = Command::cargo_bin("maze").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("maze").unwrap();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "maze {}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_plan_help() {
    let mut cmd = Command::cargo_bin("maze").unwrap();
    cmd.args(["plan", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--dir"))
        .stdout(predicate::str::contains("--profile"))
        .stdout(predicate::str::contains("--url"))
        .stdout(predicate::str::contains("--name"))
        .stdout(predicate::str::contains("--provider"))
        .stdout(predicate::str::contains("--image"));
}

#[test]
fn test_configure_add_then_list() {
    let config_dir = tempdir().unwrap();

    maze(config_dir.path())
        .arg("configure")
        .write_stdin("work\nsecret-token\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Profile data successfully saved for profile work",
        ));

    let document = fs::read_to_string(config_dir.path().join("profiles.json")).unwrap();
    assert!(document.contains("\"work\""));
    assert!(document.contains("\"secret-token\""));

    maze(config_dir.path())
        .args(["configure", "--list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile list:"))
        .stdout(predicate::str::contains(" - work"));
}

#[test]
fn test_configure_delete() {
    let config_dir = tempdir().unwrap();
    fs::write(
        config_dir.path().join("profiles.json"),
        r#"{"default":"a","old":"b"}"#,
    )
    .unwrap();

    maze(config_dir.path())
        .args(["configure", "-d"])
        .write_stdin("old\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile old successfully deleted"));

    let document = fs::read_to_string(config_dir.path().join("profiles.json")).unwrap();
    assert!(!document.contains("\"old\""));
    assert!(document.contains("\"default\""));
}

#[test]
fn test_configure_delete_missing_profile() {
    let config_dir = tempdir().unwrap();

    maze(config_dir.path())
        .args(["configure", "--delete"])
        .write_stdin("ghost\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("profile ghost not found"));
}

#[test]
fn test_configure_corrupt_document() {
    let config_dir = tempdir().unwrap();
    fs::write(config_dir.path().join("profiles.json"), "{not json").unwrap();

    maze(config_dir.path())
        .args(["configure", "--list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not parse profiles document"));
}

#[test]
fn test_plan_missing_profile() {
    let config_dir = tempdir().unwrap();
    let project = tempdir().unwrap();
    fs::write(project.path().join("main.tf"), "").unwrap();

    maze(config_dir.path())
        .args(["plan", "--provider", "aws", "-p", "staging", "-d"])
        .arg(project.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("profile staging not found"));

    assert!(!project.path().join("maze-output").exists());
}

#[test]
fn test_plan_invalid_provider_without_input() {
    let config_dir = tempdir().unwrap();
    let project = tempdir().unwrap();

    maze(config_dir.path())
        .args(["plan", "--provider", "oracle", "-d"])
        .arg(project.path())
        .write_stdin("")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Invalid provider 'oracle'"))
        .stderr(predicate::str::contains("invalid provider"));
}
