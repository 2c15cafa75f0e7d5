// Smoke tests for the `dirbook` binary surface.

use assert_cmd::Command;
use predicates::prelude::*;

fn dirbook() -> Command {
    Command::cargo_bin("dirbook").expect("binary builds")
}

#[test]
fn test_help_lists_commands() {
    dirbook()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("contacts"))
        .stdout(predicate::str::contains("groups"))
        .stdout(predicate::str::contains("visibility"))
        .stdout(predicate::str::contains("stats"));
}

#[test]
fn test_version_flag() {
    dirbook()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("dirbook"));
}

#[test]
fn test_no_arguments_shows_usage() {
    dirbook()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_unknown_subcommand_rejected() {
    dirbook().arg("frobnicate").assert().failure();
}

#[test]
fn test_config_path_runs_without_directory() {
    dirbook()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_completions_generate() {
    dirbook()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dirbook"));
}

#[test]
fn test_update_requires_a_field_flag() {
    // Validation fires before any profile/connection resolution would matter
    // only if a profile exists; without config the profile error comes first.
    // Either way the command must fail cleanly.
    dirbook().args(["contacts", "update"]).assert().failure();
}
