//! Argument-parsing smoke tests for the boltab binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("boltab").unwrap()
}

#[test]
fn test_help_lists_subcommands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("process"))
        .stdout(predicate::str::contains("combine"))
        .stdout(predicate::str::contains("reconcile"))
        .stdout(predicate::str::contains("parse"));
}

#[test]
fn test_version_flag() {
    cmd().arg("--version").assert().success();
}

#[test]
fn test_unknown_subcommand_fails() {
    cmd().arg("frobnicate").assert().failure();
}

#[test]
fn test_process_requires_workspace_arg() {
    cmd().arg("process").assert().failure();
}

#[test]
fn test_invalid_format_value() {
    cmd()
        .args(["parse", "page.txt", "--format", "yaml"])
        .assert()
        .failure();
}
