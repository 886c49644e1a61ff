use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use std::process::Command;

// Network-backed subcommands are exercised in the store and agent
// suites; these smoke tests cover argument parsing only.

#[test]
fn test_cli_help_lists_subcommands() {
  Command::cargo_bin("deck")
    .expect("binary exists")
    .arg("--help")
    .assert()
    .success()
    .stdout(contains("add").and(contains("list")).and(contains("send")).and(contains("logs")));
}

#[test]
fn test_cli_version_matches_package() {
  Command::cargo_bin("deck")
    .expect("binary exists")
    .arg("--version")
    .assert()
    .success()
    .stdout(contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_rejects_unknown_subcommand() {
  Command::cargo_bin("deck").expect("binary exists").arg("shuffle").assert().failure();
}

#[test]
fn test_server_help_shows_bind_flag() {
  Command::cargo_bin("deck_server")
    .expect("binary exists")
    .arg("--help")
    .assert()
    .success()
    .stdout(contains("--bind"));
}
