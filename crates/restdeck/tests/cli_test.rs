//! Integration tests for the `restdeck` binary.
//!
//! Covers argument parsing, help output, shell completions, dashboard
//! file handling, and error paths. No test touches the network: fetch
//! failures use a closed local port.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

/// A URL that refuses connections immediately (nothing listens on the
/// discard port).
const DEAD_URL: &str = "http://127.0.0.1:9/metrics";

// ── Helpers ──────────────────────────────────────────────────────────

/// Build a command for the `restdeck` binary with the environment
/// isolated from the developer's real dashboard and variables.
fn restdeck_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("restdeck");
    cmd.env("HOME", "/tmp/restdeck-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/restdeck-cli-test-nonexistent")
        .env_remove("RESTDECK_CONFIG")
        .env_remove("RESTDECK_OUTPUT")
        .env_remove("RESTDECK_TIMEOUT")
        .env_remove("RESTDECK_PROXY")
        .env_remove("RESTDECK_INSECURE")
        .env_remove("NO_COLOR");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

// ── Help and version ─────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = restdeck_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_lists_commands() {
    let output = restdeck_cmd().arg("--help").output().unwrap();
    assert!(output.status.success());

    let text = combined_output(&output);
    for command in ["probe", "get", "watch", "config", "completions"] {
        assert!(text.contains(command), "help should mention `{command}`");
    }
}

#[test]
fn test_version_flag() {
    restdeck_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("restdeck"));
}

#[test]
fn test_probe_help_lists_probe_flags() {
    let output = restdeck_cmd().args(["probe", "--help"]).output().unwrap();
    assert!(output.status.success());

    let text = combined_output(&output);
    assert!(text.contains("--depth"));
    assert!(text.contains("--show-data"));
    assert!(text.contains("--header"));
}

// ── Completions ──────────────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    restdeck_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("restdeck"));
}

#[test]
fn test_completions_zsh() {
    restdeck_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_fish() {
    restdeck_cmd()
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::contains("complete"));
}

// ── Argument validation ──────────────────────────────────────────────

#[test]
fn test_unknown_subcommand_fails() {
    restdeck_cmd().arg("frobnicate").assert().failure();
}

#[test]
fn test_invalid_output_format_fails() {
    restdeck_cmd()
        .args(["--output", "bogus", "config", "path"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_get_requires_a_field() {
    restdeck_cmd()
        .args(["get", DEAD_URL])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--field"));
}

#[test]
fn test_get_rejects_a_malformed_header() {
    restdeck_cmd()
        .args(["get", DEAD_URL, "-f", "title", "-H", "NoColonHere"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Name: value"));
}

// ── Fetch failures ───────────────────────────────────────────────────

#[test]
fn test_probe_unreachable_endpoint_exits_with_fetch_code() {
    restdeck_cmd()
        .args(["probe", DEAD_URL])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Could not fetch"));
}

#[test]
fn test_get_unreachable_endpoint_exits_with_fetch_code() {
    restdeck_cmd()
        .args(["get", DEAD_URL, "-f", "value"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Could not fetch"));
}

// ── Dashboard file handling ──────────────────────────────────────────

#[test]
fn test_config_path_prints_the_resolved_path() {
    restdeck_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dashboard.toml"));
}

#[test]
fn test_config_show_without_a_file_uses_defaults() {
    restdeck_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(no widgets)"));
}

#[test]
fn test_config_init_writes_a_sample_dashboard() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("dashboard.toml");
    let path_arg = path.to_str().unwrap();

    restdeck_cmd()
        .args(["--config", path_arg, "config", "init"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Dashboard written"));
    assert!(path.exists());

    restdeck_cmd()
        .args(["--config", path_arg, "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("My dashboard"))
        .stdout(predicate::str::contains("Open todos"));
}

#[test]
fn test_config_init_refuses_to_overwrite_without_force() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dashboard.toml");
    let path_arg = path.to_str().unwrap();

    restdeck_cmd().args(["--config", path_arg, "config", "init"]).assert().success();

    restdeck_cmd()
        .args(["--config", path_arg, "config", "init"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("already exists"));

    restdeck_cmd()
        .args(["--config", path_arg, "config", "init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_watch_fails_when_no_widgets_are_configured() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dashboard.toml");
    std::fs::write(&path, "[dashboard]\ntitle = \"empty\"\n").unwrap();

    restdeck_cmd()
        .args(["--config", path.to_str().unwrap(), "watch"])
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("No widgets"));
}

#[test]
fn test_watch_rejects_an_invalid_widget_entry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dashboard.toml");
    std::fs::write(
        &path,
        "[[widgets]]\n\
         name = \"Broken\"\n\
         kind = \"table\"\n\
         url = \"https://example.com/data\"\n\
         refresh_secs = 0\n",
    )
    .unwrap();

    restdeck_cmd()
        .args(["--config", path.to_str().unwrap(), "watch"])
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("refresh_secs"));
}

#[test]
fn test_malformed_toml_fails_with_config_code() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dashboard.toml");
    std::fs::write(&path, "widgets = not toml ===\n").unwrap();

    restdeck_cmd()
        .args(["--config", path.to_str().unwrap(), "get", DEAD_URL, "-f", "x"])
        .assert()
        .failure()
        .code(4);
}

#[test]
fn test_explicit_config_must_exist() {
    restdeck_cmd()
        .args(["--config", "/tmp/restdeck-cli-test-nonexistent/nope.toml", "config", "show"])
        .assert()
        .failure()
        .code(4);
}

// ── Environment variables ────────────────────────────────────────────

#[test]
fn test_output_env_var_selects_the_format() {
    restdeck_cmd()
        .env("RESTDECK_OUTPUT", "json")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"widgets\""));
}
