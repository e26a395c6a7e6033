//! Integration tests for the `slots` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the resolve,
//! parse, and zone subcommands through the actual binary. Every run is
//! offline or keyless, so nothing reaches the network.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn sample_request() -> String {
    std::fs::read_to_string(fixture("sample_request.json"))
        .expect("sample_request.json fixture must exist")
}

/// The binary with no API key and no user config file in reach.
fn slots() -> Command {
    let mut cmd = Command::cargo_bin("slots").unwrap();
    cmd.env_remove("ANTHROPIC_API_KEY")
        .env_remove("SLOTS_ANTHROPIC_API_KEY")
        .env_remove("RUST_LOG")
        // The fixtures directory has no `slots/config.toml`.
        .env("XDG_CONFIG_HOME", concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures"));
    cmd
}

fn start_times(output: &[u8]) -> Vec<String> {
    let value: Value = serde_json::from_slice(output).expect("stdout must be JSON");
    value["best_meeting_times"]
        .as_array()
        .expect("best_meeting_times must be an array")
        .iter()
        .map(|m| format!("{} {}", m["date"].as_str().unwrap(), m["start_time"].as_str().unwrap()))
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Resolve subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn resolve_stdin_to_stdout() {
    let output = slots()
        .args(["resolve", "--offline"])
        .write_stdin(sample_request())
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        start_times(&output.stdout),
        vec!["2025-03-04 10:00", "2025-03-04 10:30", "2025-03-05 10:00"]
    );
}

#[test]
fn resolve_output_shape() {
    let output = slots()
        .args(["resolve", "--offline", "-i", &fixture("sample_request.json")])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["meeting_duration_minutes"], 60);
    assert_eq!(value["timezone"], "UTC");
    assert!(value.get("analysis_notes").is_none());
    for meeting in value["best_meeting_times"].as_array().unwrap() {
        assert_eq!(meeting["attendees"], 3);
        assert_eq!(meeting["timezone"], "UTC");
    }
}

#[test]
fn resolve_file_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("result.json");

    slots()
        .args(["resolve", "--offline", "-i", &fixture("sample_request.json"), "-o"])
        .arg(&output_path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let content = std::fs::read_to_string(&output_path).expect("output file must exist");
    assert!(content.contains("best_meeting_times"));
}

#[test]
fn resolve_top_flag_limits_results() {
    let output = slots()
        .args(["resolve", "--offline", "--top", "5"])
        .write_stdin(sample_request())
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(start_times(&output.stdout).len(), 5);
}

#[test]
fn resolve_granularity_flag_changes_grid() {
    let output = slots()
        .args(["resolve", "--offline", "--top", "50", "--granularity", "60"])
        .write_stdin(sample_request())
        .output()
        .unwrap();

    assert!(output.status.success());
    let times = start_times(&output.stdout);
    // Every shared interval starts on a half hour, so hourly steps stay there.
    assert!(times.contains(&"2025-03-04 10:30".to_string()));
    assert!(!times.iter().any(|t| t.ends_with(":00")));
}

#[test]
fn resolve_without_api_key_still_works() {
    slots()
        .arg("resolve")
        .write_stdin(sample_request())
        .assert()
        .success()
        .stdout(predicate::str::contains("best_meeting_times"))
        .stderr(predicate::str::contains("no Anthropic API key"));
}

#[test]
fn resolve_invalid_json_fails() {
    slots()
        .args(["resolve", "--offline"])
        .write_stdin("this is not valid json {{{")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read meeting request"));
}

#[test]
fn resolve_inverted_range_fails() {
    slots()
        .args(["resolve", "--offline", "-i", &fixture("invalid_range.json")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("before start"));
}

#[test]
fn resolve_missing_input_file_fails() {
    slots()
        .args(["resolve", "--offline", "-i", "/nonexistent/request.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn resolve_reads_config_file() {
    let mut config_file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(config_file, "[resolver]\ntop_n = 1").unwrap();
    let config_path = config_file.path();

    let output = slots()
        .args(["resolve", "--offline", "--config"])
        .arg(config_path)
        .write_stdin(sample_request())
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(start_times(&output.stdout), vec!["2025-03-04 10:00"]);
}

#[test]
fn resolve_rejects_zero_top() {
    slots()
        .args(["resolve", "--offline", "--top", "0"])
        .write_stdin(sample_request())
        .assert()
        .failure()
        .stderr(predicate::str::contains("top_n must be positive"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Parse and zone subcommands
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn parse_prints_intervals() {
    let output = slots()
        .args(["parse", "Mondays and Tuesdays between 8 am to 3 pm"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        value,
        serde_json::json!([
            {"day": 0, "start": [8, 0], "end": [15, 0]},
            {"day": 1, "start": [8, 0], "end": [15, 0]}
        ])
    );
}

#[test]
fn parse_unrecognised_text_prints_empty_list() {
    slots()
        .args(["parse", "whenever"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[]"));
}

#[test]
fn zone_resolves_alias() {
    slots()
        .args(["zone", "IST"])
        .assert()
        .success()
        .stdout("Asia/Kolkata\n");
}

#[test]
fn zone_unknown_warns_and_prints_utc() {
    slots()
        .args(["zone", "Nowhere/Land"])
        .assert()
        .success()
        .stdout("UTC\n")
        .stderr(predicate::str::contains("Unknown timezone 'Nowhere/Land'"));
}

// ─────────────────────────────────────────────────────────────────────────────
// General
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn help_flag_shows_usage() {
    slots()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("resolve"))
        .stdout(predicate::str::contains("parse"))
        .stdout(predicate::str::contains("zone"));
}

#[test]
fn unknown_subcommand_fails() {
    slots().arg("schedule").assert().failure();
}
