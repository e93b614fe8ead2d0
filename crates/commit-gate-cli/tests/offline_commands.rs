// crates/commit-gate-cli/tests/offline_commands.rs
// ============================================================================
// Module: CLI Offline Command Tests
// Description: Integration tests for config, tags, and collision utilities.
// Purpose: Ensure admin utilities report verdicts and exit codes consistently.
// Dependencies: commit-gate-cli binary
// ============================================================================
//! ## Overview
//! Runs the offline subcommands of `svn-commit-gate` and checks stdout and
//! exit codes.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;

use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Config with one repository and one custom signature.
const CONFIG: &str = r#"
[collision]
builtin_signatures = false

[[collision.signatures]]
label = "abc"
algorithm = "sha1"
digest = "a9993e364706816aba3e25717850c26c9cd0d89d"

[[repositories]]
id = 1
name = "project"
path = "/srv/svn/project"
"#;

fn gate_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_svn-commit-gate"))
}

fn run(args: &[&str]) -> Output {
    Command::new(gate_bin()).args(args).output().expect("run svn-commit-gate")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn write_config(dir: &TempDir, content: &str) -> String {
    let path = dir.path().join("svn-commit-gate.toml");
    fs::write(&path, content).expect("write config");
    path.to_string_lossy().into_owned()
}

// ============================================================================
// SECTION: Config Validate
// ============================================================================

#[test]
fn config_validate_reports_summary() {
    let dir = TempDir::new().expect("temp dir");
    let config = write_config(&dir, CONFIG);
    let output = run(&["config", "validate", "--config", &config]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "config ok: 1 repositories, 1 collision signatures");
}

#[test]
fn config_validate_rejects_bad_digest() {
    let dir = TempDir::new().expect("temp dir");
    let config = write_config(
        &dir,
        "[[collision.signatures]]\nlabel = \"x\"\nalgorithm = \"sha256\"\ndigest = \"ab\"\n",
    );
    let output = run(&["config", "validate", "--config", &config]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid config"));
}

#[test]
fn config_validate_reports_unopenable_log_file() {
    let dir = TempDir::new().expect("temp dir");
    let log = dir.path().join("no-such-dir").join("gate.jsonl");
    let config = write_config(
        &dir,
        &format!("[logging]\nsink = \"file\"\npath = \"{}\"\n", log.display()),
    );
    let output = run(&["config", "validate", "--config", &config]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("config io error"));
}

// ============================================================================
// SECTION: Tags Check
// ============================================================================

#[test]
fn tags_check_prints_one_verdict_per_line() {
    let output = run(&[
        "tags",
        "check",
        "--paths",
        "tags",
        "--paths",
        "moduleA/tags/*",
        "--whitelist",
        "tags/allowed-dir",
        "A   tags/allowed-dir/v2/",
        "A   trunk/readme.txt",
        "U   moduleA/tags/v1/build.xml",
    ]);
    assert_eq!(output.status.code(), Some(1));
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "whitelisted  A   tags/allowed-dir/v2/  (tags/allowed-dir)",
            "allowed      A   trunk/readme.txt",
            "denied       U   moduleA/tags/v1/build.xml  (moduleA/tags/*)",
        ]
    );
}

#[test]
fn tags_check_passes_when_nothing_is_denied() {
    let output = run(&["tags", "check", "--paths", "tags/*", "A   tags/v3/"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "allowed      A   tags/v3/");
}

#[test]
fn tags_check_rejects_malformed_lines() {
    let output = run(&["tags", "check", "--paths", "tags", "Z   tags/v1/"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid changed path line"));
}

#[test]
fn tags_check_rejects_root_pattern() {
    let output = run(&["tags", "check", "--paths", "/", "A   tags/v1/"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid tag pattern"));
}

// ============================================================================
// SECTION: Collision Scan
// ============================================================================

#[test]
fn collision_scan_flags_matching_files() {
    let dir = TempDir::new().expect("temp dir");
    let config = write_config(&dir, CONFIG);
    let evil = dir.path().join("evil.bin");
    let plain = dir.path().join("plain.txt");
    fs::write(&evil, b"abc").expect("write evil");
    fs::write(&plain, b"hello").expect("write plain");

    let output = Command::new(gate_bin())
        .args(["collision", "scan", "--config", &config])
        .arg(&evil)
        .arg(&plain)
        .output()
        .expect("run svn-commit-gate");
    assert_eq!(output.status.code(), Some(1));
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("collision"));
    assert!(lines[0].contains("abc"));
    assert!(lines[1].starts_with("clean"));
}

#[test]
fn collision_scan_reports_missing_file() {
    let dir = TempDir::new().expect("temp dir");
    let config = write_config(&dir, CONFIG);
    let missing = dir.path().join("absent.bin");
    let output = Command::new(gate_bin())
        .args(["collision", "scan", "--config", &config])
        .arg(&missing)
        .output()
        .expect("run svn-commit-gate");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("can't read"));
}
