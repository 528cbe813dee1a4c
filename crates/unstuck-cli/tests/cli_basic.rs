//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data directory,
//! so every invocation is a fresh process over persisted state.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_unstuck"))
        .args(args)
        .env("UNSTUCK_DATA_DIR", data_dir)
        .env("UNSTUCK_LOG", "off")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_ok(data_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    stdout
}

fn list_texts(data_dir: &Path) -> Vec<String> {
    let json = run_ok(data_dir, &["list", "--json"]);
    let tasks: serde_json::Value = serde_json::from_str(&json).unwrap();
    tasks
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["text"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_add_and_list() {
    let dir = TempDir::new().unwrap();
    let out = run_ok(dir.path(), &["add", "write report"]);
    assert!(out.contains("Task queued: write report"));
    run_ok(dir.path(), &["add", "call bank"]);
    assert_eq!(list_texts(dir.path()), vec!["write report", "call bank"]);
}

#[test]
fn test_add_rejects_blank_text() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["add", "   "]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
    assert!(list_texts(dir.path()).is_empty());
}

#[test]
fn test_add_clean_fixes_typos() {
    let dir = TempDir::new().unwrap();
    run_ok(dir.path(), &["add", "--clean", "call teh dentist tmrw"]);
    assert_eq!(list_texts(dir.path()), vec!["Call the dentist tomorrow"]);
}

#[test]
fn test_reveal_done_and_summary() {
    let dir = TempDir::new().unwrap();
    run_ok(dir.path(), &["add", "A"]);
    run_ok(dir.path(), &["add", "B"]);

    assert!(run_ok(dir.path(), &["reveal"]).starts_with("A"));
    assert!(run_ok(dir.path(), &["done"]).contains("(1 completed)"));

    let json = run_ok(dir.path(), &["summary", "--json"]);
    let summary: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(summary["total_completed"], 1);
    assert_eq!(summary["completed_today"][0]["text"], "A");
    assert_eq!(summary["remaining"][0]["text"], "B");
}

#[test]
fn test_later_swaps_two_tasks() {
    let dir = TempDir::new().unwrap();
    run_ok(dir.path(), &["add", "A"]);
    run_ok(dir.path(), &["add", "B"]);
    let out = run_ok(dir.path(), &["later"]);
    assert!(out.contains("Next up: B"));
    assert_eq!(list_texts(dir.path()), vec!["B", "A"]);
}

#[test]
fn test_done_on_empty_vault() {
    let dir = TempDir::new().unwrap();
    assert!(run_ok(dir.path(), &["done"]).contains("empty"));
}

#[test]
fn test_delete_unknown_id_fails() {
    let dir = TempDir::new().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["delete", "nope"]);
    assert_eq!(code, 1);
}

#[test]
fn test_rescue_settings() {
    let dir = TempDir::new().unwrap();
    run_ok(dir.path(), &["rescue", "enable"]);
    run_ok(dir.path(), &["rescue", "delay", "5"]);
    let status: serde_json::Value =
        serde_json::from_str(&run_ok(dir.path(), &["rescue", "status"])).unwrap();
    assert_eq!(status["enabled"], true);
    assert_eq!(status["delay_minutes"], 5.0);

    let (_, _, code) = run_cli(dir.path(), &["rescue", "delay", "0"]);
    assert_eq!(code, 1);
    let (_, _, code) = run_cli(dir.path(), &["rescue", "delay", "1e12"]);
    assert_eq!(code, 1);
    run_ok(dir.path(), &["away"]);
}

#[test]
fn test_short_away_does_not_rescue() {
    let dir = TempDir::new().unwrap();
    run_ok(dir.path(), &["add", "A"]);
    run_ok(dir.path(), &["rescue", "enable"]);
    run_ok(dir.path(), &["away"]);
    let (stdout, stderr, code) = run_cli(dir.path(), &["back"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("welcome back"));
    assert!(!stderr.contains("you were away"));
}

#[test]
fn test_limits() {
    let dir = TempDir::new().unwrap();
    run_ok(dir.path(), &["limits", "set", "instagram", "30"]);
    assert_eq!(run_ok(dir.path(), &["limits", "get", "instagram"]).trim(), "30");
    run_ok(dir.path(), &["limits", "set", "instagram", "0"]);
    assert_eq!(run_ok(dir.path(), &["limits", "get", "instagram"]).trim(), "0");
}

#[test]
fn test_config_set_persists() {
    let dir = TempDir::new().unwrap();
    assert_eq!(
        run_ok(dir.path(), &["config", "get", "engagement.nudge_after_secs"]).trim(),
        "120"
    );
    run_ok(dir.path(), &["config", "set", "engagement.nudge_after_secs", "60"]);
    assert_eq!(
        run_ok(dir.path(), &["config", "get", "engagement.nudge_after_secs"]).trim(),
        "60"
    );
    run_ok(dir.path(), &["config", "reset"]);
    assert_eq!(
        run_ok(dir.path(), &["config", "get", "engagement.nudge_after_secs"]).trim(),
        "120"
    );
}

#[test]
fn test_completions() {
    let dir = TempDir::new().unwrap();
    assert!(run_ok(dir.path(), &["completions", "bash"]).contains("unstuck"));
}
