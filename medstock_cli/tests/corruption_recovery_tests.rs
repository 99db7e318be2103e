//! Corruption recovery tests for medstock.
//!
//! These tests verify the system handles:
//! - Missing files (normal, never fatal)
//! - Corrupted medication stores (explicit failure, file left intact)
//! - Corrupted last-run dates
//! - Corrupted alert log lines
//! - A malformed .env file

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write as IoWrite;
use std::path::Path;
use tempfile::TempDir;

fn setup_test_dir() -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::create_dir_all(temp_dir.path().join("data")).unwrap();
    fs::write(
        temp_dir.path().join("config.toml"),
        "[notify]\nenabled = false\n",
    )
    .unwrap();
    temp_dir
}

fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("medstock"));
    cmd.env_remove("PUSHBULLET_API_KEY")
        .arg("--data-dir")
        .arg(dir.join("data"))
        .arg("--config")
        .arg(dir.join("config.toml"));
    cmd
}

const STORE: &str = r#"{"version":1,"medications":[{"name":"Lithium","stock":12,"daily_intake":1}]}"#;

#[test]
fn test_missing_data_dir_is_empty_inventory() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(temp_dir.path().join("config.toml"), "").unwrap();

    cli(temp_dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No medications registered"));
}

#[test]
fn test_corrupted_store_fails_loudly() {
    let temp_dir = setup_test_dir();
    let store_path = temp_dir.path().join("data/medications.json");
    fs::write(&store_path, "{ invalid json }}}}").unwrap();

    cli(temp_dir.path())
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Store"));

    // Nothing was overwritten
    assert_eq!(fs::read_to_string(&store_path).unwrap(), "{ invalid json }}}}");
    assert!(!temp_dir.path().join("data/last_run_date.txt").exists());
}

#[test]
fn test_corrupted_store_blocks_manual_edits() {
    let temp_dir = setup_test_dir();
    fs::write(temp_dir.path().join("data/medications.json"), "[1, 2, 3]").unwrap();

    cli(temp_dir.path())
        .args(["add", "Sertraline", "--stock", "30", "--daily", "1"])
        .assert()
        .failure();
}

#[test]
fn test_corrupted_last_run_fails_without_deducting() {
    let temp_dir = setup_test_dir();
    let store_path = temp_dir.path().join("data/medications.json");
    fs::write(&store_path, STORE).unwrap();
    fs::write(temp_dir.path().join("data/last_run_date.txt"), "last tuesday").unwrap();

    cli(temp_dir.path())
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("LastRun"));

    assert_eq!(fs::read_to_string(&store_path).unwrap(), STORE);
}

#[test]
fn test_empty_last_run_treated_as_first_run() {
    let temp_dir = setup_test_dir();
    fs::write(temp_dir.path().join("data/medications.json"), STORE).unwrap();
    fs::write(temp_dir.path().join("data/last_run_date.txt"), "").unwrap();

    cli(temp_dir.path())
        .args(["--today", "2024-01-05", "run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("First run"))
        .stdout(predicate::str::contains("Lithium: 12 pills remaining"));
}

#[test]
fn test_corrupted_alert_log_lines_skipped() {
    let temp_dir = setup_test_dir();
    let log_path = temp_dir.path().join("data/alerts.jsonl");

    let mut file = fs::File::create(&log_path).unwrap();
    writeln!(file, "{{ not json").unwrap();
    writeln!(
        file,
        r#"{{"date":"2024-01-02","medication":"Lithium","severity":"urgent","stock":2,"title":"Urgent Alert","body":"x","delivery":{{"status":"sent"}}}}"#
    )
    .unwrap();
    drop(file);

    cli(temp_dir.path())
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-01-02 [urgent] Lithium (2 left): sent"));
}

#[test]
fn test_malformed_dotenv_is_reported_not_fatal() {
    let temp_dir = setup_test_dir();
    fs::write(temp_dir.path().join(".env"), "this line is not an assignment\n").unwrap();

    cli(temp_dir.path())
        .current_dir(temp_dir.path())
        .env_remove("RUST_LOG")
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No medications registered"))
        .stderr(predicate::str::contains("Ignoring unreadable .env file"));
}
