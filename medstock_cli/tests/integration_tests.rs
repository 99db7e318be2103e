//! Integration tests for the medstock binary.
//!
//! These tests verify end-to-end behavior including:
//! - Inventory management commands
//! - Daily reconciliation across simulated days
//! - Alert logging and history
//! - The interactive menu over stdin

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory with a config that never pushes
fn setup_test_dir() -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(
        temp_dir.path().join("config.toml"),
        "[notify]\nenabled = false\n",
    )
    .expect("Failed to write config");
    temp_dir
}

/// Helper to get the CLI pointed at a test directory
fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("medstock"));
    cmd.env_remove("PUSHBULLET_API_KEY")
        .arg("--data-dir")
        .arg(dir.join("data"))
        .arg("--config")
        .arg(dir.join("config.toml"));
    cmd
}

fn add(dir: &Path, name: &str, stock: u32, daily: u32) {
    cli(dir)
        .args(["add", name, "--stock", stock.to_string().as_str(), "--daily", daily.to_string().as_str()])
        .assert()
        .success();
}

#[test]
fn test_cli_help() {
    Command::new(assert_cmd::cargo::cargo_bin!("medstock"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Household medication stock tracker"));
}

#[test]
fn test_add_and_list() {
    let temp_dir = setup_test_dir();
    add(temp_dir.path(), "Sertraline", 30, 1);

    cli(temp_dir.path())
        .args(["add", "Zolpidem", "--stock", "14", "--daily", "1", "--sleeping"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added Zolpidem at position 2"));

    cli(temp_dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 - Sertraline: 30 pills left"))
        .stdout(predicate::str::contains("2 - Zolpidem: 14 pills left (1/day, sleep)"));

    let store = temp_dir.path().join("data/medications.json");
    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(store).unwrap()).unwrap();
    assert_eq!(doc["version"], 1);
    assert_eq!(doc["medications"].as_array().unwrap().len(), 2);
}

#[test]
fn test_run_with_empty_inventory() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("No medications registered"));

    assert!(!temp_dir.path().join("data/last_run_date.txt").exists());
}

#[test]
fn test_run_across_days() {
    let temp_dir = setup_test_dir();
    add(temp_dir.path(), "Lithium", 10, 2);

    cli(temp_dir.path())
        .args(["--today", "2024-01-07", "run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("First run"))
        .stdout(predicate::str::contains("Lithium: 10 pills remaining"));

    let last_run = fs::read_to_string(temp_dir.path().join("data/last_run_date.txt")).unwrap();
    assert_eq!(last_run, "2024-01-07");

    cli(temp_dir.path())
        .args(["--today", "2024-01-10", "run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 day(s) since last run"))
        .stdout(predicate::str::contains("Lithium: 4 pills remaining"))
        .stdout(predicate::str::contains("[critical]"));

    // Second run on the same day leaves stock alone
    cli(temp_dir.path())
        .args(["--today", "2024-01-10", "run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Already ran today"))
        .stdout(predicate::str::contains("Lithium: 4 pills remaining"));
}

#[test]
fn test_run_alerts_and_history() {
    let temp_dir = setup_test_dir();
    add(temp_dir.path(), "Venlafaxine", 6, 1);
    add(temp_dir.path(), "Ibuprofen", 20, 0);

    cli(temp_dir.path())
        .args(["--today", "2024-02-01", "run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alerts:").not());

    cli(temp_dir.path())
        .args(["--today", "2024-02-02", "run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[critical] Critical Alert"))
        .stdout(predicate::str::contains("notifications disabled"));

    let log = fs::read_to_string(temp_dir.path().join("data/alerts.jsonl")).unwrap();
    assert_eq!(log.lines().count(), 1);
    assert!(log.contains("Venlafaxine"));

    cli(temp_dir.path())
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-02-02 [critical] Venlafaxine (5 left)"));
}

#[test]
fn test_dry_run_does_not_persist() {
    let temp_dir = setup_test_dir();
    add(temp_dir.path(), "Lithium", 5, 1);

    cli(temp_dir.path())
        .args(["run", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"))
        .stdout(predicate::str::contains("not sent, dry run"));

    assert!(!temp_dir.path().join("data/last_run_date.txt").exists());
    assert!(!temp_dir.path().join("data/alerts.jsonl").exists());
}

#[test]
fn test_edit_and_remove() {
    let temp_dir = setup_test_dir();
    add(temp_dir.path(), "Sertraline", 30, 1);
    add(temp_dir.path(), "Ibuprofen", 8, 0);

    cli(temp_dir.path())
        .args(["edit", "1", "--add", "28"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sertraline now has 58 pills"));

    cli(temp_dir.path())
        .args(["edit", "2", "--remove", "50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ibuprofen now has 0 pills"));

    cli(temp_dir.path())
        .args(["remove", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed Sertraline"));

    cli(temp_dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 - Ibuprofen: 0 pills left"));
}

#[test]
fn test_edit_requires_a_change() {
    let temp_dir = setup_test_dir();
    add(temp_dir.path(), "Sertraline", 30, 1);

    cli(temp_dir.path()).args(["edit", "1"]).assert().failure();
}

#[test]
fn test_edit_out_of_range_fails() {
    let temp_dir = setup_test_dir();
    add(temp_dir.path(), "Sertraline", 30, 1);

    cli(temp_dir.path())
        .args(["edit", "5", "--set", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No medication at position 5"));
}

#[test]
fn test_predict() {
    let temp_dir = setup_test_dir();
    add(temp_dir.path(), "Venlafaxine", 100, 10);
    add(temp_dir.path(), "Ibuprofen", 8, 0);

    cli(temp_dir.path())
        .args(["--today", "2024-01-01", "predict"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Runs out: 11/01/2024"))
        .stdout(predicate::str::contains("Buy by: 01/01/2024"))
        .stdout(predicate::str::contains("As-needed use, no depletion forecast."));
}

#[test]
fn test_skip_sleep_then_run() {
    let temp_dir = setup_test_dir();
    add(temp_dir.path(), "Sertraline", 30, 1);
    cli(temp_dir.path())
        .args(["add", "Zolpidem", "--stock", "20", "--daily", "1", "--sleeping"])
        .assert()
        .success();

    cli(temp_dir.path())
        .args(["--today", "2024-03-01", "run"])
        .assert()
        .success();

    cli(temp_dir.path())
        .args(["--today", "2024-03-01", "skip-sleep"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipping Zolpidem today"));

    // Only once per day
    cli(temp_dir.path())
        .args(["--today", "2024-03-01", "skip-sleep"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No sleeping medication to skip"));

    // The skipped night is not consumed
    cli(temp_dir.path())
        .args(["--today", "2024-03-02", "run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sertraline: 29 pills remaining"))
        .stdout(predicate::str::contains("Zolpidem: 20 pills remaining"));
}

#[test]
fn test_export_csv() {
    let temp_dir = setup_test_dir();
    add(temp_dir.path(), "Lithium", 60, 2);
    let csv_path = temp_dir.path().join("inventory.csv");

    cli(temp_dir.path())
        .args(["--today", "2024-01-01", "export"])
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 medications"));

    let csv_content = fs::read_to_string(&csv_path).unwrap();
    assert!(csv_content.contains("position,name,stock"));
    assert!(csv_content.contains("1,Lithium,60,2,false,2024-01-31,2024-01-21"));
}

#[test]
fn test_menu_over_stdin() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("menu")
        .write_stdin("2\nMelatonin\n30\n0\ny\n1\n7\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Melatonin added at position 1."))
        .stdout(predicate::str::contains("1 - Melatonin: 30 pills left (as needed, sleep)"))
        .stdout(predicate::str::contains("Changes saved."));

    cli(temp_dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Melatonin"));
}

#[test]
fn test_default_command_is_menu() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Medication manager:"));
}
