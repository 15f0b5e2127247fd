#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// `assist` pointed at a private data directory, isolated from the user's
/// environment.
fn assist(data: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("assist"));
    cmd.env_remove("ASSIST_DATA_DIR")
        .env_remove("ASSIST_LOG")
        .env("NO_COLOR", "1")
        .arg("--data")
        .arg(data.path());
    cmd
}

#[test]
fn task_workflow() {
    let data = TempDir::new().unwrap();

    assist(&data)
        .args(["task", "add", "water plants", "-p", "1"])
        .assert()
        .success();
    assist(&data)
        .args(["task", "add", "file taxes", "-p", "3"])
        .assert()
        .success();

    assist(&data)
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"1\. \[ \] !!! +file taxes").unwrap())
        .stdout(predicate::str::is_match(r"2\. \[ \] ! +water plants").unwrap());

    assist(&data).args(["task", "done", "1"]).assert().success();

    assist(&data)
        .args(["task", "list", "--pending"])
        .assert()
        .success()
        .stdout(predicate::str::contains("water plants"))
        .stdout(predicate::str::contains("file taxes").not());

    let file = fs::read_to_string(data.path().join("todo_list.txt")).unwrap();
    assert!(file.contains("file taxes,3,true,"));
}

#[test]
fn invalid_health_record_fails_with_message() {
    let data = TempDir::new().unwrap();
    assist(&data)
        .args(["health", "add", "--bp-high", "80", "--bp-low", "120"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
    assert!(!data.path().join("health_records.txt").exists());
}

#[test]
fn health_round_trip_through_files() {
    let data = TempDir::new().unwrap();
    assist(&data)
        .args(["health", "add", "--date", "2024-03-01", "--weight", "70.5"])
        .assert()
        .success();

    assist(&data)
        .args(["health", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-03-01  70.5 kg"));
}

#[test]
fn life_search_with_blank_keywords_finds_nothing() {
    let data = TempDir::new().unwrap();
    assist(&data)
        .args(["life", "add", "hike", "--content", "up the hill", "--mood", "Happy"])
        .assert()
        .success();

    let output = assist(&data)
        .args(["-o", "json", "life", "search", "--title", " "])
        .output()
        .unwrap();
    assert!(output.status.success());
    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["listed"].as_array().unwrap().len(), 0);

    assist(&data)
        .args(["life", "search", "--mood", "happy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hike"));
}

#[test]
fn deleting_by_position_renumbers() {
    let data = TempDir::new().unwrap();
    for title in ["one", "two", "three"] {
        assist(&data).args(["life", "add", title]).assert().success();
    }
    assist(&data).args(["life", "delete", "2"]).assert().success();

    let output = assist(&data)
        .args(["life", "list", "-o", "json"])
        .output()
        .unwrap();
    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let listed = result["listed"].as_array().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["record"]["title"], "one");
    assert_eq!(listed[1]["position"], 2);
    assert_eq!(listed[1]["record"]["title"], "three");
}

#[test]
fn payments_are_categorized_and_compared() {
    let data = TempDir::new().unwrap();
    assist(&data)
        .args([
            "pay", "add", "100", "expense", "--at", "2024-04-10", "--note", "lunch delivery",
        ])
        .assert()
        .success();

    assist(&data)
        .args(["pay", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dining"))
        .stdout(predicate::str::contains("-100.00"));

    let output = assist(&data)
        .args(["-o", "json", "pay", "compare", "month", "--month", "2024-05"])
        .output()
        .unwrap();
    let comparison: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(comparison["expense_change"]["percent"], -100.0);
    assert_eq!(comparison["expense_change"]["trend"], "decrease");

    assist(&data)
        .args(["pay", "insights", "--month", "2024-05"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Keep it up"));
}

#[test]
fn unknown_position_is_an_error() {
    let data = TempDir::new().unwrap();
    assist(&data)
        .args(["task", "done", "4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn config_template_needs_no_data() {
    let data = TempDir::new().unwrap();
    assist(&data)
        .args(["config", "template"])
        .assert()
        .success()
        .stdout(predicate::str::contains("category_rules"));
}

#[test]
fn config_path_lists_every_file() {
    let data = TempDir::new().unwrap();
    assist(&data)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("todo_list.txt"))
        .stdout(predicate::str::contains("payment_records.txt"));
}
