//! Integration tests for the CLI interface
//!
//! Runs the built binary end to end and checks the summary and exit codes.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn matrix_sum() -> Command {
    Command::cargo_bin("matrix-sum").unwrap()
}

#[test]
fn test_cli_help_flag() {
    matrix_sum()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("--strategy"));
}

#[test]
fn test_summary_contains_all_values() {
    matrix_sum()
        .args(["16", "4", "--seed", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("The total is"))
        .stdout(predicate::str::contains("The maximum is"))
        .stdout(predicate::str::contains("The minimum is"))
        .stdout(predicate::str::contains("The execution time is"));
}

#[test]
fn test_uniform_grid_scenario() {
    // 4x4 grid of 7s across 2 workers
    for strategy in ["join", "barrier"] {
        matrix_sum()
            .args(["4", "2", "--min-value", "7", "--max-value", "7"])
            .args(["--strategy", strategy])
            .assert()
            .success()
            .stdout(predicate::str::contains("The total is 112\n"))
            .stdout(predicate::str::contains("The maximum is 7\n"))
            .stdout(predicate::str::contains("The minimum is 7\n"));
    }
}

#[test]
fn test_single_cell_scenario() {
    matrix_sum()
        .args(["1", "1", "--min-value=-3", "--max-value=-3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("The total is -3\n"))
        .stdout(predicate::str::contains("The maximum is -3\n"))
        .stdout(predicate::str::contains("The minimum is -3\n"));
}

#[test]
fn test_more_workers_than_rows() {
    matrix_sum()
        .args(["3", "8", "--min-value", "2", "--max-value", "2"])
        .args(["--max-workers", "8", "--strategy", "barrier"])
        .assert()
        .success()
        .stdout(predicate::str::contains("The total is 18\n"));
}

#[test]
fn test_json_output_is_clamped() {
    let output = matrix_sum()
        .args(["50", "40", "--max-size", "20", "--seed", "9", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["size"], 20);
    assert_eq!(report["workers"], 10);
    assert_eq!(report["cells"], 400);
    assert_eq!(report["seed"], 9);
    assert!(report["min"].as_i64().unwrap() >= 0);
    assert!(report["max"].as_i64().unwrap() <= 98);
}

#[test]
fn test_same_seed_same_result() {
    let run = |strategy: &str| {
        let output = matrix_sum()
            .args(["64", "5", "--seed", "123", "--format", "json"])
            .args(["--strategy", strategy])
            .output()
            .unwrap();
        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        (report["sum"].clone(), report["min"].clone(), report["max"].clone())
    };

    assert_eq!(run("join"), run("barrier"));
}

#[test]
fn test_print_grid() {
    matrix_sum()
        .args(["2", "1", "--min-value", "5", "--max-value", "5", "--print-grid"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[ 5 5 ]\n[ 5 5 ]\n"));
}

#[test]
fn test_zero_size_is_usage_error() {
    matrix_sum()
        .args(["0", "2"])
        .assert()
        .failure()
        .code(2)
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_non_numeric_workers_is_usage_error() {
    matrix_sum()
        .args(["10", "many"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_inverted_value_range_fails() {
    matrix_sum()
        .args(["4", "2", "--min-value", "10", "--max-value", "1"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("min_value"));
}

#[test]
fn test_config_file_with_cli_override() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "size = 6\nworkers = 3\nmin_value = 1\nmax_value = 1\nformat = \"json\""
    )
    .unwrap();

    let output = matrix_sum()
        .arg("--config")
        .arg(file.path())
        .args(["--strategy", "barrier"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["sum"], 36);
    assert_eq!(report["workers"], 3);
    assert_eq!(report["strategy"], "barrier");
}

#[test]
fn test_invalid_config_file_fails() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "workers = 0").unwrap();

    matrix_sum()
        .arg("--config")
        .arg(file.path())
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("workers"));
}
