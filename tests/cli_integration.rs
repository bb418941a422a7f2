//! CLI integration tests for taskplan
//!
//! These tests drive the binary against a temporary JSONL task file and
//! cover the validate/reschedule/cascade workflow end to end.

use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Get a command instance for the taskplan binary
fn taskplan_cmd() -> assert_cmd::Command {
    assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("taskplan"))
}

fn write_tasks(path: &Path, tasks: &[serde_json::Value]) {
    let lines: Vec<String> = tasks.iter().map(|t| t.to_string()).collect();
    fs::write(path, lines.join("\n") + "\n").unwrap();
}

/// A foundation task plus a framing task that must follow it (FS).
fn sample_file(dir: &TempDir, framing_start: &str, framing_end: &str) -> std::path::PathBuf {
    let path = dir.path().join("tasks.jsonl");
    write_tasks(
        &path,
        &[
            serde_json::json!({
                "id": "t-1",
                "name": "Foundation",
                "start_date": "2025-06-01",
                "end_date": "2025-06-15"
            }),
            serde_json::json!({
                "id": "t-2",
                "name": "Framing",
                "start_date": framing_start,
                "end_date": framing_end,
                "predecessors": [{"predecessor": "t-1", "type": "FS", "lag": 0}]
            }),
        ],
    );
    path
}

// =============================================================================
// List / Order
// =============================================================================

#[test]
fn test_list_shows_tasks() {
    let dir = TempDir::new().unwrap();
    let path = sample_file(&dir, "2025-06-15", "2025-06-20");

    taskplan_cmd()
        .arg("--file")
        .arg(&path)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Foundation"))
        .stdout(predicate::str::contains("Framing"));
}

#[test]
fn test_list_empty_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tasks.jsonl");

    taskplan_cmd()
        .arg("--file")
        .arg(&path)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks."));
}

#[test]
fn test_order_puts_predecessors_first() {
    let dir = TempDir::new().unwrap();
    let path = sample_file(&dir, "2025-06-15", "2025-06-20");

    let out = taskplan_cmd()
        .arg("--file")
        .arg(&path)
        .arg("order")
        .assert()
        .success();

    let stdout = String::from_utf8(out.get_output().stdout.clone()).unwrap();
    let pos1 = stdout.find("t-1").unwrap();
    let pos2 = stdout.find("t-2").unwrap();
    assert!(pos1 < pos2);
}

#[test]
fn test_order_fails_on_cycle() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tasks.jsonl");
    write_tasks(
        &path,
        &[
            serde_json::json!({
                "id": "a", "name": "A",
                "start_date": "2025-01-01", "end_date": "2025-01-05",
                "predecessors": [{"predecessor": "b"}]
            }),
            serde_json::json!({
                "id": "b", "name": "B",
                "start_date": "2025-01-01", "end_date": "2025-01-05",
                "predecessors": [{"predecessor": "a"}]
            }),
        ],
    );

    taskplan_cmd()
        .arg("--file")
        .arg(&path)
        .arg("order")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cycle"));
}

// =============================================================================
// Validate
// =============================================================================

#[test]
fn test_validate_clean_schedule() {
    let dir = TempDir::new().unwrap();
    // Starts exactly when the predecessor finishes: boundary is valid.
    let path = sample_file(&dir, "2025-06-15", "2025-06-20");

    taskplan_cmd()
        .arg("--file")
        .arg(&path)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("All schedules valid"));
}

#[test]
fn test_validate_reports_violation() {
    let dir = TempDir::new().unwrap();
    // One day before the predecessor finishes: violation.
    let path = sample_file(&dir, "2025-06-14", "2025-06-19");

    taskplan_cmd()
        .arg("--file")
        .arg(&path)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "cannot start before 'Foundation' finishes",
        ))
        .stdout(predicate::str::contains("1 violation(s)"));
}

#[test]
fn test_validate_single_task() {
    let dir = TempDir::new().unwrap();
    let path = sample_file(&dir, "2025-06-14", "2025-06-19");

    taskplan_cmd()
        .arg("--file")
        .arg(&path)
        .arg("validate")
        .arg("t-1")
        .assert()
        .success()
        .stdout(predicate::str::contains("All schedules valid"));
}

#[test]
fn test_validate_trims_task_id_argument() {
    let dir = TempDir::new().unwrap();
    let path = sample_file(&dir, "2025-06-15", "2025-06-20");

    taskplan_cmd()
        .arg("--file")
        .arg(&path)
        .arg("validate")
        .arg(" t-1 ")
        .assert()
        .success()
        .stdout(predicate::str::contains("All schedules valid"));
}

#[test]
fn test_validate_unknown_task_fails() {
    let dir = TempDir::new().unwrap();
    let path = sample_file(&dir, "2025-06-15", "2025-06-20");

    taskplan_cmd()
        .arg("--file")
        .arg(&path)
        .arg("validate")
        .arg("ghost")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task not found"));
}

#[test]
fn test_validate_warns_on_dangling_predecessor() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tasks.jsonl");
    write_tasks(
        &path,
        &[serde_json::json!({
            "id": "t-1", "name": "Orphan",
            "start_date": "2025-01-01", "end_date": "2025-01-05",
            "predecessors": [{"predecessor": "ghost"}]
        })],
    );

    taskplan_cmd()
        .arg("--file")
        .arg(&path)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("predecessor 'ghost' not found"))
        .stdout(predicate::str::contains("All schedules valid"));
}

#[test]
fn test_validate_json_output() {
    let dir = TempDir::new().unwrap();
    let path = sample_file(&dir, "2025-06-14", "2025-06-19");

    let out = taskplan_cmd()
        .arg("--file")
        .arg(&path)
        .arg("--format")
        .arg("json")
        .arg("validate")
        .arg("t-2")
        .assert()
        .success();

    let stdout = String::from_utf8(out.get_output().stdout.clone()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(parsed[0]["valid"], serde_json::json!(false));
    assert_eq!(parsed[0]["violations"].as_array().unwrap().len(), 1);
}

// =============================================================================
// Reschedule
// =============================================================================

#[test]
fn test_reschedule_dry_run_does_not_modify_file() {
    let dir = TempDir::new().unwrap();
    let path = sample_file(&dir, "2025-06-14", "2025-06-19");
    let before = fs::read_to_string(&path).unwrap();

    taskplan_cmd()
        .arg("--file")
        .arg(&path)
        .arg("reschedule")
        .arg("t-2")
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-06-15 -> 2025-06-20"));

    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_reschedule_write_persists_and_validates_clean() {
    let dir = TempDir::new().unwrap();
    let path = sample_file(&dir, "2025-06-14", "2025-06-19");

    taskplan_cmd()
        .arg("--file")
        .arg(&path)
        .arg("reschedule")
        .arg("t-2")
        .arg("--write")
        .assert()
        .success();

    taskplan_cmd()
        .arg("--file")
        .arg(&path)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("All schedules valid"));
}

#[test]
fn test_reschedule_unconstrained_task_is_a_noop() {
    let dir = TempDir::new().unwrap();
    let path = sample_file(&dir, "2025-06-15", "2025-06-20");

    taskplan_cmd()
        .arg("--file")
        .arg(&path)
        .arg("reschedule")
        .arg("t-1")
        .assert()
        .success()
        .stdout(predicate::str::contains("no schedulable predecessors"));
}

#[test]
fn test_reschedule_satisfied_task_reports_no_change() {
    let dir = TempDir::new().unwrap();
    let path = sample_file(&dir, "2025-06-15", "2025-06-20");

    taskplan_cmd()
        .arg("--file")
        .arg(&path)
        .arg("reschedule")
        .arg("t-2")
        .assert()
        .success()
        .stdout(predicate::str::contains("already satisfies"));
}

// =============================================================================
// Cascade
// =============================================================================

#[test]
fn test_cascade_write_fixes_a_chain() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tasks.jsonl");
    write_tasks(
        &path,
        &[
            serde_json::json!({
                "id": "a", "name": "Excavate",
                "start_date": "2025-01-01", "end_date": "2025-01-10"
            }),
            serde_json::json!({
                "id": "b", "name": "Pour",
                "start_date": "2024-06-01", "end_date": "2024-06-04",
                "predecessors": [{"predecessor": "a"}]
            }),
            serde_json::json!({
                "id": "c", "name": "Cure",
                "start_date": "2024-06-01", "end_date": "2024-06-03",
                "predecessors": [{"predecessor": "b"}]
            }),
        ],
    );

    taskplan_cmd()
        .arg("--file")
        .arg(&path)
        .arg("cascade")
        .arg("--write")
        .assert()
        .success()
        .stdout(predicate::str::contains("b: 2025-01-10 -> 2025-01-13"))
        .stdout(predicate::str::contains("c: 2025-01-13 -> 2025-01-15"))
        .stdout(predicate::str::contains("2 task(s) rescheduled"));

    // A second pass finds nothing left to move.
    taskplan_cmd()
        .arg("--file")
        .arg(&path)
        .arg("cascade")
        .assert()
        .success()
        .stdout(predicate::str::contains("already satisfy"));
}

#[test]
fn test_cascade_dry_run_does_not_modify_file() {
    let dir = TempDir::new().unwrap();
    let path = sample_file(&dir, "2025-06-14", "2025-06-19");
    let before = fs::read_to_string(&path).unwrap();

    taskplan_cmd()
        .arg("--file")
        .arg(&path)
        .arg("cascade")
        .assert()
        .success()
        .stdout(predicate::str::contains("use --write"));

    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}
