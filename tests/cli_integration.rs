//! Integration tests for the `todo` CLI.
//!
//! Each test creates a temp data directory, runs `todo` as a subprocess,
//! and verifies stdout and/or file contents.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Get the path to the built `todo` binary.
fn todo_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("todo");
    path
}

/// Write a small data file into the given directory.
fn create_test_list(root: &Path) {
    fs::write(
        root.join("data.txt"),
        "\
# Todo List App Data
# Format: TaskName|DueDate|Priority|Status|IsPinned
# Generated: 2025-05-01 09:30:00

Water plants|2099-01-01|Low|Pending|false
Pay rent|2000-01-01|High|Pending|false
Call plumber||Medium|Completed|true
",
    )
    .unwrap();
}

/// Run `todo` with the given args in the given directory, returning (stdout, stderr, success).
fn run_todo(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(todo_bin())
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run todo");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `todo` expecting success, return stdout.
fn run_todo_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_todo(dir, args);
    if !success {
        panic!(
            "todo {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

/// Task names in display order, from `todo list --json`
fn listed_names(dir: &Path, extra: &[&str]) -> Vec<String> {
    let mut args = vec!["list", "--json"];
    args.extend_from_slice(extra);
    let out = run_todo_ok(dir, &args);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    parsed
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap().to_string())
        .collect()
}

fn data_file(dir: &Path) -> String {
    fs::read_to_string(dir.join("data.txt")).unwrap()
}

// ---------------------------------------------------------------------------
// Read command tests
// ---------------------------------------------------------------------------

#[test]
fn test_list_pinned_first_then_name() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    assert_eq!(
        listed_names(tmp.path(), &[]),
        vec!["Call plumber", "Pay rent", "Water plants"]
    );
}

#[test]
fn test_list_table_output() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    let out = run_todo_ok(tmp.path(), &["list"]);
    let lines: Vec<&str> = out.lines().collect();
    assert!(lines[0].starts_with('#'));
    assert!(lines[1].starts_with("3   * Call plumber"));
    assert!(lines[2].contains("Pay rent"));
    assert!(lines[2].ends_with("overdue"));
}

#[test]
fn test_list_no_subcommand_is_list() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    let out = run_todo_ok(tmp.path(), &[]);
    assert!(out.contains("Water plants"));
}

#[test]
fn test_list_empty_directory() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_todo_ok(tmp.path(), &["list"]);
    assert_eq!(out.trim(), "no tasks");
}

#[test]
fn test_list_sort_and_desc() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    assert_eq!(
        listed_names(tmp.path(), &["--sort", "priority"]),
        vec!["Call plumber", "Pay rent", "Water plants"]
    );
    // Pinned rows stay on top when descending
    assert_eq!(
        listed_names(tmp.path(), &["--sort", "due", "--desc"]),
        vec!["Call plumber", "Water plants", "Pay rent"]
    );
}

#[test]
fn test_list_filters() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    assert_eq!(listed_names(tmp.path(), &["--filter", "PLANT"]), vec!["Water plants"]);
    assert_eq!(listed_names(tmp.path(), &["--status", "done"]), vec!["Call plumber"]);
    assert_eq!(listed_names(tmp.path(), &["--overdue"]), vec!["Pay rent"]);
    assert_eq!(listed_names(tmp.path(), &["--pinned"]), vec!["Call plumber"]);
    assert_eq!(
        listed_names(tmp.path(), &["--due", "2099-01-01"]),
        vec!["Water plants"]
    );
}

#[test]
fn test_list_json_fields() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    let out = run_todo_ok(tmp.path(), &["list", "--json", "--filter", "rent"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let task = &parsed[0];
    assert_eq!(task["number"], 2);
    assert_eq!(task["due_date"], "2000-01-01");
    assert_eq!(task["priority"], "High");
    assert_eq!(task["status"], "Pending");
    assert_eq!(task["pinned"], false);
    assert_eq!(task["overdue"], true);
}

#[test]
fn test_stats() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    let out = run_todo_ok(tmp.path(), &["stats"]);
    assert!(out.contains("Total:       3"));
    assert!(out.contains("Completion:  33.3%"));

    let out = run_todo_ok(tmp.path(), &["stats", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["total"], 3);
    assert_eq!(parsed["completed"], 1);
    assert_eq!(parsed["pinned"], 1);
    assert_eq!(parsed["overdue"], 1);
}

#[test]
fn test_check_reports_bad_lines() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    let out = run_todo_ok(tmp.path(), &["check"]);
    assert!(out.contains("✓ data file is valid (3 tasks)"));

    fs::write(tmp.path().join("data.txt"), "Good||Low|Pending|false\nbroken\n").unwrap();
    let out = run_todo_ok(tmp.path(), &["check"]);
    assert!(out.contains("line 2: broken"));
    assert!(out.contains("✗ data file has problems"));
}

// ---------------------------------------------------------------------------
// Write command tests
// ---------------------------------------------------------------------------

#[test]
fn test_add_uses_preferences() {
    let tmp = tempfile::TempDir::new().unwrap();

    let out = run_todo_ok(tmp.path(), &["add", "Buy milk", "--priority", "high"]);
    assert_eq!(out.trim(), "1");
    let today = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();
    assert!(data_file(tmp.path()).contains(&format!("Buy milk|{}|High|Pending|false", today)));

    run_todo_ok(tmp.path(), &["config", "auto-fill-today", "false"]);
    run_todo_ok(tmp.path(), &["add", "Someday"]);
    assert!(data_file(tmp.path()).contains("Someday||Medium|Pending|false"));
}

#[test]
fn test_add_validation_errors() {
    let tmp = tempfile::TempDir::new().unwrap();

    let (_, stderr, ok) = run_todo(tmp.path(), &["add", "   "]);
    assert!(!ok);
    assert!(stderr.contains("task name cannot be empty"));

    let (_, stderr, ok) = run_todo(tmp.path(), &["add", "Trip", "--due", "2025-13-40"]);
    assert!(!ok);
    assert!(stderr.contains("YYYY-MM-DD"));

    let (_, stderr, ok) = run_todo(tmp.path(), &["add", "line one\nline two"]);
    assert!(!ok);
    assert!(stderr.contains("task name must fit on one line"));
    assert!(!tmp.path().join("data.txt").exists());
}

#[test]
fn test_add_escapes_separator() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_todo_ok(tmp.path(), &["add", "A|B", "--no-due"]);
    assert!(data_file(tmp.path()).contains("A\\|B||Medium|Pending|false"));
    assert_eq!(listed_names(tmp.path(), &[]), vec!["A|B"]);
}

#[test]
fn test_add_backslash_name_round_trips() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_todo_ok(tmp.path(), &["add", "C:\\temp\\", "--no-due", "--priority", "high"]);
    assert!(data_file(tmp.path()).contains("C:\\\\temp\\\\||High|Pending|false"));

    let out = run_todo_ok(tmp.path(), &["list", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed[0]["name"], "C:\\temp\\");
    assert_eq!(parsed[0]["priority"], "High");
    assert_eq!(parsed[0]["status"], "Pending");
}

#[test]
fn test_edit() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    run_todo_ok(tmp.path(), &["edit", "1", "--name", "Water all plants", "--clear-due"]);
    assert!(data_file(tmp.path()).contains("Water all plants||Low|Pending|false"));

    let (_, stderr, ok) = run_todo(tmp.path(), &["edit", "9", "--name", "x"]);
    assert!(!ok);
    assert!(stderr.contains("no task #9"));
}

#[test]
fn test_rm_keeps_pins_on_same_tasks() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    let out = run_todo_ok(tmp.path(), &["rm", "1"]);
    assert_eq!(out.trim(), "deleted: Water plants");
    let data = data_file(tmp.path());
    assert!(!data.contains("Water plants"));
    assert!(data.contains("Call plumber||Medium|Completed|true"));
    assert!(tmp.path().join("data.txt.backup").exists());
}

#[test]
fn test_pin_toggle() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    assert_eq!(run_todo_ok(tmp.path(), &["pin", "1"]).trim(), "#1 pinned");
    assert_eq!(
        listed_names(tmp.path(), &[]),
        vec!["Water plants", "Call plumber", "Pay rent"]
    );
    assert_eq!(run_todo_ok(tmp.path(), &["pin", "1"]).trim(), "#1 unpinned");
}

#[test]
fn test_status_shortcuts() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    run_todo_ok(tmp.path(), &["start", "1"]);
    assert!(data_file(tmp.path()).contains("Water plants|2099-01-01|Low|In Progress|false"));
    run_todo_ok(tmp.path(), &["done", "2"]);
    assert!(data_file(tmp.path()).contains("Pay rent|2000-01-01|High|Completed|false"));
    run_todo_ok(tmp.path(), &["status", "2", "pending"]);
    assert!(data_file(tmp.path()).contains("Pay rent|2000-01-01|High|Pending|false"));

    let (_, stderr, ok) = run_todo(tmp.path(), &["status", "1", "sleeping"]);
    assert!(!ok);
    assert!(stderr.contains("unknown status"));
}

#[test]
fn test_sort_toggle_is_persisted() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    assert_eq!(run_todo_ok(tmp.path(), &["sort", "name"]).trim(), "sorted by name (descending)");
    assert_eq!(
        listed_names(tmp.path(), &[]),
        vec!["Call plumber", "Water plants", "Pay rent"]
    );
    assert_eq!(run_todo_ok(tmp.path(), &["sort", "priority"]).trim(), "sorted by priority (ascending)");
    assert!(tmp.path().join(".state.json").exists());

    let (_, stderr, ok) = run_todo(tmp.path(), &["sort", "owner"]);
    assert!(!ok);
    assert!(stderr.contains("unknown sort column"));
}

// ---------------------------------------------------------------------------
// Transfer tests
// ---------------------------------------------------------------------------

#[test]
fn test_export_csv_and_reimport() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    let out = run_todo_ok(tmp.path(), &["export", "out", "--format", "csv"]);
    assert!(out.contains("exported 3 tasks"));
    let csv = fs::read_to_string(tmp.path().join("out.csv")).unwrap();
    assert!(csv.starts_with("Task,DueDate,Priority,Status,Pinned\n"));
    assert!(csv.contains("Call plumber,,Medium,Completed,true"));

    let out = run_todo_ok(tmp.path(), &["import", "out.csv", "--replace"]);
    assert_eq!(out.trim(), "imported 3 tasks");
    assert_eq!(
        listed_names(tmp.path(), &[]),
        vec!["Call plumber", "Pay rent", "Water plants"]
    );
}

#[test]
fn test_export_text_summary() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());

    run_todo_ok(tmp.path(), &["export", "report.txt"]);
    let text = fs::read_to_string(tmp.path().join("report.txt")).unwrap();
    assert!(text.starts_with("# Todo List Export\n"));
    assert!(text.contains("Pay rent|2000-01-01|High|Pending\n"));
    assert!(text.contains("# Total tasks exported: 3"));
    assert!(text.contains("# Completion rate: 33.3%"));
}

#[test]
fn test_import_append_and_skipped_lines() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    fs::write(
        tmp.path().join("more.txt"),
        "# extra\nFile taxes|2025-04-15|High|Pending|true\nnot a task\n",
    )
    .unwrap();

    let out = run_todo_ok(tmp.path(), &["import", "more.txt"]);
    assert!(out.contains("imported 1 tasks (1 lines skipped"));
    assert_eq!(
        listed_names(tmp.path(), &[]),
        vec!["Call plumber", "File taxes", "Pay rent", "Water plants"]
    );

    let out = run_todo_ok(tmp.path(), &["recovery"]);
    assert!(out.contains("[import] skipped lines"));
}

#[test]
fn test_import_nothing_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_list(tmp.path());
    fs::write(tmp.path().join("empty.txt"), "# nothing\n").unwrap();

    let (_, stderr, ok) = run_todo(tmp.path(), &["import", "empty.txt", "--replace"]);
    assert!(!ok);
    assert!(stderr.contains("no valid tasks found"));
    assert!(data_file(tmp.path()).contains("Water plants"));
}

// ---------------------------------------------------------------------------
// Settings and maintenance
// ---------------------------------------------------------------------------

#[test]
fn test_config_show_and_set() {
    let tmp = tempfile::TempDir::new().unwrap();
    assert_eq!(run_todo_ok(tmp.path(), &["config"]).trim(), "auto_fill_today = true");

    run_todo_ok(tmp.path(), &["config", "auto-fill-today", "off"]);
    assert_eq!(run_todo_ok(tmp.path(), &["config"]).trim(), "auto_fill_today = false");
    let toml = fs::read_to_string(tmp.path().join("todo.toml")).unwrap();
    assert!(toml.contains("auto_fill_today = false"));
}

#[test]
fn test_recovery_log_from_damaged_file() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("data.txt"), "Good||Low|Pending|false\nbad|line\n").unwrap();

    run_todo_ok(tmp.path(), &["list"]);
    run_todo_ok(tmp.path(), &["stats"]);
    run_todo_ok(tmp.path(), &["list"]);
    let out = run_todo_ok(tmp.path(), &["recovery", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 1);
    assert_eq!(parsed[0]["category"], "parser");
    assert_eq!(parsed[0]["description"], "skipped lines");

    let out = run_todo_ok(tmp.path(), &["recovery", "prune", "--all"]);
    assert_eq!(out.trim(), "pruned 1 entries");
    assert_eq!(run_todo_ok(tmp.path(), &["recovery"]).trim(), "recovery log is empty");
}

#[test]
fn test_project_dir_flag() {
    let tmp = tempfile::TempDir::new().unwrap();
    let list_dir = tmp.path().join("lists");
    fs::create_dir(&list_dir).unwrap();
    create_test_list(&list_dir);

    let out = run_todo_ok(tmp.path(), &["-C", "lists", "list"]);
    assert!(out.contains("Pay rent"));

    let (_, stderr, ok) = run_todo(tmp.path(), &["-C", "missing", "list"]);
    assert!(!ok);
    assert!(stderr.contains("cannot resolve -C path"));
}
