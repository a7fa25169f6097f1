use chrono::NaiveDate;
use serde::Serialize;

use crate::model::pin_set::PinSet;
use crate::model::task::{Priority, Status, Task};
use crate::ops::stats::TaskStats;
use crate::parse::ParseIssue;
use crate::util::unicode::pad_to_width;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    /// Task number as accepted by write commands
    pub number: usize,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub priority: Priority,
    pub status: Status,
    pub pinned: bool,
    pub overdue: bool,
}

#[derive(Serialize)]
pub struct StatsJson {
    #[serde(flatten)]
    pub counts: TaskStats,
    pub pinned: usize,
    pub overdue: usize,
    pub completion_percentage: f64,
}

#[derive(Serialize)]
pub struct CheckIssueJson {
    pub line: usize,
    pub text: String,
    pub problem: String,
    pub dropped: bool,
}

#[derive(Serialize)]
pub struct CheckJson {
    pub path: String,
    pub exists: bool,
    pub valid: bool,
    pub tasks: usize,
    pub issues: Vec<CheckIssueJson>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(tasks: &[Task], pins: &PinSet, row: usize, today: NaiveDate) -> TaskJson {
    let task = &tasks[row];
    TaskJson {
        number: row + 1,
        name: task.name.clone(),
        due_date: task.due_date.map(|_| task.due_date_text()),
        priority: task.priority.clone(),
        status: task.status.clone(),
        pinned: pins.contains(row),
        overdue: task.is_overdue(today),
    }
}

pub fn issue_to_json(issue: &ParseIssue) -> CheckIssueJson {
    CheckIssueJson {
        line: issue.line_number,
        text: issue.text.clone(),
        problem: issue.issue.describe(),
        dropped: issue.issue.is_dropped(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

const NUMBER_WIDTH: usize = 3;
const NAME_WIDTH: usize = 32;
const DUE_WIDTH: usize = 10;
const PRIORITY_WIDTH: usize = 8;
const STATUS_WIDTH: usize = 11;

const PIN_MARKER: &str = "*";

fn table_row(number: &str, marker: &str, name: &str, due: &str, priority: &str, status: &str) -> String {
    format!(
        "{} {} {}  {}  {}  {}",
        pad_to_width(number, NUMBER_WIDTH),
        pad_to_width(marker, 1),
        pad_to_width(name, NAME_WIDTH),
        pad_to_width(due, DUE_WIDTH),
        pad_to_width(priority, PRIORITY_WIDTH),
        pad_to_width(status, STATUS_WIDTH),
    )
}

/// Render `rows` (model rows, already in display order) as a table.
/// Pinned rows carry `*`; overdue rows are flagged at the end of the line.
pub fn format_task_table(tasks: &[Task], pins: &PinSet, rows: &[usize], today: NaiveDate) -> Vec<String> {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(
        table_row("#", "", "Task", "Due", "Priority", "Status")
            .trim_end()
            .to_string(),
    );
    for &row in rows {
        let task = &tasks[row];
        let marker = if pins.contains(row) { PIN_MARKER } else { "" };
        let mut line = table_row(
            &(row + 1).to_string(),
            marker,
            &task.name,
            &task.due_date_text(),
            task.priority.as_str(),
            task.status.as_str(),
        );
        if task.is_overdue(today) {
            line.push_str("  overdue");
        }
        lines.push(line.trim_end().to_string());
    }
    lines
}

/// Human-readable statistics block
pub fn format_stats(stats: &TaskStats, pinned: usize, overdue: usize) -> Vec<String> {
    let mut lines = vec![
        format!("Total:       {}", stats.total),
        format!("Completed:   {}", stats.completed),
        format!("In Progress: {}", stats.in_progress),
        format!("Pending:     {}", stats.pending),
    ];
    if stats.other > 0 {
        lines.push(format!("Other:       {}", stats.other));
    }
    lines.push(format!("Pinned:      {}", pinned));
    lines.push(format!("Overdue:     {}", overdue));
    lines.push(format!("Completion:  {:.1}%", stats.completion_percentage()));
    lines
}

/// Parse a priority typed on the command line (case-insensitive)
pub fn parse_priority_arg(s: &str) -> Result<Priority, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "high" | "h" => Ok(Priority::High),
        "medium" | "med" | "m" => Ok(Priority::Medium),
        "low" | "l" => Ok(Priority::Low),
        _ => Err(format!(
            "unknown priority '{}' (expected: high, medium, low)",
            s
        )),
    }
}

/// Parse a status typed on the command line (case-insensitive)
pub fn parse_status_arg(s: &str) -> Result<Status, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "pending" | "todo" => Ok(Status::Pending),
        "in progress" | "in-progress" | "active" | "started" => Ok(Status::InProgress),
        "completed" | "done" => Ok(Status::Completed),
        _ => Err(format!(
            "unknown status '{}' (expected: pending, in-progress, completed)",
            s
        )),
    }
}

/// Parse a true/false argument
pub fn parse_bool_arg(s: &str) -> Result<bool, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" => Ok(true),
        "false" | "off" | "no" => Ok(false),
        _ => Err(format!("expected true or false, got '{}'", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn table_marks_pins_and_overdue() {
        let tasks = vec![
            Task::new("Pay rent")
                .with_due(date("2025-01-31"))
                .with_priority(Priority::High),
            Task::new("Buy groceries").with_status(Status::InProgress),
            Task::new("Renew passport before the summer trip")
                .with_due(date("2025-03-01"))
                .with_priority(Priority::Low)
                .with_status(Status::Completed),
        ];
        let mut pins = PinSet::new();
        pins.pin(0);

        let lines = format_task_table(&tasks, &pins, &[0, 1, 2], date("2025-02-15"));
        assert_snapshot!(lines.join("\n"), @r"
        #     Task                              Due         Priority  Status
        1   * Pay rent                          2025-01-31  High      Pending      overdue
        2     Buy groceries                                 Medium    In Progress
        3     Renew passport before the summe…  2025-03-01  Low       Completed
        ");
    }

    #[test]
    fn json_numbers_are_one_based() {
        let tasks = vec![Task::new("a"), Task::new("b")];
        let mut pins = PinSet::new();
        pins.pin(1);
        let json = task_to_json(&tasks, &pins, 1, date("2025-01-01"));
        assert_eq!(json.number, 2);
        assert!(json.pinned);
        assert!(json.due_date.is_none());
    }

    #[test]
    fn stats_block() {
        let stats = TaskStats {
            total: 4,
            in_progress: 1,
            pending: 2,
            completed: 1,
            other: 0,
        };
        let lines = format_stats(&stats, 1, 0);
        assert_eq!(lines.last().unwrap(), "Completion:  25.0%");
        assert!(!lines.iter().any(|l| l.starts_with("Other")));
    }

    #[test]
    fn cli_values_are_case_insensitive() {
        assert_eq!(parse_priority_arg("HIGH").unwrap(), Priority::High);
        assert_eq!(parse_status_arg("in-progress").unwrap(), Status::InProgress);
        assert_eq!(parse_status_arg("Done").unwrap(), Status::Completed);
        assert!(parse_priority_arg("urgent").is_err());
        assert!(parse_bool_arg("maybe").is_err());
        assert!(!parse_bool_arg("off").unwrap());
    }
}
