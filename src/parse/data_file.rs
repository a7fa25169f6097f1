use chrono::NaiveDateTime;

use crate::model::task::Task;
use crate::parse::task_line::{LineIssue, MIN_FIELDS, format_task_line, parse_task_line, split_fields};

/// Timestamp format of the `# Generated:` header line
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A stored line the parser could not fully use
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// 1-based line number in the source
    pub line_number: usize,
    pub text: String,
    pub issue: LineIssue,
}

/// Tasks recovered from a source plus everything that went wrong on the way
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTasks {
    pub tasks: Vec<Task>,
    pub issues: Vec<ParseIssue>,
}

impl ParsedTasks {
    /// Issues whose line was discarded
    pub fn dropped(&self) -> impl Iterator<Item = &ParseIssue> {
        self.issues.iter().filter(|i| i.issue.is_dropped())
    }
}

/// Blank and `#` lines are never data
pub fn is_comment_or_blank(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Parse a data file (or plain-text export) line by line. Bad lines are
/// reported and skipped; parsing never stops early.
pub fn parse_data_file(source: &str) -> ParsedTasks {
    let mut parsed = ParsedTasks::default();

    for (idx, line) in source.lines().enumerate() {
        if is_comment_or_blank(line) {
            continue;
        }
        match parse_task_line(line) {
            Ok((task, issue)) => {
                parsed.tasks.push(task);
                if let Some(issue) = issue {
                    parsed.issues.push(ParseIssue {
                        line_number: idx + 1,
                        text: line.to_string(),
                        issue,
                    });
                }
            }
            Err(issue) => parsed.issues.push(ParseIssue {
                line_number: idx + 1,
                text: line.to_string(),
                issue,
            }),
        }
    }

    parsed
}

/// Serialize tasks as a data file: comment header, blank line, then one
/// line per task in the given order. Tasks with blank names are left out.
pub fn serialize_data_file(tasks: &[Task], generated: NaiveDateTime) -> String {
    let mut lines = vec![
        "# Todo List App Data".to_string(),
        "# Format: TaskName|DueDate|Priority|Status|IsPinned".to_string(),
        format!("# Generated: {}", generated.format(TIMESTAMP_FORMAT)),
        String::new(),
    ];

    lines.extend(
        tasks
            .iter()
            .filter(|t| t.has_valid_name())
            .map(|t| format_task_line(t, true)),
    );

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// True when every data line has enough fields and a non-blank name
pub fn validate_data_file(source: &str) -> bool {
    source.lines().filter(|l| !is_comment_or_blank(l)).all(|line| {
        let fields = split_fields(line);
        fields.len() >= MIN_FIELDS && !fields[0].trim().is_empty()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{Priority, Status};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn generated() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn serialize_writes_header_and_rows() {
        let mut pinned = Task::new("Taxes").with_priority(Priority::High);
        pinned.pinned = true;
        let tasks = vec![pinned, Task::new("   "), Task::new("Laundry").with_status(Status::Completed)];

        insta::assert_snapshot!(serialize_data_file(&tasks, generated()), @r"
        # Todo List App Data
        # Format: TaskName|DueDate|Priority|Status|IsPinned
        # Generated: 2025-05-01 09:30:00

        Taxes||High|Pending|true
        Laundry||Medium|Completed|false
        ");
    }

    #[test]
    fn serialize_empty_list_is_header_only() {
        let out = serialize_data_file(&[], generated());
        assert_eq!(parse_data_file(&out), ParsedTasks::default());
        assert!(out.starts_with("# Todo List App Data\n"));
    }

    #[test]
    fn parse_skips_comments_and_reports_bad_lines() {
        let source = "\
# header
   # indented comment

Good|2025-02-03|Low|Pending|false
bad|line
Late|31-12-2025|High|Pending
";
        let parsed = parse_data_file(source);
        assert_eq!(parsed.tasks.len(), 2);
        assert_eq!(parsed.tasks[0].name, "Good");
        assert_eq!(parsed.tasks[1].name, "Late");
        assert!(parsed.tasks[1].due_date.is_none());

        assert_eq!(parsed.issues.len(), 2);
        assert_eq!(parsed.issues[0].line_number, 5);
        assert_eq!(parsed.issues[0].issue, LineIssue::TooFewFields { found: 2 });
        assert_eq!(parsed.issues[1].issue, LineIssue::InvalidDate("31-12-2025".into()));
        assert_eq!(parsed.dropped().count(), 1);
    }

    #[test]
    fn validate_flags_short_or_nameless_lines() {
        assert!(validate_data_file("# only comments\n\n"));
        assert!(validate_data_file("a|||\nb|2025-01-01|Low|Pending|true\n"));
        assert!(!validate_data_file("a|||\nb|c\n"));
        assert!(!validate_data_file(" |2025-01-01|Low|Pending\n"));
    }
}
