use crate::model::task::{Priority, Status, Task, parse_date};

/// Field separator for data file lines
pub const SEPARATOR: char = '|';

/// Minimum number of fields a data line must carry
pub const MIN_FIELDS: usize = 4;

/// Why a stored line was dropped or only partially understood
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineIssue {
    /// Fewer than the required fields; the line is skipped
    TooFewFields { found: usize },
    /// The due date did not parse; the task is kept without one
    InvalidDate(String),
}

impl LineIssue {
    pub fn describe(&self) -> String {
        match self {
            LineIssue::TooFewFields { found } => {
                format!("expected at least {} fields, found {}", MIN_FIELDS, found)
            }
            LineIssue::InvalidDate(text) => format!("invalid date: {}", text),
        }
    }

    /// Whether the line was discarded entirely
    pub fn is_dropped(&self) -> bool {
        matches!(self, LineIssue::TooFewFields { .. })
    }
}

/// Escape a task name so it fits on one data line: `\` becomes `\\`,
/// `|` becomes `\|`, and line breaks become `\n` / `\r`.
pub fn escape_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            SEPARATOR => out.push_str("\\|"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

/// Reverse of [`escape_name`], in one left-to-right pass. A backslash
/// before any other character is kept as written.
pub fn unescape_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('\\') => out.push('\\'),
            Some(&SEPARATOR) => out.push(SEPARATOR),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            _ => {
                out.push('\\');
                continue;
            }
        }
        chars.next();
    }
    out
}

/// Split a data line on unescaped `|`, keeping empty trailing fields.
/// A backslash escapes the character after it. Escapes are left in place;
/// only the name field is unescaped later.
pub fn split_fields(line: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == SEPARATOR {
            fields.push(&line[start..i]);
            start = i + c.len_utf8();
        }
    }
    fields.push(&line[start..]);
    fields
}

/// Format a task as one data line. `with_pin` appends the `IsPinned` column.
pub fn format_task_line(task: &Task, with_pin: bool) -> String {
    let mut line = format!(
        "{}|{}|{}|{}",
        escape_name(&task.name),
        task.due_date_text(),
        task.priority,
        task.status,
    );
    if with_pin {
        line.push(SEPARATOR);
        line.push_str(if task.pinned { "true" } else { "false" });
    }
    line
}

/// Build a task from already-split fields (pipe or CSV). Missing or empty
/// priority/status fall back to `Medium`/`Pending`; a missing or unreadable
/// pin flag is `false`. A bad date keeps the task and reports the problem.
pub fn task_from_fields(fields: &[&str], name: String) -> Result<(Task, Option<LineIssue>), LineIssue> {
    if fields.len() < MIN_FIELDS {
        return Err(LineIssue::TooFewFields {
            found: fields.len(),
        });
    }

    let mut task = Task::new(name);
    task.priority = Priority::parse(fields[2]);
    task.status = Status::parse(fields[3]);
    task.pinned = fields
        .get(4)
        .is_some_and(|flag| flag.trim().eq_ignore_ascii_case("true"));

    let mut issue = None;
    let due = fields[1].trim();
    if !due.is_empty() {
        match parse_date(due) {
            Some(date) => task.due_date = Some(date),
            None => issue = Some(LineIssue::InvalidDate(due.to_string())),
        }
    }

    Ok((task, issue))
}

/// Parse one pipe-delimited data line
pub fn parse_task_line(line: &str) -> Result<(Task, Option<LineIssue>), LineIssue> {
    let fields = split_fields(line);
    let name = fields.first().map(|n| unescape_name(n)).unwrap_or_default();
    task_from_fields(&fields, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn split_keeps_trailing_empty_fields() {
        assert_eq!(split_fields("a||Low|"), vec!["a", "", "Low", ""]);
    }

    #[test]
    fn split_ignores_escaped_separator() {
        assert_eq!(
            split_fields("A\\|B|2025-01-01|High|Pending|true"),
            vec!["A\\|B", "2025-01-01", "High", "Pending", "true"]
        );
    }

    #[test]
    fn escape_round_trip() {
        assert_eq!(escape_name("A|B"), "A\\|B");
        assert_eq!(unescape_name("A\\|B"), "A|B");
        for name in ["C:\\temp\\", "a\\|b", "\\\\|", "line one\nline two", "cr\r\n", "plain"] {
            assert_eq!(unescape_name(&escape_name(name)), name);
        }
    }

    #[test]
    fn unescape_keeps_unknown_escapes() {
        assert_eq!(unescape_name("C:\\temp"), "C:\\temp");
        assert_eq!(unescape_name("trailing\\"), "trailing\\");
    }

    #[test]
    fn split_after_escaped_backslash() {
        assert_eq!(
            split_fields("C:\\temp\\\\||High|Pending|false"),
            vec!["C:\\temp\\\\", "", "High", "Pending", "false"]
        );
    }

    #[test]
    fn backslash_and_newline_names_round_trip() {
        for name in ["C:\\temp\\", "a\\|b", "ends with \\|", "line one\nline two"] {
            let task = Task::new(name).with_priority(Priority::High);
            let line = format_task_line(&task, true);
            assert!(!line.contains('\n'));
            let (back, issue) = parse_task_line(&line).unwrap();
            assert!(issue.is_none());
            assert_eq!(back, task);
        }
    }

    #[test]
    fn parse_full_line() {
        let (task, issue) = parse_task_line("Pay rent|2025-07-01|High|In Progress|true").unwrap();
        assert!(issue.is_none());
        assert_eq!(task.name, "Pay rent");
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2025, 7, 1));
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.status, Status::InProgress);
        assert!(task.pinned);
    }

    #[test]
    fn parse_four_fields_defaults_pin() {
        let (task, _) = parse_task_line("Walk dog|||").unwrap();
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.status, Status::Pending);
        assert!(!task.pinned);
        assert!(task.due_date.is_none());
    }

    #[test]
    fn parse_unreadable_pin_is_false() {
        let (task, _) = parse_task_line("Walk dog||Low|Pending|yes").unwrap();
        assert!(!task.pinned);
    }

    #[test]
    fn parse_bad_date_keeps_task() {
        let (task, issue) = parse_task_line("Dentist|next week|Low|Pending").unwrap();
        assert_eq!(task.name, "Dentist");
        assert!(task.due_date.is_none());
        assert_eq!(issue, Some(LineIssue::InvalidDate("next week".into())));
    }

    #[test]
    fn parse_too_few_fields() {
        let err = parse_task_line("only|two").unwrap_err();
        assert_eq!(err, LineIssue::TooFewFields { found: 2 });
        assert!(err.is_dropped());
    }

    #[test]
    fn format_escapes_name_only() {
        let task = Task::new("A|B").with_priority(Priority::Low);
        assert_eq!(format_task_line(&task, true), "A\\|B||Low|Pending|false");
        assert_eq!(format_task_line(&task, false), "A\\|B||Low|Pending");
    }
}
