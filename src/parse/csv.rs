use crate::model::task::Task;
use crate::parse::data_file::{ParseIssue, ParsedTasks};
use crate::parse::task_line::task_from_fields;

/// Header row of the CSV export
pub const CSV_HEADER: &str = "Task,DueDate,Priority,Status,Pinned";

/// Quote a field if it contains a comma, a quote or a line break
pub fn escape_csv(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Split one CSV line, honoring double-quoted fields and `""` escapes
pub fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

/// Serialize tasks as CSV with a header row. Every task is written, in order.
pub fn serialize_csv(tasks: &[Task]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for task in tasks {
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            escape_csv(&task.name),
            escape_csv(&task.due_date_text()),
            escape_csv(task.priority.as_str()),
            escape_csv(task.status.as_str()),
            task.pinned,
        ));
    }
    out
}

/// Group physical lines into records. A quoted field may span lines, so a
/// record stays open while it holds an odd number of quotes. Each record
/// carries the 1-based line it starts on.
fn csv_records(source: &str) -> Vec<(usize, String)> {
    let mut records = Vec::new();
    let mut open: Option<(usize, String)> = None;

    for (idx, line) in source.lines().enumerate() {
        let (start, record) = match open.take() {
            Some((start, mut record)) => {
                record.push('\n');
                record.push_str(line);
                (start, record)
            }
            None => (idx + 1, line.to_string()),
        };
        if record.matches('"').count() % 2 == 1 {
            open = Some((start, record));
        } else {
            records.push((start, record));
        }
    }
    records.extend(open);
    records
}

/// Parse CSV rows. A leading `Task,` header row and blank lines are skipped.
pub fn parse_csv(source: &str) -> ParsedTasks {
    let mut parsed = ParsedTasks::default();

    for (line_number, record) in csv_records(source) {
        if (line_number == 1 && record.starts_with("Task,")) || record.trim().is_empty() {
            continue;
        }
        let fields = split_csv_line(&record);
        let refs: Vec<&str> = fields.iter().map(String::as_str).collect();
        let name = refs.first().map(|n| n.to_string()).unwrap_or_default();
        let report = |issue| ParseIssue {
            line_number,
            text: record.clone(),
            issue,
        };
        match task_from_fields(&refs, name) {
            Ok((task, issue)) => {
                parsed.tasks.push(task);
                parsed.issues.extend(issue.map(report));
            }
            Err(issue) => parsed.issues.push(report(issue)),
        }
    }

    parsed
}
