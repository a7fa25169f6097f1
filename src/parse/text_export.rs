use chrono::NaiveDateTime;

use crate::model::task::Task;
use crate::ops::stats::task_stats;
use crate::parse::data_file::TIMESTAMP_FORMAT;
use crate::parse::task_line::format_task_line;

/// Serialize tasks as a human-readable export: the data file body without
/// the pin column, followed by a summary block in comment lines. The result
/// reads back with `parse_data_file`.
pub fn serialize_text_export(tasks: &[Task], generated: NaiveDateTime) -> String {
    let tasks: Vec<Task> = tasks.iter().filter(|t| t.has_valid_name()).cloned().collect();
    let stats = task_stats(&tasks);

    let mut lines = vec![
        "# Todo List Export".to_string(),
        "# Format: Task Name|Due Date|Priority|Status".to_string(),
        format!("# Generated on: {}", generated.format(TIMESTAMP_FORMAT)),
        String::new(),
    ];
    lines.extend(tasks.iter().map(|t| format_task_line(t, false)));
    lines.push(String::new());
    lines.push("# Export Summary:".to_string());
    lines.push(format!("# Total tasks exported: {}", stats.total));
    lines.push(format!(
        "# Completed: {}, In Progress: {}, Pending: {}",
        stats.completed,
        stats.in_progress,
        stats.not_started()
    ));
    lines.push(format!(
        "# Completion rate: {:.1}%",
        stats.completion_percentage()
    ));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
