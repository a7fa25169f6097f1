use chrono::NaiveDate;
use regex::Regex;

use crate::model::pin_set::PinSet;
use crate::model::task::{Priority, Status, Task};

/// Build a case-insensitive matcher for a search box entry. Text that is not
/// a valid regex is matched literally.
pub fn keyword_regex(text: &str) -> Option<Regex> {
    Regex::new(&format!("(?i){}", text))
        .or_else(|_| Regex::new(&format!("(?i){}", regex::escape(text))))
        .ok()
}

/// Row filter for the visible list. Filtering never touches model rows.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Matched against name, due date, priority and status
    pub pattern: Option<Regex>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub due_on: Option<NaiveDate>,
    pub pinned_only: bool,
    /// Keep only tasks overdue as of this date
    pub overdue_as_of: Option<NaiveDate>,
}

impl TaskFilter {
    pub fn with_keyword(mut self, text: &str) -> Self {
        let text = text.trim();
        self.pattern = if text.is_empty() {
            None
        } else {
            keyword_regex(text)
        };
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_on.is_none()
            && !self.pinned_only
            && self.overdue_as_of.is_none()
    }

    pub fn matches(&self, task: &Task, pinned: bool) -> bool {
        if let Some(ref re) = self.pattern {
            let due = task.due_date_text();
            let hit = [task.name.as_str(), due.as_str(), task.priority.as_str(), task.status.as_str()]
                .iter()
                .any(|field| re.is_match(field));
            if !hit {
                return false;
            }
        }
        if self.status.as_ref().is_some_and(|s| *s != task.status) {
            return false;
        }
        if self.priority.as_ref().is_some_and(|p| *p != task.priority) {
            return false;
        }
        if self.due_on.is_some() && self.due_on != task.due_date {
            return false;
        }
        if self.pinned_only && !pinned {
            return false;
        }
        match self.overdue_as_of {
            Some(today) => task.is_overdue(today),
            None => true,
        }
    }
}

/// Model rows that pass the filter, in model order
pub fn filter_rows(tasks: &[Task], pins: &PinSet, filter: &TaskFilter) -> Vec<usize> {
    tasks
        .iter()
        .enumerate()
        .filter(|(row, task)| filter.matches(task, pins.contains(*row)))
        .map(|(row, _)| row)
        .collect()
}
