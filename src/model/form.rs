use chrono::NaiveDate;

use crate::model::task::{Priority, Status, Task, parse_date};

/// Error type for task form validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("task name cannot be empty")]
    EmptyName,
    #[error("task name must fit on one line")]
    MultiLineName,
    #[error("due date must be in YYYY-MM-DD format: {0}")]
    InvalidDate(String),
}

/// Fields entered for a new or edited task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    pub name: String,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub status: Status,
}

/// Outcome of an add/edit interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskFormResult {
    Confirmed(TaskForm),
    Cancelled,
}

impl TaskForm {
    /// Validate raw user input. The name is trimmed and may not contain a
    /// line break; the due date may be blank or a strict `YYYY-MM-DD` date.
    pub fn validate(
        name: &str,
        due_date: &str,
        priority: Priority,
        status: Status,
    ) -> Result<TaskForm, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if name.contains(['\n', '\r']) {
            return Err(ValidationError::MultiLineName);
        }
        let due_date = match due_date.trim() {
            "" => None,
            text => Some(
                parse_date(text).ok_or_else(|| ValidationError::InvalidDate(text.to_string()))?,
            ),
        };
        Ok(TaskForm {
            name: name.to_string(),
            due_date,
            priority,
            status,
        })
    }

    /// Start a form from an existing task (for editing)
    pub fn from_task(task: &Task) -> TaskForm {
        TaskForm {
            name: task.name.clone(),
            due_date: task.due_date,
            priority: task.priority.clone(),
            status: task.status.clone(),
        }
    }

    /// Build the task this form describes. Pin state is owned by the pin set.
    pub fn into_task(self) -> Task {
        Task {
            name: self.name,
            due_date: self.due_date,
            priority: self.priority,
            status: self.status,
            pinned: false,
        }
    }
}
