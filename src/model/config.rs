use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::form::TaskForm;
use crate::model::task::{Priority, Status};

/// Configuration from todo.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub preferences: Preferences,
}

/// User preferences that shape new-task defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Pre-fill today's date as the due date of a new task
    #[serde(default = "default_true")]
    pub auto_fill_today: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            auto_fill_today: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Preferences {
    /// The form a new task starts from
    pub fn new_task_form(&self, today: NaiveDate) -> TaskForm {
        TaskForm {
            name: String::new(),
            due_date: self.auto_fill_today.then_some(today),
            priority: Priority::Medium,
            status: Status::Pending,
        }
    }
}
