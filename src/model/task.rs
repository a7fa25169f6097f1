use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Date format used everywhere a due date is stored or displayed
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Task priority. Unrecognized text is kept verbatim and ranks last.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
    Other(String),
}

impl Priority {
    /// Fixed sort rank: High=0, Medium=1, Low=2, anything else=3
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
            Priority::Other(_) => 3,
        }
    }

    /// Parse stored text. Empty text means the default (`Medium`).
    pub fn parse(s: &str) -> Priority {
        match s.trim() {
            "" | "Medium" => Priority::Medium,
            "High" => Priority::High,
            "Low" => Priority::Low,
            other => Priority::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
            Priority::Other(s) => s,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task status. Unrecognized text is kept verbatim and ranks last.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Status {
    InProgress,
    #[default]
    Pending,
    Completed,
    Other(String),
}

impl Status {
    /// Fixed sort rank: In Progress=0, Pending=1, Completed=2, anything else=3
    pub fn rank(&self) -> u8 {
        match self {
            Status::InProgress => 0,
            Status::Pending => 1,
            Status::Completed => 2,
            Status::Other(_) => 3,
        }
    }

    /// Parse stored text. Empty text means the default (`Pending`).
    pub fn parse(s: &str) -> Status {
        match s.trim() {
            "" | "Pending" => Status::Pending,
            "In Progress" => Status::InProgress,
            "Completed" => Status::Completed,
            other => Status::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Status::InProgress => "In Progress",
            Status::Pending => "Pending",
            Status::Completed => "Completed",
            Status::Other(s) => s,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Both enums travel as their display text in JSON output and state files.
macro_rules! text_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Ok(<$ty>::parse(&s))
            }
        }
    };
}

text_serde!(Priority);
text_serde!(Status);

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    /// Absent due dates sort after every present one
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub status: Status,
    /// Synced from the store's pin set on save and load; the pin set is
    /// authoritative in between.
    #[serde(default)]
    pub pinned: bool,
}

impl Task {
    /// Create a task with the default priority and status, unpinned
    pub fn new(name: impl Into<String>) -> Self {
        Task {
            name: name.into(),
            due_date: None,
            priority: Priority::default(),
            status: Status::default(),
            pinned: false,
        }
    }

    pub fn with_due(mut self, due: NaiveDate) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Due date formatted as `YYYY-MM-DD`, or empty
    pub fn due_date_text(&self) -> String {
        self.due_date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default()
    }

    /// Overdue means a due date strictly before `today` on a task that is not completed
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.due_date {
            Some(due) => self.status != Status::Completed && due < today,
            None => false,
        }
    }

    /// Tasks with a blank name are never written to disk
    pub fn has_valid_name(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// Parse a strict `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if !is_date_shaped(s) {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

static DATE_SHAPE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap());

/// `YYYY-MM-DD` with ASCII digits, whether or not it names a real day
pub fn is_date_shaped(s: &str) -> bool {
    DATE_SHAPE_RE.is_match(s)
}
