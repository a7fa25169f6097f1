//! Display ordering: pinned rows first in pin order, everything else by the
//! active sort column.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::pin_set::PinSet;
use crate::model::task::Task;

/// A sortable column of the task list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    #[default]
    Name,
    DueDate,
    Priority,
    Status,
}

impl SortColumn {
    pub const ALL: [SortColumn; 4] = [
        SortColumn::Name,
        SortColumn::DueDate,
        SortColumn::Priority,
        SortColumn::Status,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortColumn::Name => "name",
            SortColumn::DueDate => "due",
            SortColumn::Priority => "priority",
            SortColumn::Status => "status",
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" | "task" => Ok(SortColumn::Name),
            "due" | "date" | "due_date" | "duedate" => Ok(SortColumn::DueDate),
            "priority" => Ok(SortColumn::Priority),
            "status" => Ok(SortColumn::Status),
            _ => Err(format!(
                "unknown sort column '{}' (expected name, due, priority, status)",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// The single active sort key. Defaults to name, ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortKey {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        SortKey { column, direction }
    }

    /// Selecting the active column flips direction; any other column
    /// becomes active, ascending.
    pub fn toggle(&mut self, column: SortColumn) {
        if self.column == column {
            self.direction = self.direction.flipped();
        } else {
            *self = SortKey::new(column, SortDirection::Ascending);
        }
    }
}

/// Absent due dates sort after every present one; two absent dates are equal
pub fn compare_due_dates(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Compare two tasks on one column, ascending
pub fn compare_column(column: SortColumn, a: &Task, b: &Task) -> Ordering {
    match column {
        SortColumn::Name => a.name.cmp(&b.name),
        SortColumn::DueDate => compare_due_dates(a.due_date, b.due_date),
        SortColumn::Priority => a.priority.rank().cmp(&b.priority.rank()),
        SortColumn::Status => a.status.rank().cmp(&b.status.rank()),
    }
}

/// Compare two model rows for display.
///
/// Pinned rows precede unpinned rows and are ordered among themselves by pin
/// order; neither rule depends on the sort key. Unpinned rows compare on the
/// active column, with the direction applied to that comparison only.
pub fn compare_rows(tasks: &[Task], pins: &PinSet, key: SortKey, a: usize, b: usize) -> Ordering {
    match (pins.position(a), pins.position(b)) {
        (Some(pa), Some(pb)) => pa.cmp(&pb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => {
            let ord = compare_column(key.column, &tasks[a], &tasks[b]);
            match key.direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        }
    }
}

/// Sort a set of model rows (e.g. the rows left after filtering) into
/// display order. Ties keep model order.
pub fn sort_view(tasks: &[Task], pins: &PinSet, key: SortKey, rows: &mut [usize]) {
    rows.sort_by(|&a, &b| compare_rows(tasks, pins, key, a, b));
}

/// Display order of every model row
pub fn display_order(tasks: &[Task], pins: &PinSet, key: SortKey) -> Vec<usize> {
    let mut rows: Vec<usize> = (0..tasks.len()).collect();
    sort_view(tasks, pins, key, &mut rows);
    rows
}
