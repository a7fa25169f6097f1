use serde::Serialize;

use crate::model::task::{Status, Task};

/// Task counts by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub in_progress: usize,
    pub pending: usize,
    pub completed: usize,
    /// Tasks whose status text is not one of the known values
    pub other: usize,
}

impl TaskStats {
    /// Percentage of tasks completed; 0.0 for an empty list
    pub fn completion_percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 * 100.0 / self.total as f64
        }
    }

    /// Everything neither completed nor in progress
    pub fn not_started(&self) -> usize {
        self.pending + self.other
    }
}

pub fn task_stats(tasks: &[Task]) -> TaskStats {
    let mut stats = TaskStats {
        total: tasks.len(),
        ..Default::default()
    };
    for task in tasks {
        match task.status {
            Status::InProgress => stats.in_progress += 1,
            Status::Pending => stats.pending += 1,
            Status::Completed => stats.completed += 1,
            Status::Other(_) => stats.other += 1,
        }
    }
    stats
}
