use crate::io::storage::{StorageError, TaskStorage};
use crate::model::pin_set::PinSet;
use crate::model::task::{Status, Task};

/// Error type for index-checked store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no task at index {0}")]
    IndexOutOfRange(usize),
}

/// Whether imported tasks replace the list or join it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    Replace,
    Append,
}

/// The authoritative, ordered task list with its pins and dirty flag.
///
/// Row indices are model indices. Every mutation that changes something
/// marks the store dirty; a successful save or load clears it.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    pins: PinSet,
    unsaved: bool,
}

impl TaskStore {
    pub fn new() -> Self {
        TaskStore::default()
    }

    /// Build a store from tasks, pinning rows whose `pinned` flag is set.
    /// The result starts clean.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let pins = PinSet::from_flags(tasks.iter().map(|t| t.pinned));
        TaskStore {
            tasks,
            pins,
            unsaved: false,
        }
    }

    // -----------------------------------------------------------------------
    // CRUD
    // -----------------------------------------------------------------------

    /// Append a task. `None` is ignored and leaves the store clean.
    pub fn add(&mut self, task: Option<Task>) {
        if let Some(task) = task {
            self.tasks.push(task);
            self.mark_changed();
        }
    }

    /// Replace the task at `index`; out-of-range indices are a no-op.
    pub fn update(&mut self, index: usize, task: Task) {
        if let Some(slot) = self.tasks.get_mut(index) {
            *slot = task;
            self.mark_changed();
        }
    }

    /// Remove the task at `index`, renumbering pins so they stay on the same
    /// tasks. Out-of-range indices are a no-op.
    pub fn delete(&mut self, index: usize) {
        if index < self.tasks.len() {
            self.tasks.remove(index);
            self.pins.remove_row(index);
            self.mark_changed();
        }
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
        self.pins.clear();
        self.mark_changed();
    }

    /// Index-checked [`TaskStore::update`]
    pub fn try_update(&mut self, index: usize, task: Task) -> Result<(), StoreError> {
        self.check_index(index)?;
        self.update(index, task);
        Ok(())
    }

    /// Index-checked [`TaskStore::delete`]. Returns the removed task.
    pub fn try_delete(&mut self, index: usize) -> Result<Task, StoreError> {
        let task = self.get(index).cloned().ok_or(StoreError::IndexOutOfRange(index))?;
        self.delete(index);
        Ok(task)
    }

    /// Quick status change
    pub fn set_status(&mut self, index: usize, status: Status) -> Result<(), StoreError> {
        let task = self
            .tasks
            .get_mut(index)
            .ok_or(StoreError::IndexOutOfRange(index))?;
        task.status = status;
        self.mark_changed();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Access
    // -----------------------------------------------------------------------

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    /// Copy of every task with `pinned` synced from the pin set
    pub fn all(&self) -> Vec<Task> {
        self.tasks
            .iter()
            .enumerate()
            .map(|(row, task)| Task {
                pinned: self.pins.contains(row),
                ..task.clone()
            })
            .collect()
    }

    /// Borrowed view in model order. `pinned` flags may be stale; use
    /// [`TaskStore::pins`] or [`TaskStore::all`].
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn pins(&self) -> &PinSet {
        &self.pins
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn check_index(&self, index: usize) -> Result<(), StoreError> {
        if index < self.tasks.len() {
            Ok(())
        } else {
            Err(StoreError::IndexOutOfRange(index))
        }
    }

    // -----------------------------------------------------------------------
    // Pins
    // -----------------------------------------------------------------------

    /// Flip the pin on a row. Returns the new pin state.
    pub fn toggle_pin(&mut self, index: usize) -> Result<bool, StoreError> {
        self.check_index(index)?;
        let pinned = self.pins.toggle(index);
        self.mark_changed();
        Ok(pinned)
    }

    // -----------------------------------------------------------------------
    // Bulk
    // -----------------------------------------------------------------------

    /// Bring in tasks from an import. `Replace` clears tasks and pins first;
    /// `Append` adds after the existing rows and pins flagged tasks at their
    /// new indices. Returns the number of tasks added.
    pub fn import(&mut self, tasks: Vec<Task>, mode: ImportMode) -> usize {
        if mode == ImportMode::Replace {
            self.tasks.clear();
            self.pins.clear();
        }
        let count = tasks.len();
        for task in tasks {
            let row = self.tasks.len();
            if task.pinned {
                self.pins.pin(row);
            }
            self.tasks.push(task);
        }
        self.mark_changed();
        count
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Write every task to storage with pin flags synced. Clears the dirty
    /// flag on success; on failure the store is untouched.
    pub fn save(&mut self, storage: &TaskStorage) -> Result<usize, StorageError> {
        let written = storage.save(&self.all())?;
        self.unsaved = false;
        Ok(written)
    }

    /// Replace contents with what storage holds, rebuilding the pin set from
    /// the stored flags. On failure the current contents stay. Returns
    /// whether any tasks were loaded.
    pub fn load(&mut self, storage: &TaskStorage) -> Result<bool, StorageError> {
        let tasks = storage.load()?;
        *self = TaskStore::from_tasks(tasks);
        Ok(!self.tasks.is_empty())
    }

    // -----------------------------------------------------------------------
    // Change tracking
    // -----------------------------------------------------------------------

    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    pub fn mark_changed(&mut self) {
        self.unsaved = true;
    }

    pub fn mark_saved(&mut self) {
        self.unsaved = false;
    }
}
