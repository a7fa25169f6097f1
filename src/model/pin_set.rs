use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Insertion-ordered set of pinned model row indices.
///
/// Pins are positional: a pin refers to whatever task currently sits at that
/// row, so every removal of a row must go through [`PinSet::remove_row`] to
/// keep the pins attached to the same tasks. Iteration order is pin order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinSet {
    rows: IndexSet<usize>,
}

impl PinSet {
    pub fn new() -> Self {
        PinSet::default()
    }

    /// Build a pin set from per-row flags, pinning rows in ascending order
    pub fn from_flags<I>(flags: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        let rows = flags
            .into_iter()
            .enumerate()
            .filter_map(|(row, pinned)| pinned.then_some(row))
            .collect();
        PinSet { rows }
    }

    pub fn contains(&self, row: usize) -> bool {
        self.rows.contains(&row)
    }

    /// Pin a row at the end of the pin order. Returns false if already pinned.
    pub fn pin(&mut self, row: usize) -> bool {
        self.rows.insert(row)
    }

    /// Unpin a row, keeping the relative order of the remaining pins
    pub fn unpin(&mut self, row: usize) -> bool {
        self.rows.shift_remove(&row)
    }

    /// Flip a row's pin state. Returns the new state.
    pub fn toggle(&mut self, row: usize) -> bool {
        if self.unpin(row) {
            false
        } else {
            self.pin(row);
            true
        }
    }

    /// Position of `row` in pin order, if pinned
    pub fn position(&self, row: usize) -> Option<usize> {
        self.rows.get_index_of(&row)
    }

    /// Account for the model row at `deleted` being removed: drop its pin and
    /// shift every later pinned row down by one. Pin order is unchanged.
    pub fn remove_row(&mut self, deleted: usize) {
        self.rows = self
            .rows
            .iter()
            .filter(|&&row| row != deleted)
            .map(|&row| if row > deleted { row - 1 } else { row })
            .collect();
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Pinned rows in pin order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows.iter().copied()
    }
}
