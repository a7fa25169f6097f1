use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::io::recovery::atomic_write;
use crate::ops::ordering::SortKey;

pub const STATE_FILENAME: &str = ".state.json";

/// View state carried between runs (written to .state.json)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UiState {
    /// Active sort column and direction
    #[serde(default)]
    pub sort: SortKey,
}

/// Read .state.json from the data directory
pub fn read_ui_state(data_dir: &Path) -> Option<UiState> {
    let content = fs::read_to_string(data_dir.join(STATE_FILENAME)).ok()?;
    serde_json::from_str(&content).ok()
}

/// Read the saved state, or the default when missing or unreadable
pub fn load_ui_state(data_dir: &Path) -> UiState {
    read_ui_state(data_dir).unwrap_or_default()
}

/// Write .state.json to the data directory
pub fn write_ui_state(data_dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let content = serde_json::to_string_pretty(state)?;
    atomic_write(&data_dir.join(STATE_FILENAME), content.as_bytes())
}
