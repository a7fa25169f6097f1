use std::path::Path;

use crate::io::transfer::{TransferError, read_import};
use crate::ops::store::{ImportMode, TaskStore};

/// Result of an import operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportResult {
    /// Tasks added to the store
    pub imported: usize,
    /// Lines in the file that could not be used
    pub skipped: usize,
}

/// Read `path` and bring its tasks into `store`. The store is untouched when
/// the file cannot be read or holds no usable rows.
pub fn import_file(
    store: &mut TaskStore,
    path: &Path,
    data_dir: &Path,
    mode: ImportMode,
) -> Result<ImportResult, TransferError> {
    let parsed = read_import(path, data_dir)?;
    let skipped = parsed.dropped().count();
    let imported = store.import(parsed.tasks, mode);
    Ok(ImportResult { imported, skipped })
}
