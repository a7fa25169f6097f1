use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::io::recovery::{RecoveryCategory, atomic_write};
use crate::io::storage::log_parse_issues;
use crate::model::task::Task;
use crate::parse::{ParsedTasks, parse_csv, parse_data_file, serialize_csv, serialize_text_export};

/// Error type for export and import files
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("no valid tasks found in {0}")]
    NoTasks(PathBuf),
}

/// The two interchange formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    Csv,
    #[default]
    Text,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Text => "txt",
        }
    }

    /// Pick a format from a file name: `.csv` (any case) is CSV, anything
    /// else is the pipe-delimited text format.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => ExportFormat::Csv,
            _ => ExportFormat::Text,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Text => "text",
        })
    }
}

/// Append the format's extension unless the path already ends with it
pub fn export_path(path: &Path, format: ExportFormat) -> PathBuf {
    let ext = format.extension();
    let has_ext = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext));
    if has_ext {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_owned();
        name.push(".");
        name.push(ext);
        PathBuf::from(name)
    }
}

/// Write `tasks` to `path` in `format`. Returns the path actually written.
pub fn export_tasks(path: &Path, tasks: &[Task], format: ExportFormat) -> Result<PathBuf, TransferError> {
    let target = export_path(path, format);
    let content = match format {
        ExportFormat::Csv => serialize_csv(tasks),
        ExportFormat::Text => serialize_text_export(tasks, Local::now().naive_local()),
    };
    atomic_write(&target, content.as_bytes()).map_err(|e| TransferError::Write {
        path: target.clone(),
        source: e,
    })?;
    Ok(target)
}

/// Read and parse an import file. Lines that cannot be used are logged to
/// the recovery log in `data_dir`. A file with no usable rows is an error.
pub fn read_import(path: &Path, data_dir: &Path) -> Result<ParsedTasks, TransferError> {
    let source = fs::read_to_string(path).map_err(|e| TransferError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    let parsed = match ExportFormat::for_path(path) {
        ExportFormat::Csv => parse_csv(&source),
        ExportFormat::Text => parse_data_file(&source),
    };

    if !parsed.issues.is_empty() {
        log_parse_issues(
            data_dir,
            RecoveryCategory::Import,
            &path.display().to_string(),
            &parsed.issues,
        );
    }
    if parsed.tasks.is_empty() {
        return Err(TransferError::NoTasks(path.to_path_buf()));
    }
    Ok(parsed)
}
