use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::io::recovery::{RecoveryCategory, RecoveryEntry, atomic_write, log_recovery, log_recovery_once};
use crate::model::task::Task;
use crate::parse::{ParseIssue, parse_data_file, serialize_data_file, validate_data_file};

/// Name of the data file, relative to the working directory
pub const DATA_FILENAME: &str = "data.txt";

/// Error type for data file I/O
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: io::Error,
    },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: io::Error,
    },
}

/// The on-disk home of the task list
#[derive(Debug, Clone)]
pub struct TaskStorage {
    path: PathBuf,
}

impl TaskStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TaskStorage { path: path.into() }
    }

    /// Storage at the fixed data file name inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        TaskStorage::new(dir.join(DATA_FILENAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `<path>.backup`
    pub fn backup_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".backup");
        PathBuf::from(name)
    }

    /// Directory holding the data file (and the recovery log)
    pub fn data_dir(&self) -> &Path {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        }
    }

    /// Size of the data file in bytes, 0 when missing
    pub fn file_size(&self) -> u64 {
        fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
    }

    /// True when the data file exists and has content
    pub fn has_data(&self) -> bool {
        self.file_size() > 0
    }

    /// Load all tasks. A missing file is an empty list. Malformed lines are
    /// skipped and recorded in the recovery log once per distinct problem.
    pub fn load(&self) -> Result<Vec<Task>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let source = fs::read_to_string(&self.path).map_err(|e| StorageError::Read {
            path: self.path.clone(),
            source: e,
        })?;

        let parsed = parse_data_file(&source);
        if !parsed.issues.is_empty() {
            log_parse_issues(
                self.data_dir(),
                RecoveryCategory::Parser,
                &self.path.display().to_string(),
                &parsed.issues,
            );
        }
        Ok(parsed.tasks)
    }

    /// Save tasks in order, backing up the previous file first. Tasks with
    /// blank names are not written. Saving an empty list is a success and
    /// leaves a header-only file. Returns the number of tasks written.
    pub fn save(&self, tasks: &[Task]) -> Result<usize, StorageError> {
        if let Err(e) = self.create_backup() {
            eprintln!("warning: could not create backup: {}", e);
        }

        let content = serialize_data_file(tasks, Local::now().naive_local());
        let result = fs::create_dir_all(self.data_dir())
            .and_then(|_| atomic_write(&self.path, content.as_bytes()));

        if let Err(e) = result {
            log_recovery(
                self.data_dir(),
                RecoveryEntry::new(RecoveryCategory::Write, "data file write failed")
                    .field("Target", self.path.display().to_string())
                    .field("Error", e.to_string())
                    .body(content),
            );
            return Err(StorageError::Write {
                path: self.path.clone(),
                source: e,
            });
        }

        Ok(tasks.iter().filter(|t| t.has_valid_name()).count())
    }

    /// Copy a non-empty data file to `<path>.backup`, replacing any older
    /// backup. Returns whether a backup was taken.
    pub fn create_backup(&self) -> io::Result<bool> {
        if !self.has_data() {
            return Ok(false);
        }
        fs::copy(&self.path, self.backup_path())?;
        Ok(true)
    }

    /// Check that every data line is well formed. A missing file is invalid.
    pub fn validate(&self) -> bool {
        fs::read_to_string(&self.path)
            .map(|source| validate_data_file(&source))
            .unwrap_or(false)
    }

    /// Remove the data file. Missing is fine.
    pub fn delete(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Write {
                path: self.path.clone(),
                source: e,
            }),
        }
    }
}

/// Record parse problems from `source` in the recovery log, one entry per
/// kind. An identical entry already in the log is not written again.
pub(crate) fn log_parse_issues(
    data_dir: &Path,
    category: RecoveryCategory,
    source: &str,
    issues: &[ParseIssue],
) {
    let (dropped, partial): (Vec<&ParseIssue>, Vec<&ParseIssue>) =
        issues.iter().partition(|i| i.issue.is_dropped());

    for (description, group) in [("skipped lines", dropped), ("invalid due dates", partial)] {
        if group.is_empty() {
            continue;
        }
        let line_numbers: Vec<String> = group.iter().map(|i| i.line_number.to_string()).collect();
        let body: Vec<String> = group
            .iter()
            .map(|i| format!("{}: {} ({})", i.line_number, i.text, i.issue.describe()))
            .collect();
        log_recovery_once(
            data_dir,
            RecoveryEntry::new(category, description)
                .field("Source", source)
                .field("Lines", line_numbers.join(", "))
                .body(body.join("\n")),
        );
    }
}
