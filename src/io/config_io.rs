use std::fs;
use std::path::{Path, PathBuf};

use crate::io::recovery::atomic_write;
use crate::model::config::{AppConfig, Preferences};

/// Name of the preferences file, relative to the working directory
pub const CONFIG_FILENAME: &str = "todo.toml";

/// Error type for the preferences file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse todo.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not parse todo.toml: {0}")]
    EditError(#[from] toml_edit::TomlError),
}

/// Read the config, returning both the parsed config and the raw toml_edit
/// document for round-trip-safe editing. A missing file yields defaults.
pub fn read_config(dir: &Path) -> Result<(AppConfig, toml_edit::DocumentMut), ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok((AppConfig::default(), toml_edit::DocumentMut::new()));
    }
    let config_text = fs::read_to_string(&config_path).map_err(|e| ConfigError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    let config: AppConfig = toml::from_str(&config_text)?;
    let doc: toml_edit::DocumentMut = config_text.parse()?;
    Ok((config, doc))
}

/// Load just the preferences, falling back to defaults on any problem
pub fn load_preferences(dir: &Path) -> Preferences {
    match read_config(dir) {
        Ok((config, _)) => config.preferences,
        Err(e) => {
            eprintln!("warning: {}; using default preferences", e);
            Preferences::default()
        }
    }
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(dir: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    atomic_write(&config_path, doc.to_string().as_bytes()).map_err(|e| ConfigError::WriteError {
        path: config_path,
        source: e,
    })
}

/// Set `preferences.auto_fill_today` in the config document
pub fn set_auto_fill_today(doc: &mut toml_edit::DocumentMut, enabled: bool) {
    if !doc.contains_key("preferences") {
        doc["preferences"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["preferences"]["auto_fill_today"] = toml_edit::value(enabled);
}
