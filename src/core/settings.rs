use crate::shared::paths::{ensure_dir, get_settings_path, get_storage_dir};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_STORAGE_KEY: &str = "tasks";
pub const DEFAULT_TIME_FORMAT: &str = "%-I:%M:%S %p";
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Overrides the directory holding the task blob and logs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_time_format")]
    pub time_format: String,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_time_format() -> String {
    DEFAULT_TIME_FORMAT.to_string()
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            data_dir: None,
            time_format: default_time_format(),
            date_format: default_date_format(),
            log_level: default_log_level(),
        }
    }
}

impl AppSettings {
    /// Directory that holds the task blob and the logs.
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(get_storage_dir)
    }
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse settings: {0}")]
    ParseError(#[from] serde_json::Error),
}

pub fn load_settings() -> AppSettings {
    load_settings_at(&get_settings_path())
}

/// Falls back to defaults when the file is missing or unreadable.
pub fn load_settings_at(path: &Path) -> AppSettings {
    if !path.exists() {
        return AppSettings::default();
    }

    match load_settings_from_file(path) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(
                target: "system",
                path = %path.display(),
                error = %e,
                "Invalid settings file, using defaults"
            );
            AppSettings::default()
        }
    }
}

fn load_settings_from_file(path: &Path) -> Result<AppSettings, SettingsError> {
    let contents = std::fs::read_to_string(path)?;
    let settings = serde_json::from_str(&contents)?;
    Ok(settings)
}

pub fn save_settings(settings: &AppSettings) -> Result<(), SettingsError> {
    save_settings_at(&get_settings_path(), settings)
}

pub fn save_settings_at(path: &Path, settings: &AppSettings) -> Result<(), SettingsError> {
    if let Some(dir) = path.parent() {
        ensure_dir(dir)?;
    }

    let contents = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, contents)?;
    Ok(())
}
