use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Settings file looked up in the working directory.
pub const SETTINGS_FILE: &str = "explorer.json";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// User-tunable knobs. Every key is optional in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub dataset_path: PathBuf,
    pub page_size: usize,
    pub default_category_count: usize,
    pub top_n: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("googleplaystore_1.csv"),
            page_size: 10,
            default_category_count: 6,
            top_n: 10,
        }
    }
}

impl Settings {
    /// Read settings from `path`. `Ok(None)` when the file does not exist.
    pub fn from_file(path: &Path) -> Result<Option<Self>, SettingsError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let settings: Settings = serde_json::from_str(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate().map(Some)
    }

    /// Like [`Settings::from_file`], falling back to defaults on any problem.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(Some(settings)) => {
                log::info!("Using settings from {}", path.display());
                settings
            }
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("{e:#}; using default settings");
                Self::default()
            }
        }
    }

    fn validate(self) -> Result<Self, SettingsError> {
        if self.page_size == 0 {
            return Err(SettingsError::Invalid("page_size must be at least 1".into()));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        assert!(Settings::from_file(&path).unwrap().is_none());
        assert_eq!(Settings::load_or_default(&path), Settings::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, r#"{ "page_size": 25, "dataset_path": "apps.parquet" }"#).unwrap();

        let settings = Settings::from_file(&path).unwrap().unwrap();
        assert_eq!(settings.page_size, 25);
        assert_eq!(settings.dataset_path, PathBuf::from("apps.parquet"));
        assert_eq!(settings.default_category_count, 6);
        assert_eq!(settings.top_n, 10);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, r#"{ "page_size": 0 }"#).unwrap();

        assert!(matches!(Settings::from_file(&path), Err(SettingsError::Invalid(_))));
        assert_eq!(Settings::load_or_default(&path), Settings::default());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, "{ page_size: ").unwrap();
        assert!(matches!(Settings::from_file(&path), Err(SettingsError::Parse { .. })));
    }
}
