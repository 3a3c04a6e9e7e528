//! Desk configuration resolved by front-ends before opening storage.
//!
//! # Invariants
//! - `data_dir` is absolute once validated.
//! - The storage key is non-blank.

use crate::logging::default_log_level;
use crate::repo::roster_repo::DEFAULT_ROSTER_KEY;
use std::error::Error;
use std::ffi::OsStr;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Default file name of the slot database inside `data_dir`.
pub const DB_FILE_NAME: &str = "feedesk.sqlite3";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    RelativeDataDir(PathBuf),
    BlankStorageKey,
    InvalidDbFileName(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RelativeDataDir(path) => {
                write!(f, "data dir must be absolute, got `{}`", path.display())
            }
            Self::BlankStorageKey => write!(f, "storage key cannot be blank"),
            Self::InvalidDbFileName(name) => {
                write!(f, "db file name must be a bare file name, got `{name}`")
            }
        }
    }
}

impl Error for ConfigError {}

/// Where and how a desk session stores its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeskConfig {
    pub data_dir: PathBuf,
    pub log_level: String,
    pub storage_key: String,
    /// Slot database file, relative to `data_dir`.
    pub db_file_name: String,
}

impl DeskConfig {
    /// Defaults rooted at `data_dir`: build-mode log level and the default slot key.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            log_level: default_log_level().to_string(),
            storage_key: DEFAULT_ROSTER_KEY.to_string(),
            db_file_name: DB_FILE_NAME.to_string(),
        }
    }

    /// Resolves a possibly relative `data_dir` against `base`.
    pub fn resolve_relative_to(mut self, base: &Path) -> Self {
        if self.data_dir.is_relative() {
            self.data_dir = base.join(&self.data_dir);
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.data_dir.is_absolute() {
            return Err(ConfigError::RelativeDataDir(self.data_dir.clone()));
        }
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::BlankStorageKey);
        }
        let name = self.db_file_name.trim();
        if name.is_empty() || Path::new(name).file_name() != Some(OsStr::new(name)) {
            return Err(ConfigError::InvalidDbFileName(self.db_file_name.clone()));
        }
        Ok(())
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(self.db_file_name.trim())
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, DeskConfig, DB_FILE_NAME};
    use crate::repo::roster_repo::DEFAULT_ROSTER_KEY;
    use std::path::Path;

    #[test]
    fn defaults_use_default_slot_key() {
        let config = DeskConfig::new("/srv/feedesk");
        assert_eq!(config.storage_key, DEFAULT_ROSTER_KEY);
        assert_eq!(config.db_path(), Path::new("/srv/feedesk").join(DB_FILE_NAME));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn relative_data_dir_is_rejected_until_resolved() {
        let config = DeskConfig::new("data");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RelativeDataDir(_))
        ));

        let resolved = config.resolve_relative_to(Path::new("/home/desk"));
        assert_eq!(resolved.data_dir, Path::new("/home/desk/data"));
        assert!(resolved.validate().is_ok());
    }

    #[test]
    fn blank_storage_key_is_rejected() {
        let mut config = DeskConfig::new("/srv/feedesk");
        config.storage_key = "   ".to_string();
        assert_eq!(config.validate(), Err(ConfigError::BlankStorageKey));
    }

    #[test]
    fn db_file_name_drives_db_path_and_must_be_bare() {
        let mut config = DeskConfig::new("/srv/feedesk");
        config.db_file_name = "branch-office.sqlite3".to_string();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.db_path(),
            Path::new("/srv/feedesk/branch-office.sqlite3")
        );

        for bad in ["", "  ", "../escape.sqlite3", "nested/feedesk.sqlite3"] {
            config.db_file_name = bad.to_string();
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidDbFileName(_))
            ));
        }
    }
}
