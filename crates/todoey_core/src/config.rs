//! Core configuration.
//!
//! Callers build a [`CoreConfig`] explicitly; nothing is read from the
//! environment.

use crate::db::DbResult;
use crate::logging::{init_logging, LogLevel, LoggingError};
use crate::repo::RepoError;
use crate::service::list_service::{ListService, ServiceResult};
use crate::store::Store;
use std::path::{Path, PathBuf};

/// File name used when the store lives in a caller-chosen directory.
pub const DEFAULT_DB_FILE_NAME: &str = "todoey.sqlite3";

/// Where the store lives and how the core logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Database file. `None` keeps the store in memory.
    pub db_path: Option<PathBuf>,
    pub log_level: LogLevel,
    /// Absolute log directory. `None` leaves logging uninitialized.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: LogLevel::build_default(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Config for a store file at `path`.
    pub fn with_db_path(path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Config for `<dir>/todoey.sqlite3`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::with_db_path(dir.as_ref().join(DEFAULT_DB_FILE_NAME))
    }

    pub fn log_to(mut self, log_dir: impl Into<PathBuf>, level: LogLevel) -> Self {
        self.log_dir = Some(log_dir.into());
        self.log_level = level;
        self
    }

    /// Starts logging when a log directory is configured.
    pub fn init_logging(&self) -> Result<bool, LoggingError> {
        match &self.log_dir {
            Some(dir) => init_logging(self.log_level.as_str(), dir).map(|()| true),
            None => Ok(false),
        }
    }

    /// Opens the configured store.
    pub fn open_store(&self) -> DbResult<Store> {
        match &self.db_path {
            Some(path) => Store::open(path),
            None => Store::open_in_memory(),
        }
    }

    /// Opens the store and wraps it in a [`ListService`].
    ///
    /// Store-open failures surface as `ServiceError::Repo(RepoError::Db(..))`.
    pub fn open_service(&self) -> ServiceResult<ListService> {
        let store = self
            .open_store()
            .map_err(RepoError::from)?;
        ListService::new(store)
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, DEFAULT_DB_FILE_NAME};
    use crate::logging::LogLevel;

    #[test]
    fn default_config_is_in_memory_without_logging() {
        let config = CoreConfig::default();
        assert!(config.db_path.is_none());
        assert!(config.log_dir.is_none());
        assert_eq!(config.log_level, LogLevel::build_default());
        assert!(!config.init_logging().unwrap());
    }

    #[test]
    fn in_dir_uses_default_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let config = CoreConfig::in_dir(dir.path());
        assert_eq!(config.db_path, Some(dir.path().join(DEFAULT_DB_FILE_NAME)));

        let service = config.open_service().unwrap();
        assert!(service.load_categories().unwrap().is_empty());
        assert!(dir.path().join(DEFAULT_DB_FILE_NAME).exists());
    }
}
