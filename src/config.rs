//! Configuration for listkv
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ListKvError, Result};

/// Main configuration for a listkv store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Database file backing the store
    pub path: PathBuf,

    /// Create missing parent directories of `path` on open
    pub create_parent_dirs: bool,

    /// How long to wait for another process to release the file on open
    pub open_timeout: Duration,

    // -------------------------------------------------------------------------
    // Presentation Configuration
    // -------------------------------------------------------------------------
    /// Rows per page when a caller does not choose one
    pub rows_per_page: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./listkv.redb"),
            create_parent_dirs: true,
            open_timeout: Duration::from_secs(2),
            rows_per_page: 10,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check values that cannot be caught by the type system
    pub fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(ListKvError::Config("database path is empty".to_string()));
        }
        if self.rows_per_page == 0 {
            return Err(ListKvError::Config("rows_per_page must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the database file path
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Create parent directories of the database file if missing
    pub fn create_parent_dirs(mut self, create: bool) -> Self {
        self.config.create_parent_dirs = create;
        self
    }

    /// Set the open timeout
    pub fn open_timeout(mut self, timeout: Duration) -> Self {
        self.config.open_timeout = timeout;
        self
    }

    /// Set the open timeout (in milliseconds)
    pub fn open_timeout_ms(mut self, ms: u64) -> Self {
        self.config.open_timeout = Duration::from_millis(ms);
        self
    }

    /// Set the default page size
    pub fn rows_per_page(mut self, rows: usize) -> Self {
        self.config.rows_per_page = rows;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
