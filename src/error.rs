//! Error types for listkv
//!
//! Provides a unified error type for all operations.
//!
//! Callers are expected to branch on these kinds of failure:
//! - [`ListKvError::NotFound`]: a list or row referenced by an operation is absent
//! - [`ListKvError::AlreadyExists`]: a create targets a list or key that is present
//! - [`ListKvError::InvalidListName`]: a list cannot be created under that name
//! - everything else is a storage fault

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using ListKvError
pub type Result<T> = std::result::Result<T, ListKvError>;

/// What an identifier in a `NotFound`/`AlreadyExists` error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    List,
    Row,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::List => f.write_str("list"),
            Entity::Row => f.write_str("row"),
        }
    }
}

/// Unified error type for listkv operations
#[derive(Debug, Error)]
pub enum ListKvError {
    // -------------------------------------------------------------------------
    // Existence Errors
    // -------------------------------------------------------------------------
    #[error("{kind} {id:?} not found")]
    NotFound { kind: Entity, id: String },

    #[error("{kind} {id:?} already exists")]
    AlreadyExists { kind: Entity, id: String },

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Storage error: {0}")]
    Storage(#[from] redb::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Timed out after {waited_ms}ms waiting to open {path:?}")]
    OpenTimeout { path: PathBuf, waited_ms: u64 },

    // -------------------------------------------------------------------------
    // Request Errors
    // -------------------------------------------------------------------------
    #[error("Invalid list name {0:?}")]
    InvalidListName(String),

    #[error("Invalid page: {0}")]
    InvalidPage(String),

    #[error("Invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ListKvError {
    pub fn list_not_found(name: impl Into<String>) -> Self {
        Self::NotFound { kind: Entity::List, id: name.into() }
    }

    pub fn row_not_found(key: &[u8]) -> Self {
        Self::NotFound { kind: Entity::Row, id: String::from_utf8_lossy(key).into_owned() }
    }

    pub fn list_exists(name: impl Into<String>) -> Self {
        Self::AlreadyExists { kind: Entity::List, id: name.into() }
    }

    pub fn row_exists(key: &[u8]) -> Self {
        Self::AlreadyExists { kind: Entity::Row, id: String::from_utf8_lossy(key).into_owned() }
    }

    /// True for a missing list or row
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// True when a create collided with an existing list or key
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    pub fn is_invalid_list_name(&self) -> bool {
        matches!(self, Self::InvalidListName(_))
    }

    /// True for failures surfaced by the engine or the filesystem
    pub fn is_storage_fault(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Io(_) | Self::OpenTimeout { .. })
    }
}

// =============================================================================
// Engine Error Conversions
// =============================================================================

// redb splits its failures per API surface; all of them fold into `redb::Error`.
macro_rules! from_redb {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for ListKvError {
                fn from(err: $ty) -> Self {
                    ListKvError::Storage(err.into())
                }
            }
        )*
    };
}

from_redb!(
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);
