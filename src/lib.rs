//! # listkv
//!
//! Named lists of key/value rows on top of an ordered, transactional store:
//! - List and row CRUD with strict existence semantics
//! - Offset-based paging over ascending key order
//! - Regex search across lists with a global match count and paging
//! - Size and row-count statistics
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Caller (CLI / service)                     │
//! └──────────┬───────────────────┬───────────────────┬──────────┘
//!            │                   │                   │
//!            ▼                   ▼                   ▼
//!     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//!     │   search    │     │    info     │     │ pagination  │
//!     └──────┬──────┘     └──────┬──────┘     └──────┬──────┘
//!            │                   │                   │
//!            └───────────────────┼───────────────────┘
//!                                ▼
//!                     ┌─────────────────────┐
//!                     │  ListStore (trait)  │
//!                     └──────────┬──────────┘
//!                  ┌─────────────┴─────────────┐
//!                  ▼                           ▼
//!           ┌─────────────┐             ┌─────────────┐
//!           │  RedbStore  │             │ MemoryStore │
//!           │   (redb)    │             │  (RwLock)   │
//!           └─────────────┘             └─────────────┘
//! ```
//!
//! The store handle is owned by the caller and passed by reference to
//! [`search::search`] and the [`info`] functions; there is no global state.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod row;
pub mod pagination;
pub mod store;
pub mod search;
pub mod info;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Entity, ListKvError, Result};
pub use config::Config;
pub use row::Row;
pub use pagination::Page;
pub use store::{ListStore, MemoryStore, RedbStore, StoreEntry};
pub use search::{search, SearchQuery, SearchResult, SearchResultRow};
pub use info::{get_db_info, get_list_info, DbInfo, ListInfo};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of listkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
