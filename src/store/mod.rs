//! Store Module
//!
//! The list/row contract every storage backend implements.
//!
//! ## Responsibilities
//! - Create, enumerate and delete lists
//! - Create, read, update and delete rows, with existence checks
//! - Ordered traversal and paging of a list's rows
//! - Size queries for statistics
//!
//! ## Transactions
//! Every method maps to exactly one engine transaction: reads use a read
//! transaction, mutations a write transaction. A failed existence check aborts
//! the write transaction, so a call either fully commits or changes nothing.
//! `read_each_entry` walks every list inside a single read transaction.
//!
//! ## Backends
//! - [`RedbStore`]: durable, file-backed (redb)
//! - [`MemoryStore`]: in-process, non-durable (tests, embedding)
//!
//! Paging, search and statistics are written against [`ListStore`] only.

mod memory;
mod redb_store;

pub use self::memory::MemoryStore;
pub use self::redb_store::RedbStore;

use std::path::Path;

use crate::error::{ListKvError, Result};
use crate::pagination::Page;
use crate::row::Row;

/// Callback invoked once per list name
pub type ListVisitor<'a> = dyn FnMut(&str) -> Result<()> + 'a;

/// Callback invoked once per row, in ascending key order
pub type RowVisitor<'a> = dyn FnMut(Row) -> Result<()> + 'a;

/// One step of a whole-store walk
///
/// Each list is announced before its rows, so empty lists are visited too.
/// A `Row` belongs to the most recently announced `List`.
#[derive(Debug)]
pub enum StoreEntry<'a> {
    List(&'a str),
    Row(Row),
}

/// Callback invoked once per list and once per row of a whole-store walk
pub type EntryVisitor<'a> = dyn FnMut(StoreEntry<'_>) -> Result<()> + 'a;

/// Reject names no backend can hold as a list
///
/// redb cannot define a table with an empty name, so the empty name is
/// refused everywhere to keep backends in agreement.
pub(crate) fn validate_list_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ListKvError::InvalidListName(name.to_string()));
    }
    Ok(())
}

/// A transactional store of named lists of ordered rows
pub trait ListStore: Send + Sync {
    // -------------------------------------------------------------------------
    // General information
    // -------------------------------------------------------------------------

    /// Logical size of the store as reported by the engine
    fn size(&self) -> Result<u64>;

    /// Size of the backing file(s) on disk
    fn disk_size(&self) -> Result<u64>;

    /// Backing file, if any
    fn disk_path(&self) -> Option<&Path>;

    fn num_lists(&self) -> Result<usize>;

    /// Fails with `NotFound` if the list is absent
    fn num_rows(&self, list: &str) -> Result<u64>;

    // -------------------------------------------------------------------------
    // List operations
    // -------------------------------------------------------------------------

    /// Fails with `AlreadyExists` if the list is present and with
    /// `InvalidListName` for the empty name
    fn create_list(&self, name: &str) -> Result<()>;

    /// Visit every list name in engine order; a callback error stops the walk
    fn read_each_list(&self, visit: &mut ListVisitor<'_>) -> Result<()>;

    /// Remove a list and all its rows; fails with `NotFound` if absent
    fn delete_list(&self, name: &str) -> Result<()>;

    /// Visit every list and its rows, in order, within one read transaction
    fn read_each_entry(&self, visit: &mut EntryVisitor<'_>) -> Result<()>;

    // -------------------------------------------------------------------------
    // Row operations
    // -------------------------------------------------------------------------

    /// Insert a new row; fails with `NotFound` for a missing list and
    /// `AlreadyExists` if the key is taken. Never overwrites.
    fn create_row(&self, list: &str, row: &Row) -> Result<()>;

    fn read_row(&self, list: &str, key: &[u8]) -> Result<Row>;

    /// Rows of one page in ascending key order
    fn read_row_page(&self, list: &str, page: Page) -> Result<Vec<Row>>;

    /// Visit every row of a list in ascending key order
    fn read_each_row(&self, list: &str, visit: &mut RowVisitor<'_>) -> Result<()>;

    /// Overwrite the value of an existing row; never inserts
    fn update_row(&self, list: &str, key: &[u8], value: &[u8]) -> Result<()>;

    fn delete_row(&self, list: &str, key: &[u8]) -> Result<()>;

    // -------------------------------------------------------------------------
    // Provided helpers
    // -------------------------------------------------------------------------

    /// All list names, in engine order
    fn list_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        self.read_each_list(&mut |name| {
            names.push(name.to_string());
            Ok(())
        })?;
        Ok(names)
    }

    fn list_exists(&self, name: &str) -> Result<bool> {
        match self.num_rows(name) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}
