//! Redb-backed store
//!
//! Maps lists onto redb tables (`&[u8] -> &[u8]`). redb provides the
//! guarantees this layer relies on: ACID transactions, one writer at a time
//! with snapshot-isolated readers, and byte-ordered iteration per table.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use redb::{
    Database, DatabaseError, ReadOnlyTable, ReadTransaction, ReadableTable,
    ReadableTableMetadata, Table, TableDefinition, TableError, TableHandle, WriteTransaction,
};
use tracing::{debug, info, trace, warn};

use crate::config::Config;
use crate::error::{ListKvError, Result};
use crate::pagination::Page;
use crate::row::Row;

use super::{validate_list_name, EntryVisitor, ListStore, ListVisitor, RowVisitor, StoreEntry};

type RowTable<'a> = TableDefinition<'a, &'static [u8], &'static [u8]>;

/// Callers must rule out the empty name first; redb panics on it.
fn row_table(name: &str) -> RowTable<'_> {
    TableDefinition::new(name)
}

/// Store backed by a single redb database file
///
/// ## Concurrency:
/// - The `Database` handle is shared by all callers (`&self` everywhere)
/// - Writers are serialized by redb; readers see a consistent snapshot
/// - No locking of our own
pub struct RedbStore {
    db: Database,
    path: PathBuf,
}

impl RedbStore {
    /// Interval between attempts while another process holds the file
    const OPEN_RETRY_INTERVAL: Duration = Duration::from_millis(50);

    /// Open or create the database described by `config`
    ///
    /// On startup:
    /// 1. Validate config and create parent directories
    /// 2. Open the file, retrying while it is locked, up to `open_timeout`
    pub fn open(config: &Config) -> Result<Self> {
        config.validate()?;

        // Step 1: Make sure the file can be created
        if config.create_parent_dirs {
            if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
        }

        // Step 2: Open with a bounded wait for the file lock
        let started = Instant::now();
        let deadline = started + config.open_timeout;
        let mut warned = false;
        let db = loop {
            match Database::create(&config.path) {
                Ok(db) => break db,
                Err(DatabaseError::DatabaseAlreadyOpen) if Instant::now() < deadline => {
                    if !warned {
                        warn!(path = %config.path.display(), "database is locked, waiting");
                        warned = true;
                    }
                    thread::sleep(Self::OPEN_RETRY_INTERVAL);
                }
                Err(DatabaseError::DatabaseAlreadyOpen) => {
                    return Err(ListKvError::OpenTimeout {
                        path: config.path.clone(),
                        waited_ms: started.elapsed().as_millis() as u64,
                    });
                }
                Err(e) => return Err(e.into()),
            }
        };

        info!(path = %config.path.display(), "opened store");
        Ok(Self { db, path: config.path.clone() })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified database file
    pub fn open_path(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open(&Config::builder().path(path).build())
    }

    /// Close the store, releasing the file lock
    ///
    /// Dropping the store closes it as well; this only makes the release
    /// explicit and logs it.
    pub fn close(self) {
        let Self { db, path } = self;
        drop(db);
        info!(path = %path.display(), "closed store");
    }

    // =========================================================================
    // Transaction Helpers
    // =========================================================================

    /// Run `op` inside one read transaction
    fn view<T>(&self, op: impl FnOnce(&ReadTransaction) -> Result<T>) -> Result<T> {
        let txn = self.db.begin_read()?;
        op(&txn)
    }

    /// Run `op` inside one write transaction; commit on success, abort otherwise
    fn update<T>(&self, op: impl FnOnce(&WriteTransaction) -> Result<T>) -> Result<T> {
        let txn = self.db.begin_write()?;
        match op(&txn) {
            Ok(out) => {
                txn.commit()?;
                Ok(out)
            }
            Err(e) => {
                if let Err(abort_err) = txn.abort() {
                    warn!(error = %abort_err, "failed to abort write transaction");
                }
                Err(e)
            }
        }
    }

    fn read_list(txn: &ReadTransaction, list: &str) -> Result<ReadOnlyTable<&'static [u8], &'static [u8]>> {
        if list.is_empty() {
            return Err(ListKvError::list_not_found(list));
        }
        match txn.open_table(row_table(list)) {
            Ok(table) => Ok(table),
            Err(TableError::TableDoesNotExist(_)) => Err(ListKvError::list_not_found(list)),
            Err(e) => Err(e.into()),
        }
    }

    /// Open an existing list for writing; opening never creates it here
    fn write_list<'txn>(
        txn: &'txn WriteTransaction,
        list: &str,
    ) -> Result<Table<'txn, &'static [u8], &'static [u8]>> {
        if list.is_empty() || !Self::has_list(txn, list)? {
            return Err(ListKvError::list_not_found(list));
        }
        Ok(txn.open_table(row_table(list))?)
    }

    fn has_list(txn: &WriteTransaction, name: &str) -> Result<bool> {
        Ok(txn.list_tables()?.any(|handle| handle.name() == name))
    }
}

impl ListStore for RedbStore {
    // =========================================================================
    // General Information
    // =========================================================================

    /// Allocated pages × page size, as reported by redb
    fn size(&self) -> Result<u64> {
        // Stats are only exposed on write transactions; nothing is written.
        let txn = self.db.begin_write()?;
        let stats = txn.stats()?;
        txn.abort()?;
        Ok(stats.allocated_pages() * stats.page_size() as u64)
    }

    fn disk_size(&self) -> Result<u64> {
        Ok(fs::metadata(&self.path)?.len())
    }

    fn disk_path(&self) -> Option<&Path> {
        Some(&self.path)
    }

    fn num_lists(&self) -> Result<usize> {
        self.view(|txn| Ok(txn.list_tables()?.count()))
    }

    fn num_rows(&self, list: &str) -> Result<u64> {
        self.view(|txn| Ok(Self::read_list(txn, list)?.len()?))
    }

    // =========================================================================
    // List Operations
    // =========================================================================

    fn create_list(&self, name: &str) -> Result<()> {
        validate_list_name(name)?;
        self.update(|txn| {
            if Self::has_list(txn, name)? {
                return Err(ListKvError::list_exists(name));
            }
            txn.open_table(row_table(name))?;
            Ok(())
        })?;
        debug!(list = name, "created list");
        Ok(())
    }

    fn read_each_list(&self, visit: &mut ListVisitor<'_>) -> Result<()> {
        self.view(|txn| {
            for handle in txn.list_tables()? {
                visit(handle.name())?;
            }
            Ok(())
        })
    }

    fn read_each_entry(&self, visit: &mut EntryVisitor<'_>) -> Result<()> {
        self.view(|txn| {
            for handle in txn.list_tables()? {
                let table = Self::read_list(txn, handle.name())?;
                visit(StoreEntry::List(handle.name()))?;
                for entry in table.iter()? {
                    let (key, value) = entry?;
                    visit(StoreEntry::Row(Row::new(key.value(), value.value())))?;
                }
            }
            Ok(())
        })
    }

    fn delete_list(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(ListKvError::list_not_found(name));
        }
        self.update(|txn| {
            if !txn.delete_table(row_table(name))? {
                return Err(ListKvError::list_not_found(name));
            }
            Ok(())
        })?;
        debug!(list = name, "deleted list");
        Ok(())
    }

    // =========================================================================
    // Row Operations
    // =========================================================================

    fn create_row(&self, list: &str, row: &Row) -> Result<()> {
        self.update(|txn| {
            let mut table = Self::write_list(txn, list)?;
            if table.get(row.key.as_slice())?.is_some() {
                return Err(ListKvError::row_exists(&row.key));
            }
            table.insert(row.key.as_slice(), row.value.as_slice())?;
            Ok(())
        })?;
        trace!(list, key = %row.key_str(), "created row");
        Ok(())
    }

    fn read_row(&self, list: &str, key: &[u8]) -> Result<Row> {
        self.view(|txn| {
            let table = Self::read_list(txn, list)?;
            let value = table.get(key)?.ok_or_else(|| ListKvError::row_not_found(key))?;
            Ok(Row::new(key, value.value()))
        })
    }

    fn read_row_page(&self, list: &str, page: Page) -> Result<Vec<Row>> {
        self.view(|txn| {
            let table = Self::read_list(txn, list)?;
            let rows = table.iter()?.map(|entry| -> Result<Row> {
                let (key, value) = entry?;
                Ok(Row::new(key.value(), value.value()))
            });
            page.collect(rows)
        })
    }

    fn read_each_row(&self, list: &str, visit: &mut RowVisitor<'_>) -> Result<()> {
        self.view(|txn| {
            let table = Self::read_list(txn, list)?;
            for entry in table.iter()? {
                let (key, value) = entry?;
                visit(Row::new(key.value(), value.value()))?;
            }
            Ok(())
        })
    }

    fn update_row(&self, list: &str, key: &[u8], value: &[u8]) -> Result<()> {
        self.update(|txn| {
            let mut table = Self::write_list(txn, list)?;
            if table.get(key)?.is_none() {
                return Err(ListKvError::row_not_found(key));
            }
            table.insert(key, value)?;
            Ok(())
        })?;
        trace!(list, key = %String::from_utf8_lossy(key), "updated row");
        Ok(())
    }

    fn delete_row(&self, list: &str, key: &[u8]) -> Result<()> {
        self.update(|txn| {
            let mut table = Self::write_list(txn, list)?;
            if table.remove(key)?.is_none() {
                return Err(ListKvError::row_not_found(key));
            }
            Ok(())
        })?;
        trace!(list, key = %String::from_utf8_lossy(key), "deleted row");
        Ok(())
    }
}
