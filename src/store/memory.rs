//! In-memory store
//!
//! BTreeMap-based backend behind a single RwLock. Lists and rows are kept in
//! byte order, so iteration matches the durable backend. Nothing survives a
//! drop; intended for tests and embedding.

use std::collections::BTreeMap;
use std::path::Path;

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::error::{ListKvError, Result};
use crate::pagination::Page;
use crate::row::Row;

use super::{validate_list_name, EntryVisitor, ListStore, ListVisitor, RowVisitor, StoreEntry};

type Rows = BTreeMap<Vec<u8>, Vec<u8>>;

/// Non-durable store
///
/// ## Concurrency:
/// - Reads take the read lock for the whole call (consistent snapshot)
/// - Mutations take the write lock for check + write, so they are atomic
/// - Callbacks run under the read lock and must not mutate this store
#[derive(Default)]
pub struct MemoryStore {
    lists: RwLock<BTreeMap<String, Rows>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn rows<'a>(lists: &'a BTreeMap<String, Rows>, list: &str) -> Result<&'a Rows> {
        lists.get(list).ok_or_else(|| ListKvError::list_not_found(list))
    }

    fn rows_mut<'a>(lists: &'a mut BTreeMap<String, Rows>, list: &str) -> Result<&'a mut Rows> {
        lists.get_mut(list).ok_or_else(|| ListKvError::list_not_found(list))
    }
}

impl ListStore for MemoryStore {
    /// Sum of all row sizes
    fn size(&self) -> Result<u64> {
        let lists = self.lists.read();
        Ok(lists
            .values()
            .flat_map(|rows| rows.iter())
            .map(|(key, value)| (key.len() + value.len()) as u64)
            .sum())
    }

    fn disk_size(&self) -> Result<u64> {
        Ok(0)
    }

    fn disk_path(&self) -> Option<&Path> {
        None
    }

    fn num_lists(&self) -> Result<usize> {
        Ok(self.lists.read().len())
    }

    fn num_rows(&self, list: &str) -> Result<u64> {
        let lists = self.lists.read();
        Ok(Self::rows(&lists, list)?.len() as u64)
    }

    fn create_list(&self, name: &str) -> Result<()> {
        validate_list_name(name)?;
        let mut lists = self.lists.write();
        if lists.contains_key(name) {
            return Err(ListKvError::list_exists(name));
        }
        lists.insert(name.to_string(), Rows::new());
        debug!(list = name, "created list");
        Ok(())
    }

    fn read_each_list(&self, visit: &mut ListVisitor<'_>) -> Result<()> {
        let lists = self.lists.read();
        for name in lists.keys() {
            visit(name.as_str())?;
        }
        Ok(())
    }

    fn read_each_entry(&self, visit: &mut EntryVisitor<'_>) -> Result<()> {
        let lists = self.lists.read();
        for (name, rows) in lists.iter() {
            visit(StoreEntry::List(name.as_str()))?;
            for (key, value) in rows {
                visit(StoreEntry::Row(Row::new(key.clone(), value.clone())))?;
            }
        }
        Ok(())
    }

    fn delete_list(&self, name: &str) -> Result<()> {
        if self.lists.write().remove(name).is_none() {
            return Err(ListKvError::list_not_found(name));
        }
        debug!(list = name, "deleted list");
        Ok(())
    }

    fn create_row(&self, list: &str, row: &Row) -> Result<()> {
        let mut lists = self.lists.write();
        let rows = Self::rows_mut(&mut lists, list)?;
        if rows.contains_key(&row.key) {
            return Err(ListKvError::row_exists(&row.key));
        }
        rows.insert(row.key.clone(), row.value.clone());
        trace!(list, key = %row.key_str(), "created row");
        Ok(())
    }

    fn read_row(&self, list: &str, key: &[u8]) -> Result<Row> {
        let lists = self.lists.read();
        let value = Self::rows(&lists, list)?
            .get(key)
            .ok_or_else(|| ListKvError::row_not_found(key))?;
        Ok(Row::new(key, value.clone()))
    }

    fn read_row_page(&self, list: &str, page: Page) -> Result<Vec<Row>> {
        let lists = self.lists.read();
        let rows = Self::rows(&lists, list)?
            .iter()
            .map(|(key, value)| Ok(Row::new(key.clone(), value.clone())));
        page.collect(rows)
    }

    fn read_each_row(&self, list: &str, visit: &mut RowVisitor<'_>) -> Result<()> {
        let lists = self.lists.read();
        for (key, value) in Self::rows(&lists, list)? {
            visit(Row::new(key.clone(), value.clone()))?;
        }
        Ok(())
    }

    fn update_row(&self, list: &str, key: &[u8], value: &[u8]) -> Result<()> {
        let mut lists = self.lists.write();
        let slot = Self::rows_mut(&mut lists, list)?
            .get_mut(key)
            .ok_or_else(|| ListKvError::row_not_found(key))?;
        *slot = value.to_vec();
        trace!(list, key = %String::from_utf8_lossy(key), "updated row");
        Ok(())
    }

    fn delete_row(&self, list: &str, key: &[u8]) -> Result<()> {
        let mut lists = self.lists.write();
        if Self::rows_mut(&mut lists, list)?.remove(key).is_none() {
            return Err(ListKvError::row_not_found(key));
        }
        trace!(list, key = %String::from_utf8_lossy(key), "deleted row");
        Ok(())
    }
}
