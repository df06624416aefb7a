//! Store statistics
//!
//! Point-in-time size and row-count figures, recomputed on every call by
//! walking the data. Nothing is cached.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::Result;
use crate::row::Row;
use crate::store::{ListStore, StoreEntry};

/// Statistics for one list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListInfo {
    /// Number of rows
    pub num_rows: u64,

    /// Sum of key + value sizes of every row
    pub total_row_size: u64,

    /// `total_row_size / num_rows`, or 0 for an empty list
    pub avg_row_size: u64,
}

/// Statistics for the whole store
#[derive(Debug, Clone, Serialize)]
pub struct DbInfo {
    /// Logical size reported by the engine
    pub size: u64,

    /// Size of the backing file
    pub disk_size: u64,

    pub disk_path: Option<PathBuf>,

    pub num_lists: usize,

    pub lists: BTreeMap<String, ListInfo>,
}

/// Walk one list (single read transaction) and summarize it
pub fn get_list_info<S>(store: &S, list: &str) -> Result<ListInfo>
where
    S: ListStore + ?Sized,
{
    let mut info = ListInfo::default();
    store.read_each_row(list, &mut |row: Row| {
        info.num_rows += 1;
        info.total_row_size += row.size();
        Ok(())
    })?;

    if info.num_rows != 0 {
        info.avg_row_size = info.total_row_size / info.num_rows;
    }
    Ok(info)
}

/// Summarize every list plus the store-level sizes
///
/// All lists are walked in one read transaction, so the per-list figures
/// form a single snapshot. The engine and file sizes are read alongside it.
pub fn get_db_info<S>(store: &S) -> Result<DbInfo>
where
    S: ListStore + ?Sized,
{
    let mut lists: BTreeMap<String, ListInfo> = BTreeMap::new();
    let mut current: Option<String> = None;
    store.read_each_entry(&mut |entry: StoreEntry<'_>| {
        match entry {
            StoreEntry::List(name) => {
                lists.insert(name.to_string(), ListInfo::default());
                current = Some(name.to_string());
            }
            StoreEntry::Row(row) => {
                if let Some(info) = current.as_ref().and_then(|name| lists.get_mut(name)) {
                    info.num_rows += 1;
                    info.total_row_size += row.size();
                }
            }
        }
        Ok(())
    })?;

    for info in lists.values_mut() {
        if info.num_rows != 0 {
            info.avg_row_size = info.total_row_size / info.num_rows;
        }
    }

    Ok(DbInfo {
        size: store.size()?,
        disk_size: store.disk_size()?,
        disk_path: store.disk_path().map(PathBuf::from),
        num_lists: lists.len(),
        lists,
    })
}
