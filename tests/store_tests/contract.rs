//! Behavior every ListStore backend must share
//!
//! Each function takes a freshly opened, empty store. The
//! `list_store_contract!` macro turns them into `#[test]`s for one backend.

use listkv::{ListKvError, ListStore, Page, Row, StoreEntry};

// =============================================================================
// Helper Functions
// =============================================================================

pub fn row(key: &str, value: &str) -> Row {
    Row::new(key.as_bytes(), value.as_bytes())
}

/// Create `list` holding keys "01".."NN" (zero padded so byte order is numeric)
pub fn fill_list(store: &dyn ListStore, list: &str, count: usize) {
    store.create_list(list).unwrap();
    for i in 1..=count {
        let key = format!("{:02}", i);
        store.create_row(list, &row(&key, &format!("value-{}", i))).unwrap();
    }
}

fn keys(rows: &[Row]) -> Vec<String> {
    rows.iter().map(|r| r.key_str().into_owned()).collect()
}

fn all_rows(store: &dyn ListStore, list: &str) -> Vec<Row> {
    let mut rows = Vec::new();
    store
        .read_each_row(list, &mut |r| {
            rows.push(r);
            Ok(())
        })
        .unwrap();
    rows
}

// =============================================================================
// List Operations
// =============================================================================

pub fn create_list_twice_fails(store: &dyn ListStore) {
    store.create_list("x").unwrap();

    let err = store.create_list("x").unwrap_err();

    assert!(err.is_already_exists(), "unexpected error: {}", err);
    assert_eq!(store.num_lists().unwrap(), 1);
}

pub fn new_list_is_empty(store: &dyn ListStore) {
    store.create_list("users").unwrap();

    assert_eq!(store.num_rows("users").unwrap(), 0);
    assert!(all_rows(store, "users").is_empty());
}

pub fn delete_list_discards_rows(store: &dyn ListStore) {
    fill_list(store, "logs", 5);

    store.delete_list("logs").unwrap();

    assert!(store.num_rows("logs").unwrap_err().is_not_found());
    assert!(store.read_row("logs", b"01").unwrap_err().is_not_found());

    // Recreating gives an empty list, not the old rows
    store.create_list("logs").unwrap();
    assert_eq!(store.num_rows("logs").unwrap(), 0);
}

pub fn delete_missing_list_not_found(store: &dyn ListStore) {
    let err = store.delete_list("ghost").unwrap_err();

    assert!(err.is_not_found(), "unexpected error: {}", err);
}

pub fn read_each_list_visits_all(store: &dyn ListStore) {
    for name in ["b", "c", "a"] {
        store.create_list(name).unwrap();
    }

    let names = store.list_names().unwrap();

    assert_eq!(names, vec!["a", "b", "c"]);
    assert_eq!(store.num_lists().unwrap(), 3);
    assert!(store.list_exists("b").unwrap());
    assert!(!store.list_exists("z").unwrap());
}

pub fn read_each_list_stops_on_callback_error(store: &dyn ListStore) {
    for name in ["a", "b", "c"] {
        store.create_list(name).unwrap();
    }

    let mut seen = Vec::new();
    let err = store
        .read_each_list(&mut |name| {
            seen.push(name.to_string());
            if name == "b" {
                return Err(ListKvError::list_not_found("stop"));
            }
            Ok(())
        })
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(seen, vec!["a", "b"]);
}

pub fn empty_list_name_rejected(store: &dyn ListStore) {
    let err = store.create_list("").unwrap_err();

    assert!(err.is_invalid_list_name(), "unexpected error: {}", err);
    assert_eq!(store.num_lists().unwrap(), 0);

    // Every other path treats the empty name as an absent list
    assert!(store.num_rows("").unwrap_err().is_not_found());
    assert!(store.delete_list("").unwrap_err().is_not_found());
    assert!(store.create_row("", &row("k", "v")).unwrap_err().is_not_found());
    assert!(store.read_row("", b"k").unwrap_err().is_not_found());
    assert!(store.update_row("", b"k", b"v").unwrap_err().is_not_found());
    assert!(store.delete_row("", b"k").unwrap_err().is_not_found());
    assert!(store.read_each_row("", &mut |_| Ok(())).unwrap_err().is_not_found());
    assert!(store.read_row_page("", Page::first(10).unwrap()).unwrap_err().is_not_found());
    assert!(!store.list_exists("").unwrap());
}

pub fn read_each_entry_walks_every_list(store: &dyn ListStore) {
    store.create_list("b").unwrap();
    store.create_row("b", &row("2", "y")).unwrap();
    store.create_row("b", &row("1", "x")).unwrap();
    store.create_list("empty").unwrap();
    store.create_list("a").unwrap();
    store.create_row("a", &row("k", "v")).unwrap();

    let mut seen = Vec::new();
    store
        .read_each_entry(&mut |entry: StoreEntry<'_>| {
            seen.push(match entry {
                StoreEntry::List(name) => format!("list:{}", name),
                StoreEntry::Row(r) => format!("row:{}", r.key_str()),
            });
            Ok(())
        })
        .unwrap();

    assert_eq!(seen, vec!["list:a", "row:k", "list:b", "row:1", "row:2", "list:empty"]);
}

// =============================================================================
// Row Operations
// =============================================================================

pub fn create_then_read_row(store: &dyn ListStore) {
    store.create_list("users").unwrap();

    store.create_row("users", &row("1", "{\"a\":1}")).unwrap();

    assert_eq!(store.read_row("users", b"1").unwrap(), row("1", "{\"a\":1}"));
    assert_eq!(store.num_rows("users").unwrap(), 1);
}

pub fn create_row_never_overwrites(store: &dyn ListStore) {
    store.create_list("users").unwrap();
    store.create_row("users", &row("k", "first")).unwrap();

    let err = store.create_row("users", &row("k", "second")).unwrap_err();

    assert!(err.is_already_exists(), "unexpected error: {}", err);
    assert_eq!(store.read_row("users", b"k").unwrap().value, b"first");
}

pub fn create_row_in_missing_list(store: &dyn ListStore) {
    let err = store.create_row("ghost", &row("k", "v")).unwrap_err();

    assert!(err.is_not_found(), "unexpected error: {}", err);
    assert_eq!(store.num_lists().unwrap(), 0);
}

pub fn read_row_missing(store: &dyn ListStore) {
    store.create_list("users").unwrap();

    assert!(store.read_row("users", b"nope").unwrap_err().is_not_found());
    assert!(store.read_row("ghost", b"nope").unwrap_err().is_not_found());
}

pub fn binary_keys_and_values(store: &dyn ListStore) {
    store.create_list("bin").unwrap();
    let r = Row::new(vec![0u8, 255, 7], vec![1u8, 0, 0, 2]);

    store.create_row("bin", &r).unwrap();

    assert_eq!(store.read_row("bin", &[0, 255, 7]).unwrap(), r);
}

pub fn update_row_overwrites(store: &dyn ListStore) {
    store.create_list("users").unwrap();
    store.create_row("users", &row("k", "old")).unwrap();

    store.update_row("users", b"k", b"new").unwrap();

    assert_eq!(store.read_row("users", b"k").unwrap().value, b"new");
    assert_eq!(store.num_rows("users").unwrap(), 1);
}

pub fn update_row_is_not_upsert(store: &dyn ListStore) {
    store.create_list("users").unwrap();

    let err = store.update_row("users", b"k", b"v").unwrap_err();

    assert!(err.is_not_found(), "unexpected error: {}", err);
    assert!(store.read_row("users", b"k").unwrap_err().is_not_found());
    assert!(store.update_row("ghost", b"k", b"v").unwrap_err().is_not_found());
}

pub fn delete_then_read_row(store: &dyn ListStore) {
    store.create_list("users").unwrap();
    store.create_row("users", &row("k", "v")).unwrap();

    store.delete_row("users", b"k").unwrap();

    assert!(store.read_row("users", b"k").unwrap_err().is_not_found());
    assert!(store.delete_row("users", b"k").unwrap_err().is_not_found());
    assert!(store.delete_row("ghost", b"k").unwrap_err().is_not_found());
}

pub fn rows_iterate_in_key_order(store: &dyn ListStore) {
    store.create_list("l").unwrap();
    for key in ["m", "a", "z", "b", "aa"] {
        store.create_row("l", &row(key, key)).unwrap();
    }

    let rows = all_rows(store, "l");

    assert_eq!(keys(&rows), vec!["a", "aa", "b", "m", "z"]);
}

pub fn read_each_row_missing_list(store: &dyn ListStore) {
    let err = store.read_each_row("ghost", &mut |_| Ok(())).unwrap_err();

    assert!(err.is_not_found());
}

// =============================================================================
// Paging
// =============================================================================

pub fn single_row_page(store: &dyn ListStore) {
    store.create_list("users").unwrap();
    store.create_row("users", &row("1", "{\"a\":1}")).unwrap();

    let rows = store.read_row_page("users", Page::new(0, 10).unwrap()).unwrap();

    assert_eq!(rows, vec![row("1", "{\"a\":1}")]);
}

pub fn last_partial_page(store: &dyn ListStore) {
    fill_list(store, "logs", 25);

    let rows = store.read_row_page("logs", Page::new(2, 10).unwrap()).unwrap();

    assert_eq!(keys(&rows), vec!["21", "22", "23", "24", "25"]);
}

pub fn pages_concatenate_to_full_list(store: &dyn ListStore) {
    fill_list(store, "logs", 23);
    let size = 5;
    let total = store.num_rows("logs").unwrap() as usize;

    let mut paged = Vec::new();
    for index in 0..(total + size - 1) / size {
        paged.extend(store.read_row_page("logs", Page::new(index, size).unwrap()).unwrap());
    }

    assert_eq!(paged, all_rows(store, "logs"));
}

pub fn page_past_end_is_empty(store: &dyn ListStore) {
    fill_list(store, "logs", 10);

    let page = Page::new(1, 10).unwrap();
    let rows = store.read_row_page("logs", page).unwrap();

    assert!(rows.is_empty());
    assert_eq!(page.num_pages(10), 2);
    assert!(store.read_row_page("logs", Page::new(usize::MAX, 10).unwrap()).unwrap().is_empty());
}

pub fn page_of_empty_list(store: &dyn ListStore) {
    store.create_list("empty").unwrap();

    let page = Page::first(10).unwrap();

    assert!(store.read_row_page("empty", page).unwrap().is_empty());
    assert_eq!(page.num_pages(0), 1);
    assert!(store.read_row_page("ghost", page).unwrap_err().is_not_found());
}

// =============================================================================
// Sizes
// =============================================================================

pub fn size_queries(store: &dyn ListStore) {
    store.create_list("l").unwrap();
    store.create_row("l", &row("key", "value")).unwrap();

    assert!(store.size().unwrap() > 0);
    assert!(store.num_rows("ghost").unwrap_err().is_not_found());
}

// =============================================================================
// Test Generation
// =============================================================================

/// Expand every contract function into a `#[test]` using `$setup`, which
/// must return `(guard, store)`; the guard is held for the test's duration.
macro_rules! list_store_contract {
    ($setup:path) => {
        list_store_contract!(@tests $setup;
            create_list_twice_fails,
            new_list_is_empty,
            delete_list_discards_rows,
            delete_missing_list_not_found,
            read_each_list_visits_all,
            read_each_list_stops_on_callback_error,
            empty_list_name_rejected,
            read_each_entry_walks_every_list,
            create_then_read_row,
            create_row_never_overwrites,
            create_row_in_missing_list,
            read_row_missing,
            binary_keys_and_values,
            update_row_overwrites,
            update_row_is_not_upsert,
            delete_then_read_row,
            rows_iterate_in_key_order,
            read_each_row_missing_list,
            single_row_page,
            last_partial_page,
            pages_concatenate_to_full_list,
            page_past_end_is_empty,
            page_of_empty_list,
            size_queries,
        );
    };
    (@tests $setup:path; $($name:ident),* $(,)?) => {
        $(
            #[test]
            fn $name() {
                let (_guard, store) = $setup();
                crate::contract::$name(&store);
            }
        )*
    };
}
