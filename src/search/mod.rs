//! Search Module
//!
//! Regex search across one or more lists, paginated by match rank.
//!
//! ## Algorithm
//! 1. Scan the selected lists in the given order (all lists, in engine
//!    order, when none are selected)
//! 2. Scan each list's rows once, in ascending key order
//! 3. A row counts when there is no pattern, when the pattern matches its
//!    value, or (with `exclude_matches`) when it does not
//! 4. Every counted row increments `total_results` and takes the next match
//!    rank; only ranks on the requested page are materialized
//!
//! Materialized rows carry the matched text and a display copy of the value
//! (JSON is pretty-printed). Stored values are never modified.

pub mod format;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::pagination::{Page, PageWindow};
use crate::row::Row;
use crate::store::ListStore;

pub use format::auto_format;

/// Parameters of one search request
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// Lists to scan, in order; empty means every list
    pub lists: Vec<String>,

    /// Filter applied to row values; `None` matches every row
    pub pattern: Option<Regex>,

    /// Keep the rows the pattern does NOT match
    pub exclude_matches: bool,

    pub page: Page,
}

impl SearchQuery {
    /// Match everything in every list
    pub fn new(page: Page) -> Self {
        Self { lists: Vec::new(), pattern: None, exclude_matches: false, page }
    }

    pub fn lists<I, S>(mut self, lists: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lists = lists.into_iter().map(Into::into).collect();
        self
    }

    pub fn pattern(mut self, pattern: Option<Regex>) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn exclude_matches(mut self, exclude: bool) -> Self {
        self.exclude_matches = exclude;
        self
    }

    /// Compile user input; an empty string means "no pattern"
    pub fn parse_pattern(source: &str) -> Result<Option<Regex>> {
        if source.is_empty() {
            return Ok(None);
        }
        Ok(Some(Regex::new(source)?))
    }

    /// The effective filter (empty patterns are dropped)
    fn filter(&self) -> Option<&Regex> {
        self.pattern.as_ref().filter(|re| !re.as_str().is_empty())
    }

    /// Decide whether a value counts; `Some(match)` when it does
    fn test(&self, value: &str) -> Option<String> {
        let Some(re) = self.filter() else {
            return Some(String::new());
        };
        match (re.find(value), self.exclude_matches) {
            (Some(found), false) => Some(found.as_str().to_string()),
            (None, true) => Some(String::new()),
            _ => None,
        }
    }
}

/// One page of search results plus the total match count
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    /// Matches across the whole scan, independent of the page
    pub total_results: u64,

    /// Matches on the requested page, in scan order
    pub rows: Vec<SearchResultRow>,

    #[serde(skip)]
    pub page: Page,
}

impl SearchResult {
    pub fn num_pages(&self) -> u64 {
        self.page.num_pages(self.total_results)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResultRow {
    /// List the row was found in
    pub list: String,

    /// The row, with its value formatted for display
    pub row: Row,

    /// Text matched by the pattern; empty when no pattern applied
    #[serde(rename = "match")]
    pub matched: String,
}

/// Run `query` against `store`
///
/// Unknown list names fail with `NotFound` when their scan starts.
pub fn search<S>(store: &S, query: &SearchQuery) -> Result<SearchResult>
where
    S: ListStore + ?Sized,
{
    let lists = if query.lists.is_empty() {
        store.list_names()?
    } else {
        query.lists.clone()
    };

    let mut window = PageWindow::new(query.page);
    let mut total_results = 0u64;

    for list in &lists {
        let mut list_matches = 0u64;
        store.read_each_row(list, &mut |row: Row| {
            let Some(matched) = query.test(&row.value_str()) else {
                return Ok(());
            };
            total_results += 1;
            list_matches += 1;

            window.offer_with(|| SearchResultRow {
                list: list.clone(),
                row: Row { value: auto_format(&row.value), key: row.key },
                matched,
            });
            Ok(())
        })?;
        debug!(list = %list, matches = list_matches, "scanned list");
    }

    debug!(
        lists = lists.len(),
        total_results,
        page = query.page.index(),
        "search finished"
    );

    Ok(SearchResult { total_results, rows: window.into_items(), page: query.page })
}
