//! Pagination
//!
//! Offset-based windows over an ordered sequence.
//!
//! ## Strategy
//! Both single-list paging and multi-list search use the same single pass:
//! walk the ordered cursor from the start, assign each item a zero-based rank,
//! keep the items whose rank falls in `[offset, offset + size)` and stop as
//! soon as the window is full. A request costs O(offset + size); nothing is
//! remembered between requests.
//!
//! ```text
//!  rank:   0   1   2   3   4   5   6   7   8   9  10  11
//!        ┌───┬───┬───┬───┬───┬───┬───┬───┬───┬───┬───┬───┐
//!        │   │   │   │   │ ▓ │ ▓ │ ▓ │ ▓ │   │   │   │   │
//!        └───┴───┴───┴───┴───┴───┴───┴───┴───┴───┴───┴───┘
//!                          └─ Page { index: 1, size: 4 } ─┘
//! ```

use crate::error::{ListKvError, Result};

/// A zero-based page index and a fixed page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    index: usize,
    size: usize,
}

impl Page {
    /// Create a page; a size of zero is rejected
    pub fn new(index: usize, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(ListKvError::InvalidPage("page size must be at least 1".to_string()));
        }
        Ok(Self { index, size })
    }

    /// The first page of the given size
    pub fn first(size: usize) -> Result<Self> {
        Self::new(0, size)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Rank of the first item on this page
    pub fn offset(&self) -> usize {
        self.index.saturating_mul(self.size)
    }

    /// One past the rank of the last item on this page
    pub fn end(&self) -> usize {
        self.offset().saturating_add(self.size)
    }

    /// Whether an item with this rank belongs on the page
    pub fn contains(&self, rank: usize) -> bool {
        rank >= self.offset() && rank < self.end()
    }

    /// Number of selectable pages for `total` items: `1 + total / size`.
    ///
    /// Never zero, so an empty sequence still has a (blank) first page.
    pub fn num_pages(&self, total: u64) -> u64 {
        1 + total / self.size as u64
    }

    /// Collect this page's window from an ordered, fallible sequence.
    ///
    /// Reading stops once the window is full; items past it are never pulled.
    pub fn collect<T, I>(&self, items: I) -> Result<Vec<T>>
    where
        I: IntoIterator<Item = Result<T>>,
    {
        let mut window = PageWindow::new(*self);
        for item in items {
            let item = item?;
            if window.offer(item).is_full() {
                break;
            }
        }
        Ok(window.into_items())
    }
}

/// Whether a window can still accept items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    Open,
    Full,
}

impl WindowState {
    pub fn is_full(self) -> bool {
        self == WindowState::Full
    }
}

/// Incremental ranker that keeps the items of one page.
///
/// Every offered item consumes one rank, whether it is kept or not; callers
/// that filter must only offer items that passed the filter.
#[derive(Debug)]
pub struct PageWindow<T> {
    page: Page,
    rank: usize,
    items: Vec<T>,
}

impl<T> PageWindow<T> {
    pub fn new(page: Page) -> Self {
        Self { page, rank: 0, items: Vec::new() }
    }

    /// Assign the next rank to `item` and keep it if it falls on the page
    pub fn offer(&mut self, item: T) -> WindowState {
        self.offer_with(|| item)
    }

    /// Like [`offer`](Self::offer) but only builds the item when it is kept
    pub fn offer_with(&mut self, make: impl FnOnce() -> T) -> WindowState {
        if self.page.contains(self.rank) {
            self.items.push(make());
        }
        self.rank = self.rank.saturating_add(1);
        self.state()
    }

    pub fn state(&self) -> WindowState {
        if self.rank >= self.page.end() {
            WindowState::Full
        } else {
            WindowState::Open
        }
    }

    /// Number of items ranked so far
    pub fn ranked(&self) -> usize {
        self.rank
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}
