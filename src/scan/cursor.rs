//! Scan cursor and start bounds

use std::fmt;
use std::ops::Bound;

use crate::cell::RowKey;

/// Lower bound of one bounded scan
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScanBound {
    /// Start at the lowest key
    #[default]
    Unbounded,
    /// Start at this key, including it
    Inclusive(RowKey),
    /// Start strictly after this key
    Exclusive(RowKey),
}

impl ScanBound {
    /// Returns true if `key` lies at or after this bound
    pub fn admits(&self, key: &RowKey) -> bool {
        match self {
            ScanBound::Unbounded => true,
            ScanBound::Inclusive(start) => key >= start,
            ScanBound::Exclusive(start) => key > start,
        }
    }

    /// Borrowed form usable with ordered-map ranges
    pub fn as_bound(&self) -> Bound<&RowKey> {
        match self {
            ScanBound::Unbounded => Bound::Unbounded,
            ScanBound::Inclusive(key) => Bound::Included(key),
            ScanBound::Exclusive(key) => Bound::Excluded(key),
        }
    }
}

impl fmt::Display for ScanBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanBound::Unbounded => write!(f, "(-inf"),
            ScanBound::Inclusive(key) => write!(f, "[{}", key),
            ScanBound::Exclusive(key) => write!(f, "({}", key),
        }
    }
}

/// Pagination lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationState {
    /// No page has been read yet
    Initial,
    /// At least one non-empty page has been read
    Advancing,
    /// An empty page was returned; terminal
    Done,
}

impl PaginationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaginationState::Initial => "INITIAL",
            PaginationState::Advancing => "ADVANCING",
            PaginationState::Done => "DONE",
        }
    }
}

/// Position of a traversal between pages.
///
/// The only state carried from one page to the next. After a non-empty
/// page the cursor holds that page's last row with `inclusive = false`, so
/// the next scan starts strictly after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanCursor {
    last_row: Option<RowKey>,
    inclusive: bool,
    state: PaginationState,
}

impl ScanCursor {
    /// Cursor for a traversal from the lowest key
    pub fn initial() -> Self {
        Self {
            last_row: None,
            inclusive: true,
            state: PaginationState::Initial,
        }
    }

    /// Cursor for a traversal starting at `row`, inclusive
    pub fn starting_at(row: impl Into<RowKey>) -> Self {
        Self {
            last_row: Some(row.into()),
            inclusive: true,
            state: PaginationState::Initial,
        }
    }

    /// Cursor resuming strictly after `row`, the last row already consumed.
    ///
    /// Rebuilds the cursor a traversal would hold after a page ending at
    /// `row`, so a saved row key resumes without repeating that row.
    pub fn after(row: impl Into<RowKey>) -> Self {
        Self {
            last_row: Some(row.into()),
            inclusive: false,
            state: PaginationState::Advancing,
        }
    }

    #[inline]
    pub fn last_row(&self) -> Option<&RowKey> {
        self.last_row.as_ref()
    }

    #[inline]
    pub fn is_inclusive(&self) -> bool {
        self.inclusive
    }

    #[inline]
    pub fn state(&self) -> PaginationState {
        self.state
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.state == PaginationState::Done
    }

    /// Start bound of the next scan
    pub fn start_bound(&self) -> ScanBound {
        match (&self.last_row, self.inclusive) {
            (None, _) => ScanBound::Unbounded,
            (Some(key), true) => ScanBound::Inclusive(key.clone()),
            (Some(key), false) => ScanBound::Exclusive(key.clone()),
        }
    }

    /// Cursor after a non-empty page ending at `last`
    pub(crate) fn advance(&self, last: RowKey) -> Self {
        Self::after(last)
    }

    /// Cursor after an empty page
    pub(crate) fn finish(&self) -> Self {
        Self {
            last_row: self.last_row.clone(),
            inclusive: self.inclusive,
            state: PaginationState::Done,
        }
    }
}

impl Default for ScanCursor {
    fn default() -> Self {
        Self::initial()
    }
}

impl fmt::Display for ScanCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.state.as_str(), self.start_bound())
    }
}
