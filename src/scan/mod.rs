//! # Pagination Engine
//!
//! Produces a gap-free, duplicate-free traversal of a table through
//! repeated bounded scans. Each page is an independent scan whose start
//! bound comes from the cursor:
//!
//! - `INITIAL`: scan from the lowest key (or an explicit inclusive start)
//! - `ADVANCING`: scan strictly after the last row of the previous page
//! - `DONE`: an empty page was returned; no further scans are issued
//!
//! The exclusive start is passed to the backend as a distinct bound kind.
//! Keys are never extended with a trailing zero byte.
//!
//! A failed page leaves the caller's cursor untouched and reports it in
//! [`PageError::resume_from`].

mod cursor;
mod engine;

pub use cursor::{PaginationState, ScanBound, ScanCursor};
pub use engine::{PageError, PaginationEngine, Paginator, ScanPage};
