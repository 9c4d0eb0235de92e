//! Cell model for widecol
//!
//! A table is a sparse map of
//! `row key -> column family -> qualifier -> timestamp -> value`.
//!
//! # Invariants
//!
//! - Row keys order lexicographically by raw bytes
//! - Versions of one column are ordered newest first
//! - The newest version is the current value
//! - A row with no cells does not exist

mod cell;
mod key;
mod row;

pub use cell::{Cell, ColumnKey};
pub use key::{Qualifier, RowKey, Timestamp};
pub use row::Row;
