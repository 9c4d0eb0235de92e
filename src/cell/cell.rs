//! A single versioned value

use std::fmt;

use super::key::{Qualifier, RowKey, Timestamp};

/// Column coordinate within a row: family plus qualifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColumnKey {
    /// Declared column family
    pub family: String,
    /// Undeclared column name within the family
    pub qualifier: Qualifier,
}

impl ColumnKey {
    /// Creates a column coordinate
    pub fn new(family: impl Into<String>, qualifier: impl Into<Qualifier>) -> Self {
        Self {
            family: family.into(),
            qualifier: qualifier.into(),
        }
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.family, self.qualifier)
    }
}

/// One version of one column in one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub row: RowKey,
    pub family: String,
    pub qualifier: Qualifier,
    pub timestamp: Timestamp,
    pub value: Vec<u8>,
}

impl Cell {
    /// Creates a cell
    pub fn new(
        row: impl Into<RowKey>,
        family: impl Into<String>,
        qualifier: impl Into<Qualifier>,
        timestamp: Timestamp,
        value: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            row: row.into(),
            family: family.into(),
            qualifier: qualifier.into(),
            timestamp,
            value: value.into(),
        }
    }

    /// Returns the column coordinate of this cell
    pub fn column(&self) -> ColumnKey {
        ColumnKey {
            family: self.family.clone(),
            qualifier: self.qualifier.clone(),
        }
    }

    /// Returns true if this cell belongs to the given column
    #[inline]
    pub fn is_column(&self, family: &str, qualifier: &Qualifier) -> bool {
        self.family == family && &self.qualifier == qualifier
    }

    /// Returns the value as text, replacing invalid UTF-8
    pub fn value_text(&self) -> String {
        String::from_utf8_lossy(&self.value).into_owned()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}:{}/{}/vlen={}",
            self.row,
            self.family,
            self.qualifier,
            self.timestamp,
            self.value.len()
        )
    }
}
