//! Row: every cell sharing a row key
//!
//! Cells are grouped by (family, qualifier). Within a column, versions are
//! kept in descending timestamp order so the first entry is the current
//! value. Two versions never share a timestamp; a write at an existing
//! timestamp replaces that version.

use std::collections::BTreeMap;

use crate::errors::{ClientError, ClientResult};

use super::cell::{Cell, ColumnKey};
use super::key::{Qualifier, RowKey, Timestamp};

/// All cells of one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    key: RowKey,
    columns: BTreeMap<ColumnKey, Vec<Cell>>,
}

impl Row {
    /// Creates an empty row
    pub fn new(key: impl Into<RowKey>) -> Self {
        Self {
            key: key.into(),
            columns: BTreeMap::new(),
        }
    }

    /// Builds a row from cells that all carry the same row key
    pub fn from_cells(
        key: impl Into<RowKey>,
        cells: impl IntoIterator<Item = Cell>,
    ) -> ClientResult<Self> {
        let mut row = Self::new(key);
        for cell in cells {
            row.insert(cell)?;
        }
        Ok(row)
    }

    /// Returns the row key
    #[inline]
    pub fn key(&self) -> &RowKey {
        &self.key
    }

    /// Inserts a version, replacing any version with the same timestamp
    pub fn insert(&mut self, cell: Cell) -> ClientResult<()> {
        if cell.row != self.key {
            return Err(ClientError::invalid_argument(format!(
                "cell for row '{}' cannot be added to row '{}'",
                cell.row, self.key
            )));
        }

        let versions = self.columns.entry(cell.column()).or_default();
        // Descending by timestamp
        match versions.binary_search_by(|v| cell.timestamp.cmp(&v.timestamp)) {
            Ok(idx) => versions[idx] = cell,
            Err(idx) => versions.insert(idx, cell),
        }
        Ok(())
    }

    /// Returns the current (newest) version of a column
    pub fn latest(&self, family: &str, qualifier: &Qualifier) -> Option<&Cell> {
        self.versions(family, qualifier).first()
    }

    /// Returns the current value of a column
    pub fn value(&self, family: &str, qualifier: impl Into<Qualifier>) -> Option<&[u8]> {
        self.latest(family, &qualifier.into())
            .map(|c| c.value.as_slice())
    }

    /// Returns every retained version of a column, newest first
    pub fn versions(&self, family: &str, qualifier: &Qualifier) -> &[Cell] {
        let key = ColumnKey {
            family: family.to_string(),
            qualifier: qualifier.clone(),
        };
        self.columns.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterates all cells: by family, then qualifier, then newest first
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.columns.values().flatten()
    }

    /// Iterates the current version of every column
    pub fn latest_cells(&self) -> impl Iterator<Item = &Cell> {
        self.columns.values().filter_map(|v| v.first())
    }

    /// Iterates the column coordinates present in this row
    pub fn columns(&self) -> impl Iterator<Item = &ColumnKey> {
        self.columns.keys()
    }

    /// Returns true if any column of the family is present
    pub fn has_family(&self, family: &str) -> bool {
        self.columns.keys().any(|c| c.family == family)
    }

    /// Number of cells, counting every version
    pub fn len(&self) -> usize {
        self.columns.values().map(Vec::len).sum()
    }

    /// Number of distinct columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the row holds no cells
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Copies the row keeping only cells accepted by `keep`.
    ///
    /// Returns None when nothing survives: an empty row is not a row.
    pub fn filter_cells<F>(&self, mut keep: F) -> Option<Row>
    where
        F: FnMut(&Cell) -> bool,
    {
        let mut columns = BTreeMap::new();
        for (column, versions) in &self.columns {
            let kept: Vec<Cell> = versions.iter().filter(|c| keep(c)).cloned().collect();
            if !kept.is_empty() {
                columns.insert(column.clone(), kept);
            }
        }

        if columns.is_empty() {
            None
        } else {
            Some(Row {
                key: self.key.clone(),
                columns,
            })
        }
    }

    /// Drops versions beyond the newest `max_versions` of every column
    pub fn truncate_versions(&mut self, max_versions: usize) {
        for versions in self.columns.values_mut() {
            versions.truncate(max_versions);
        }
        self.columns.retain(|_, v| !v.is_empty());
    }

    /// Drops versions of one family beyond the newest `max_versions`
    pub(crate) fn truncate_family_versions(&mut self, family: &str, max_versions: usize) {
        for (column, versions) in self.columns.iter_mut() {
            if column.family == family {
                versions.truncate(max_versions);
            }
        }
        self.columns.retain(|_, v| !v.is_empty());
    }

    /// Removes versions of one column at or before `upto`
    pub(crate) fn remove_column(&mut self, family: &str, qualifier: &Qualifier, upto: Timestamp) {
        let key = ColumnKey {
            family: family.to_string(),
            qualifier: qualifier.clone(),
        };
        if let Some(versions) = self.columns.get_mut(&key) {
            versions.retain(|c| c.timestamp > upto);
            if versions.is_empty() {
                self.columns.remove(&key);
            }
        }
    }

    /// Removes exactly one version of a column
    pub(crate) fn remove_version(&mut self, family: &str, qualifier: &Qualifier, at: Timestamp) {
        let key = ColumnKey {
            family: family.to_string(),
            qualifier: qualifier.clone(),
        };
        if let Some(versions) = self.columns.get_mut(&key) {
            versions.retain(|c| c.timestamp != at);
            if versions.is_empty() {
                self.columns.remove(&key);
            }
        }
    }

    /// Removes versions of every column in a family at or before `upto`
    pub(crate) fn remove_family(&mut self, family: &str, upto: Timestamp) {
        for (column, versions) in self.columns.iter_mut() {
            if column.family == family {
                versions.retain(|c| c.timestamp > upto);
            }
        }
        self.columns.retain(|_, v| !v.is_empty());
    }

    /// Removes versions of every column at or before `upto`
    pub(crate) fn remove_all(&mut self, upto: Timestamp) {
        for versions in self.columns.values_mut() {
            versions.retain(|c| c.timestamp > upto);
        }
        self.columns.retain(|_, v| !v.is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(q: &str, ts: i64, v: &str) -> Cell {
        Cell::new("row1", "cf1", q, Timestamp::new(ts), v)
    }

    #[test]
    fn test_versions_are_newest_first() {
        let mut row = Row::new("row1");
        row.insert(cell("qual1", 1, "val1")).unwrap();
        row.insert(cell("qual1", 3, "val3")).unwrap();
        row.insert(cell("qual1", 2, "val2")).unwrap();

        let versions = row.versions("cf1", &Qualifier::from("qual1"));
        let stamps: Vec<i64> = versions.iter().map(|c| c.timestamp.value()).collect();
        assert_eq!(stamps, vec![3, 2, 1]);
        assert_eq!(row.value("cf1", "qual1"), Some(&b"val3"[..]));
    }

    #[test]
    fn test_same_timestamp_replaces() {
        let mut row = Row::new("row1");
        row.insert(cell("qual1", 5, "old")).unwrap();
        row.insert(cell("qual1", 5, "new")).unwrap();

        assert_eq!(row.len(), 1);
        assert_eq!(row.value("cf1", "qual1"), Some(&b"new"[..]));
    }

    #[test]
    fn test_insert_rejects_foreign_row() {
        let mut row = Row::new("row1");
        let err = row
            .insert(Cell::new("row2", "cf1", "q", Timestamp::new(1), "v"))
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidArgument(_)));
    }

    #[test]
    fn test_filter_cells_drops_empty_row() {
        let mut row = Row::new("row1");
        row.insert(cell("alpha", 1, "a")).unwrap();
        row.insert(cell("beta", 1, "b")).unwrap();

        let kept = row.filter_cells(|c| c.qualifier.starts_with(b"alpha")).unwrap();
        assert_eq!(kept.column_count(), 1);

        assert!(row.filter_cells(|_| false).is_none());
    }

    #[test]
    fn test_truncate_versions() {
        let mut row = Row::new("row1");
        for ts in 1..=4 {
            row.insert(cell("qual1", ts, "v")).unwrap();
        }
        row.truncate_versions(2);
        let stamps: Vec<i64> = row
            .versions("cf1", &Qualifier::from("qual1"))
            .iter()
            .map(|c| c.timestamp.value())
            .collect();
        assert_eq!(stamps, vec![4, 3]);
    }

    #[test]
    fn test_remove_column_respects_timestamp() {
        let mut row = Row::new("row1");
        row.insert(cell("qual1", 1, "a")).unwrap();
        row.insert(cell("qual1", 10, "b")).unwrap();

        row.remove_column("cf1", &Qualifier::from("qual1"), Timestamp::new(5));
        assert_eq!(row.len(), 1);
        assert_eq!(row.value("cf1", "qual1"), Some(&b"b"[..]));

        row.remove_column("cf1", &Qualifier::from("qual1"), Timestamp::new(10));
        assert!(row.is_empty());
    }

    #[test]
    fn test_remove_family_leaves_other_families() {
        let mut row = Row::new("row1");
        row.insert(cell("qual1", 1, "a")).unwrap();
        row.insert(Cell::new("row1", "cf2", "qual1", Timestamp::new(1), "b"))
            .unwrap();

        row.remove_family("cf1", Timestamp::new(100));
        assert!(!row.has_family("cf1"));
        assert!(row.has_family("cf2"));
    }
}
