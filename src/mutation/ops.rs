//! Single-row operations: Put, Delete, Get

use crate::cell::{Cell, ColumnKey, Qualifier, Row, RowKey, Timestamp};

/// One column write inside a Put
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnWrite {
    pub family: String,
    pub qualifier: Qualifier,
    /// None means the backend assigns the current time
    pub timestamp: Option<Timestamp>,
    pub value: Vec<u8>,
}

/// Writes one or more columns of one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Put {
    row: RowKey,
    writes: Vec<ColumnWrite>,
}

impl Put {
    /// Creates an empty Put for a row
    pub fn new(row: impl Into<RowKey>) -> Self {
        Self {
            row: row.into(),
            writes: Vec::new(),
        }
    }

    /// Adds a column write stamped by the backend
    pub fn add_column(
        mut self,
        family: impl Into<String>,
        qualifier: impl Into<Qualifier>,
        value: impl Into<Vec<u8>>,
    ) -> Self {
        self.writes.push(ColumnWrite {
            family: family.into(),
            qualifier: qualifier.into(),
            timestamp: None,
            value: value.into(),
        });
        self
    }

    /// Adds a column write with an explicit timestamp
    pub fn add_column_at(
        mut self,
        family: impl Into<String>,
        qualifier: impl Into<Qualifier>,
        timestamp: i64,
        value: impl Into<Vec<u8>>,
    ) -> Self {
        self.writes.push(ColumnWrite {
            family: family.into(),
            qualifier: qualifier.into(),
            timestamp: Some(Timestamp::new(timestamp)),
            value: value.into(),
        });
        self
    }

    #[inline]
    pub fn row(&self) -> &RowKey {
        &self.row
    }

    #[inline]
    pub fn writes(&self) -> &[ColumnWrite] {
        &self.writes
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

/// What a Delete removes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    /// Every column of the row
    Row,
    /// Every column of one family
    Family(String),
    /// Every version of one column
    Column { family: String, qualifier: Qualifier },
    /// Exactly one version of one column
    ColumnVersion {
        family: String,
        qualifier: Qualifier,
        timestamp: Timestamp,
    },
}

impl DeleteTarget {
    /// Family referenced by this target, if any
    pub fn family(&self) -> Option<&str> {
        match self {
            DeleteTarget::Row => None,
            DeleteTarget::Family(family)
            | DeleteTarget::Column { family, .. }
            | DeleteTarget::ColumnVersion { family, .. } => Some(family),
        }
    }
}

/// Removes cells from one row
///
/// A Delete with no targets removes the whole row. Versions newer than
/// the delete timestamp survive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delete {
    row: RowKey,
    targets: Vec<DeleteTarget>,
    timestamp: Option<Timestamp>,
}

impl Delete {
    /// Creates a Delete for a row
    pub fn new(row: impl Into<RowKey>) -> Self {
        Self {
            row: row.into(),
            targets: Vec::new(),
            timestamp: None,
        }
    }

    /// Deletes every column of a family
    pub fn add_family(mut self, family: impl Into<String>) -> Self {
        self.targets.push(DeleteTarget::Family(family.into()));
        self
    }

    /// Deletes every version of a column
    pub fn add_columns(
        mut self,
        family: impl Into<String>,
        qualifier: impl Into<Qualifier>,
    ) -> Self {
        self.targets.push(DeleteTarget::Column {
            family: family.into(),
            qualifier: qualifier.into(),
        });
        self
    }

    /// Deletes one version of a column
    pub fn add_column_version(
        mut self,
        family: impl Into<String>,
        qualifier: impl Into<Qualifier>,
        timestamp: i64,
    ) -> Self {
        self.targets.push(DeleteTarget::ColumnVersion {
            family: family.into(),
            qualifier: qualifier.into(),
            timestamp: Timestamp::new(timestamp),
        });
        self
    }

    /// Only versions at or before `timestamp` are removed
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(Timestamp::new(timestamp));
        self
    }

    #[inline]
    pub fn row(&self) -> &RowKey {
        &self.row
    }

    #[inline]
    pub fn timestamp(&self) -> Option<Timestamp> {
        self.timestamp
    }

    /// Effective targets; an untargeted Delete means the whole row
    pub fn targets(&self) -> Vec<DeleteTarget> {
        if self.targets.is_empty() {
            vec![DeleteTarget::Row]
        } else {
            self.targets.clone()
        }
    }
}

/// Column selection for a Get
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSelector {
    Family(String),
    Column(ColumnKey),
}

impl ColumnSelector {
    /// Family referenced by this selector
    pub fn family(&self) -> &str {
        match self {
            ColumnSelector::Family(family) => family,
            ColumnSelector::Column(column) => &column.family,
        }
    }

    fn selects(&self, cell: &Cell) -> bool {
        match self {
            ColumnSelector::Family(family) => &cell.family == family,
            ColumnSelector::Column(column) => cell.is_column(&column.family, &column.qualifier),
        }
    }
}

/// Reads one row, optionally narrowed to families or columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Get {
    row: RowKey,
    selectors: Vec<ColumnSelector>,
    max_versions: Option<usize>,
}

impl Get {
    /// Reads the whole row
    pub fn new(row: impl Into<RowKey>) -> Self {
        Self {
            row: row.into(),
            selectors: Vec::new(),
            max_versions: None,
        }
    }

    /// Narrows the read to a family
    pub fn add_family(mut self, family: impl Into<String>) -> Self {
        self.selectors.push(ColumnSelector::Family(family.into()));
        self
    }

    /// Narrows the read to a column
    pub fn add_column(
        mut self,
        family: impl Into<String>,
        qualifier: impl Into<Qualifier>,
    ) -> Self {
        self.selectors
            .push(ColumnSelector::Column(ColumnKey::new(family, qualifier)));
        self
    }

    /// Returns up to `n` versions per column; 0 is rejected when the Get runs
    pub fn max_versions(mut self, n: usize) -> Self {
        self.max_versions = Some(n);
        self
    }

    /// Returns every retained version
    pub fn all_versions(self) -> Self {
        self.max_versions(usize::MAX)
    }

    #[inline]
    pub fn row(&self) -> &RowKey {
        &self.row
    }

    #[inline]
    pub fn selectors(&self) -> &[ColumnSelector] {
        &self.selectors
    }

    /// Requested version count; None defers to the caller's default
    #[inline]
    pub fn requested_versions(&self) -> Option<usize> {
        self.max_versions
    }

    /// Projects a stored row onto this Get's selection
    pub fn project(&self, row: &Row) -> Option<Row> {
        let mut projected = if self.selectors.is_empty() {
            row.clone()
        } else {
            row.filter_cells(|cell| self.selectors.iter().any(|s| s.selects(cell)))?
        };
        projected.truncate_versions(self.max_versions.unwrap_or(1));
        if projected.is_empty() {
            None
        } else {
            Some(projected)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored_row() -> Row {
        let mut row = Row::new("row1");
        for (fam, qual, ts) in [("cf1", "qual1", 1), ("cf1", "qual1", 2), ("cf2", "qual2", 1)] {
            row.insert(Cell::new("row1", fam, qual, Timestamp::new(ts), "v"))
                .unwrap();
        }
        row
    }

    #[test]
    fn test_untargeted_delete_is_row_delete() {
        let delete = Delete::new("row1");
        assert_eq!(delete.targets(), vec![DeleteTarget::Row]);

        let delete = Delete::new("row1").add_family("cf1");
        assert_eq!(delete.targets(), vec![DeleteTarget::Family("cf1".into())]);
    }

    #[test]
    fn test_put_builder() {
        let put = Put::new("row1")
            .add_column_at("cf1", "qual1", 5, "row1_batch1")
            .add_column("cf2", "qual2", "row1_batch2");
        assert_eq!(put.writes().len(), 2);
        assert_eq!(put.writes()[0].timestamp, Some(Timestamp::new(5)));
        assert_eq!(put.writes()[1].timestamp, None);
    }

    #[test]
    fn test_get_projects_latest_by_default() {
        let row = stored_row();
        let got = Get::new("row1").project(&row).unwrap();
        assert_eq!(got.len(), 2);
        assert_eq!(
            got.latest("cf1", &Qualifier::from("qual1")).unwrap().timestamp,
            Timestamp::new(2)
        );
    }

    #[test]
    fn test_get_projects_selected_columns() {
        let row = stored_row();
        let got = Get::new("row1")
            .add_family("cf2")
            .all_versions()
            .project(&row)
            .unwrap();
        assert!(!got.has_family("cf1"));
        assert_eq!(got.len(), 1);

        let got = Get::new("row1")
            .add_column("cf1", "qual1")
            .all_versions()
            .project(&row)
            .unwrap();
        assert_eq!(got.len(), 2);
    }

    #[test]
    fn test_get_projection_with_no_match_is_none() {
        let row = stored_row();
        assert!(Get::new("row1").add_column("cf1", "absent").project(&row).is_none());
    }
}
