//! Compiled scan filters applied on the scan path

use std::ops::Bound;

use regex::Regex;

use crate::cell::{Cell, Qualifier, Row};
use crate::predicate::MissingColumn;

/// Compiled filter tree, ready to attach to a scan request
#[derive(Debug, Clone)]
pub enum ScanFilter {
    /// Row key regex; `negate` keeps rows that do not match
    RowKey { regex: Regex, negate: bool },
    /// Current-value regex on one column; decides whole rows
    ColumnValue {
        family: String,
        qualifier: Qualifier,
        regex: Regex,
        negate: bool,
        missing: MissingColumn,
    },
    /// Qualifier prefix; decides cells
    QualifierPrefix(Vec<u8>),
    /// Qualifier range; decides cells
    QualifierRange {
        min: Bound<Vec<u8>>,
        max: Bound<Vec<u8>>,
    },
    /// AND
    All(Vec<ScanFilter>),
    /// OR
    Any(Vec<ScanFilter>),
}

impl ScanFilter {
    /// Applies the filter to a row.
    ///
    /// Row-level conditions are judged once against the unfiltered row, so
    /// a cell-level sibling never hides the column a value condition reads.
    /// Returns None when no cell survives.
    pub fn apply(&self, row: &Row) -> Option<Row> {
        let resolved = self.resolve(row);
        match &resolved {
            CellTest::Verdict(false) => None,
            CellTest::Verdict(true) if !row.is_empty() => Some(row.clone()),
            _ => row.filter_cells(|cell| resolved.retains(cell)),
        }
    }

    /// Returns true if `cell` of `row` survives this filter
    pub fn retains(&self, row: &Row, cell: &Cell) -> bool {
        self.resolve(row).retains(cell)
    }

    /// Replaces every row-level condition with its verdict for `row`
    fn resolve<'a>(&'a self, row: &Row) -> CellTest<'a> {
        match self {
            ScanFilter::RowKey { .. } | ScanFilter::ColumnValue { .. } => {
                CellTest::Verdict(self.accepts_row(row))
            }
            ScanFilter::QualifierPrefix(prefix) => CellTest::Prefix(prefix.as_slice()),
            ScanFilter::QualifierRange { min, max } => CellTest::Range(min, max),
            ScanFilter::All(children) => {
                let mut tests = Vec::with_capacity(children.len());
                for child in children {
                    match child.resolve(row) {
                        CellTest::Verdict(true) => {}
                        CellTest::Verdict(false) => return CellTest::Verdict(false),
                        test => tests.push(test),
                    }
                }
                if tests.is_empty() {
                    CellTest::Verdict(true)
                } else {
                    CellTest::All(tests)
                }
            }
            ScanFilter::Any(children) => {
                let mut tests = Vec::with_capacity(children.len());
                for child in children {
                    match child.resolve(row) {
                        CellTest::Verdict(true) => return CellTest::Verdict(true),
                        CellTest::Verdict(false) => {}
                        test => tests.push(test),
                    }
                }
                if tests.is_empty() {
                    CellTest::Verdict(false)
                } else {
                    CellTest::Any(tests)
                }
            }
        }
    }

    /// Row-level verdict; cell-level variants accept every row
    fn accepts_row(&self, row: &Row) -> bool {
        match self {
            ScanFilter::RowKey { regex, negate } => {
                regex.is_match(&row.key().to_text()) != *negate
            }
            ScanFilter::ColumnValue {
                family,
                qualifier,
                regex,
                negate,
                missing,
            } => match row.latest(family, qualifier) {
                Some(cell) => regex.is_match(&cell.value_text()) != *negate,
                None => missing.verdict(),
            },
            _ => true,
        }
    }

    /// Returns the variant name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            ScanFilter::RowKey { .. } => "row_key",
            ScanFilter::ColumnValue { .. } => "column_value",
            ScanFilter::QualifierPrefix(_) => "qualifier_prefix",
            ScanFilter::QualifierRange { .. } => "qualifier_range",
            ScanFilter::All(_) => "all",
            ScanFilter::Any(_) => "any",
        }
    }
}

/// A filter with its row-level conditions already decided for one row
enum CellTest<'a> {
    Verdict(bool),
    Prefix(&'a [u8]),
    Range(&'a Bound<Vec<u8>>, &'a Bound<Vec<u8>>),
    All(Vec<CellTest<'a>>),
    Any(Vec<CellTest<'a>>),
}

impl CellTest<'_> {
    fn retains(&self, cell: &Cell) -> bool {
        match self {
            CellTest::Verdict(keep) => *keep,
            CellTest::Prefix(prefix) => cell.qualifier.starts_with(prefix),
            CellTest::Range(min, max) => in_range(cell.qualifier.as_bytes(), min, max),
            CellTest::All(tests) => tests.iter().all(|t| t.retains(cell)),
            CellTest::Any(tests) => tests.iter().any(|t| t.retains(cell)),
        }
    }
}

fn in_range(q: &[u8], min: &Bound<Vec<u8>>, max: &Bound<Vec<u8>>) -> bool {
    let above_min = match min {
        Bound::Unbounded => true,
        Bound::Included(lo) => q >= lo.as_slice(),
        Bound::Excluded(lo) => q > lo.as_slice(),
    };
    let below_max = match max {
        Bound::Unbounded => true,
        Bound::Included(hi) => q <= hi.as_slice(),
        Bound::Excluded(hi) => q < hi.as_slice(),
    };
    above_min && below_max
}
