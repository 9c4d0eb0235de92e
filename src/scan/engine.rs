//! Pagination engine: repeated bounded scans with an exclusive-start cursor

use std::sync::Arc;

use thiserror::Error;

use crate::backend::{ScanRequest, StorageBackend};
use crate::cell::Row;
use crate::errors::{ClientError, ClientResult};
use crate::filter::ScanFilter;
use crate::observability::{log_event_with_fields, Event, MetricsRegistry};

use super::cursor::ScanCursor;

/// One page of a traversal and the cursor for the next one
#[derive(Debug, Clone)]
pub struct ScanPage {
    pub rows: Vec<Row>,
    pub next: ScanCursor,
}

impl ScanPage {
    /// True for the terminal empty page
    pub fn is_last(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A page failed; the traversal may resume from `resume_from`
#[derive(Debug, Clone, Error)]
#[error("scan page failed at {resume_from}: {source}")]
pub struct PageError {
    /// Cursor as it was before the failed page
    pub resume_from: ScanCursor,
    #[source]
    pub source: ClientError,
}

impl From<PageError> for ClientError {
    fn from(e: PageError) -> Self {
        e.source
    }
}

/// Drives bounded scans against a backend
#[derive(Clone)]
pub struct PaginationEngine {
    backend: Arc<dyn StorageBackend>,
    metrics: Arc<MetricsRegistry>,
    max_versions: usize,
}

impl PaginationEngine {
    /// Create an engine returning the newest version of each column
    pub fn new(backend: Arc<dyn StorageBackend>, metrics: Arc<MetricsRegistry>) -> Self {
        Self {
            backend,
            metrics,
            max_versions: 1,
        }
    }

    /// Versions per column returned in each row
    pub fn with_max_versions(mut self, max_versions: usize) -> Self {
        self.max_versions = max_versions.max(1);
        self
    }

    /// Reads the page following `cursor`.
    ///
    /// A `Done` cursor returns an empty page without touching the backend.
    /// An empty page moves the cursor to `Done`.
    pub fn scan_page(
        &self,
        table: &str,
        filter: Option<&ScanFilter>,
        cursor: &ScanCursor,
        page_size: usize,
    ) -> Result<ScanPage, PageError> {
        if cursor.is_done() {
            return Ok(ScanPage {
                rows: Vec::new(),
                next: cursor.clone(),
            });
        }

        let rows = match self.read_page(table, filter, cursor, page_size) {
            Ok(rows) => rows,
            Err(source) => {
                if source.is_backend_failure() {
                    self.metrics.increment_backend_errors();
                }
                let at = cursor.to_string();
                log_event_with_fields(
                    Event::ScanPageFailed,
                    &[("table", table), ("cursor", at.as_str()), ("code", source.code())],
                );
                return Err(PageError {
                    resume_from: cursor.clone(),
                    source,
                });
            }
        };

        self.metrics.record_page(rows.len() as u64);

        let next = match rows.last() {
            Some(last) => cursor.advance(last.key().clone()),
            None => cursor.finish(),
        };

        let count = rows.len().to_string();
        let at = next.to_string();
        let event = if next.is_done() {
            Event::ScanDone
        } else {
            Event::ScanPage
        };
        log_event_with_fields(
            event,
            &[("table", table), ("rows", count.as_str()), ("cursor", at.as_str())],
        );

        Ok(ScanPage { rows, next })
    }

    /// Iterator over every non-empty page from the lowest key
    pub fn paginate(
        &self,
        table: impl Into<String>,
        filter: Option<ScanFilter>,
        page_size: usize,
    ) -> Paginator {
        Paginator {
            engine: self.clone(),
            table: table.into(),
            filter,
            page_size,
            cursor: ScanCursor::initial(),
            failed: false,
        }
    }

    fn read_page(
        &self,
        table: &str,
        filter: Option<&ScanFilter>,
        cursor: &ScanCursor,
        page_size: usize,
    ) -> ClientResult<Vec<Row>> {
        if page_size == 0 {
            return Err(ClientError::invalid_argument("page size must be > 0"));
        }

        let request = ScanRequest {
            filter,
            start: cursor.start_bound(),
            limit: Some(page_size),
            max_versions: Some(self.max_versions),
        };

        let mut scanner = self.backend.open_scan(table, &request)?;
        let mut rows: Vec<Row> = Vec::new();

        while rows.len() < page_size {
            let row = match scanner.next() {
                None => break,
                Some(Ok(row)) => row,
                Some(Err(e)) => {
                    scanner.close();
                    return Err(e);
                }
            };

            let in_order = match rows.last() {
                Some(prev) => row.key() > prev.key(),
                None => request.start.admits(row.key()),
            };
            if !in_order {
                scanner.close();
                return Err(ClientError::MalformedResponse(format!(
                    "scan returned row '{}' out of order for start {}",
                    row.key(),
                    request.start
                )));
            }

            rows.push(row);
        }

        scanner.close();
        Ok(rows)
    }
}

/// Iterator of pages; yields each non-empty page once and stops at `Done`.
///
/// After an error the iterator is fused. Use [`Paginator::cursor`] to
/// resume with [`Paginator::resume_from`].
pub struct Paginator {
    engine: PaginationEngine,
    table: String,
    filter: Option<ScanFilter>,
    page_size: usize,
    cursor: ScanCursor,
    failed: bool,
}

impl Paginator {
    /// Continues a traversal from a saved cursor
    pub fn resume_from(mut self, cursor: ScanCursor) -> Self {
        self.cursor = cursor;
        self.failed = false;
        self
    }

    /// Cursor of the next page to be read
    #[inline]
    pub fn cursor(&self) -> &ScanCursor {
        &self.cursor
    }

    /// Drives the traversal to `Done`, concatenating pages
    pub fn collect_all(self) -> Result<Vec<Row>, PageError> {
        let mut rows = Vec::new();
        for page in self {
            rows.extend(page?);
        }
        Ok(rows)
    }
}

impl Iterator for Paginator {
    type Item = Result<Vec<Row>, PageError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.cursor.is_done() {
            return None;
        }

        match self
            .engine
            .scan_page(&self.table, self.filter.as_ref(), &self.cursor, self.page_size)
        {
            Ok(page) => {
                self.cursor = page.next;
                if page.rows.is_empty() {
                    None
                } else {
                    Some(Ok(page.rows))
                }
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ColumnFamilyDescriptor, InMemoryBackend, TableDescriptor};
    use crate::batch::BatchOperation;
    use crate::cell::RowKey;
    use crate::mutation::Put;
    use crate::scan::PaginationState;

    fn engine_with_rows(keys: &[&str]) -> PaginationEngine {
        let backend = InMemoryBackend::new();
        backend
            .create_table(TableDescriptor::new("t").with_family(ColumnFamilyDescriptor::new("cf")))
            .unwrap();
        let puts: Vec<BatchOperation> = keys
            .iter()
            .map(|key| BatchOperation::Put(Put::new(*key).add_column("cf", "q", "v")))
            .collect();
        for result in backend.apply_batch("t", &puts).unwrap() {
            result.unwrap();
        }
        PaginationEngine::new(Arc::new(backend), Arc::new(MetricsRegistry::new()))
    }

    fn keys(rows: &[Row]) -> Vec<String> {
        rows.iter().map(|r| r.key().to_text()).collect()
    }

    #[test]
    fn test_pages_advance_past_last_row() {
        let engine = engine_with_rows(&["a", "b", "c"]);

        let page = engine
            .scan_page("t", None, &ScanCursor::initial(), 2)
            .unwrap();
        assert_eq!(keys(&page.rows), vec!["a", "b"]);
        assert_eq!(page.next.last_row(), Some(&RowKey::from("b")));
        assert!(!page.next.is_inclusive());

        let page = engine.scan_page("t", None, &page.next, 2).unwrap();
        assert_eq!(keys(&page.rows), vec!["c"]);

        let page = engine.scan_page("t", None, &page.next, 2).unwrap();
        assert!(page.is_last());
        assert_eq!(page.next.state(), PaginationState::Done);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let engine = engine_with_rows(&["a"]);
        let err = engine
            .scan_page("t", None, &ScanCursor::initial(), 0)
            .unwrap_err();
        assert!(matches!(err.source, ClientError::InvalidArgument(_)));
        assert_eq!(err.resume_from, ScanCursor::initial());
    }

    #[test]
    fn test_missing_table_surfaces_with_cursor() {
        let engine = engine_with_rows(&[]);
        let err = engine
            .scan_page("absent", None, &ScanCursor::initial(), 5)
            .unwrap_err();
        assert!(matches!(err.source, ClientError::TableNotFound(_)));
    }

    #[test]
    fn test_paginator_collects_everything() {
        let engine = engine_with_rows(&["a", "b", "c", "d", "e"]);
        let mut pages = engine.paginate("t", None, 2);
        let sizes: Vec<usize> = pages.by_ref().map(|p| p.unwrap().len()).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
        assert!(pages.cursor().is_done());
    }
}
