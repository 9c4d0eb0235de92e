//! Table handle
//!
//! Point operations are single-entry batches. Multi-row reads and bulk
//! writes fail with the first positional error.

use std::sync::Arc;

use crate::backend::StorageBackend;
use crate::batch::{BatchExecutor, BatchOperation, BatchResponse, BatchResult};
use crate::cell::{Cell, Qualifier, Row, RowKey};
use crate::config::ClientConfig;
use crate::errors::{ClientError, ClientResult};
use crate::filter::{FilterCompiler, FilterSpec, ScanFilter};
use crate::mutation::{ConditionalMutator, Delete, Get, MutationBatch, Put};
use crate::observability::MetricsRegistry;
use crate::predicate::PredicateSet;
use crate::scan::{PageError, PaginationEngine, Paginator, ScanCursor, ScanPage};

/// Operations against one table
#[derive(Clone)]
pub struct Table {
    name: String,
    backend: Arc<dyn StorageBackend>,
    config: ClientConfig,
    mutator: ConditionalMutator,
    batches: BatchExecutor,
    pages: PaginationEngine,
}

impl Table {
    pub(crate) fn new(
        name: String,
        backend: Arc<dyn StorageBackend>,
        config: ClientConfig,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        let pages = PaginationEngine::new(backend.clone(), metrics.clone())
            .with_max_versions(config.default_max_versions);
        Self {
            name,
            mutator: ConditionalMutator::new(backend.clone(), metrics.clone()),
            batches: BatchExecutor::new(backend.clone(), metrics),
            pages,
            backend,
            config,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    // ==================
    // Reads
    // ==================

    /// Newest version of one column
    pub fn get_latest(
        &self,
        row: impl Into<RowKey>,
        family: &str,
        qualifier: impl Into<Qualifier>,
    ) -> ClientResult<Option<Cell>> {
        self.backend
            .get_latest(&self.name, &row.into(), family, &qualifier.into())
    }

    /// Reads one row; None if nothing matches the selection
    pub fn get(&self, get: Get) -> ClientResult<Option<Row>> {
        let get = self.resolve_get(get);
        Ok(self.execute_one(BatchOperation::Get(get))?.into_row())
    }

    /// Reads several rows, results in request order
    pub fn get_many(&self, gets: Vec<Get>) -> ClientResult<Vec<Option<Row>>> {
        let ops: Vec<BatchOperation> = gets
            .into_iter()
            .map(|g| BatchOperation::Get(self.resolve_get(g)))
            .collect();

        self.batches
            .execute(&self.name, &ops)?
            .into_iter()
            .map(|r| r.map(BatchResponse::into_row))
            .collect()
    }

    // ==================
    // Writes
    // ==================

    pub fn put(&self, put: Put) -> ClientResult<()> {
        self.execute_one(BatchOperation::Put(put)).map(|_| ())
    }

    /// Writes many rows in one batch
    pub fn put_all(&self, puts: Vec<Put>) -> ClientResult<()> {
        let ops: Vec<BatchOperation> = puts.into_iter().map(BatchOperation::Put).collect();
        for result in self.batches.execute(&self.name, &ops)? {
            result?;
        }
        Ok(())
    }

    pub fn delete(&self, delete: Delete) -> ClientResult<()> {
        self.execute_one(BatchOperation::Delete(delete)).map(|_| ())
    }

    /// Deletes every column of a row
    pub fn delete_row(&self, row: impl Into<RowKey>) -> ClientResult<()> {
        self.delete(Delete::new(row))
    }

    /// Deletes every column of one family in a row
    pub fn delete_family(&self, row: impl Into<RowKey>, family: &str) -> ClientResult<()> {
        self.delete(Delete::new(row).add_family(family))
    }

    /// Deletes every version of one column
    pub fn delete_columns(
        &self,
        row: impl Into<RowKey>,
        family: &str,
        qualifier: impl Into<Qualifier>,
    ) -> ClientResult<()> {
        self.delete(Delete::new(row).add_columns(family, qualifier))
    }

    /// Applies `mutations` iff every predicate holds; see [`ConditionalMutator`]
    pub fn check_and_mutate(
        &self,
        row: impl Into<RowKey>,
        predicates: &PredicateSet,
        mutations: &MutationBatch,
    ) -> ClientResult<bool> {
        self.mutator
            .check_and_mutate(&self.name, &row.into(), predicates, mutations)
    }

    /// Heterogeneous batch with positional results
    pub fn batch(&self, operations: Vec<BatchOperation>) -> ClientResult<Vec<BatchResult>> {
        let ops: Vec<BatchOperation> = operations
            .into_iter()
            .map(|op| match op {
                BatchOperation::Get(get) => BatchOperation::Get(self.resolve_get(get)),
                other => other,
            })
            .collect();
        self.batches.execute(&self.name, &ops)
    }

    // ==================
    // Scans
    // ==================

    /// Reads the page following `cursor`
    pub fn scan_page(
        &self,
        filter: Option<&ScanFilter>,
        cursor: &ScanCursor,
        page_size: usize,
    ) -> Result<ScanPage, PageError> {
        self.config
            .check_page_size(page_size)
            .map_err(|source| PageError {
                resume_from: cursor.clone(),
                source,
            })?;
        self.pages.scan_page(&self.name, filter, cursor, page_size)
    }

    /// Iterator over pages; `page_size` defaults to the configured size
    pub fn paginate(
        &self,
        filter: Option<&FilterSpec>,
        page_size: Option<usize>,
    ) -> ClientResult<Paginator> {
        let page_size = page_size.unwrap_or(self.config.default_page_size);
        self.config.check_page_size(page_size)?;
        let filter = filter.map(FilterCompiler::compile).transpose()?;
        Ok(self.pages.paginate(self.name.clone(), filter, page_size))
    }

    /// Every row, optionally filtered, in ascending key order
    pub fn scan_all(&self, filter: Option<&FilterSpec>) -> ClientResult<Vec<Row>> {
        Ok(self.paginate(filter, None)?.collect_all()?)
    }

    /// Every row retained by `filter`
    pub fn filter_rows(&self, filter: &FilterSpec) -> ClientResult<Vec<Row>> {
        self.scan_all(Some(filter))
    }

    fn resolve_get(&self, get: Get) -> Get {
        match get.requested_versions() {
            Some(_) => get,
            None => get.max_versions(self.config.default_max_versions),
        }
    }

    fn execute_one(&self, operation: BatchOperation) -> ClientResult<BatchResponse> {
        self.batches
            .execute(&self.name, std::slice::from_ref(&operation))?
            .pop()
            .unwrap_or_else(|| {
                Err(ClientError::MalformedResponse(
                    "batch of one returned no result".to_string(),
                ))
            })
    }
}
