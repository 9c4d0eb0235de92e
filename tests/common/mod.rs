//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use widecol::backend::{
    ColumnFamilyDescriptor, InMemoryBackend, RowScanner, ScanRequest, StorageBackend,
    TableDescriptor,
};
use widecol::batch::{BatchOperation, BatchResult};
use widecol::cell::{Cell, Qualifier, Row, RowKey};
use widecol::config::ClientConfig;
use widecol::mutation::{MutationBatch, Put};
use widecol::predicate::Predicate;
use widecol::{ClientError, ClientResult, Connection, Table};

pub const DEMO_TABLE: &str = "demoTable";
pub const TEST_TABLE: &str = "testtable";

/// Backend holding `demoTable` (cf1, cf2; three versions each)
pub fn demo_backend() -> Arc<InMemoryBackend> {
    let backend = Arc::new(InMemoryBackend::new());
    backend
        .create_table(TableDescriptor::new(DEMO_TABLE).with_families(["cf1", "cf2"], 3))
        .unwrap();
    backend
}

/// Backend holding `demoTable` plus a single-family `t` for key-only scans
pub fn scan_backend() -> Arc<InMemoryBackend> {
    let backend = demo_backend();
    backend
        .create_table(TableDescriptor::new("t").with_family(ColumnFamilyDescriptor::new("cf")))
        .unwrap();
    backend
}

pub fn connect(backend: Arc<dyn StorageBackend>) -> Connection {
    Connection::from_shared(backend, ClientConfig::default()).unwrap()
}

/// One cell per key in family `cf` of `table`
pub fn seed_keys(table: &Table, keys: &[&str]) {
    let puts = keys
        .iter()
        .map(|k| Put::new(*k).add_column("cf", "q", format!("v-{}", k)))
        .collect();
    table.put_all(puts).unwrap();
}

/// `testtable` with 100 rows `rowKey0..rowKey99` across info/ex/memo
pub fn seed_test_table(backend: &InMemoryBackend, conn: &Connection) -> Table {
    backend
        .create_table(TableDescriptor::new(TEST_TABLE).with_families(["info", "ex", "memo"], 1))
        .unwrap();
    let table = conn.table(TEST_TABLE);
    let puts = (0..100)
        .map(|i| {
            Put::new(format!("rowKey{}", i))
                .add_column("info", "username", format!("user{}", i))
                .add_column("ex", "addr", format!("street{}", i))
                .add_column("memo", "detail", format!("remark{}", i))
        })
        .collect();
    table.put_all(puts).unwrap();
    table
}

pub fn keys(rows: &[Row]) -> Vec<String> {
    rows.iter().map(|r| r.key().to_text()).collect()
}

pub fn qualifiers(row: &Row) -> Vec<String> {
    row.cells()
        .map(|c| String::from_utf8_lossy(c.qualifier.as_bytes()).into_owned())
        .collect()
}

// =============================================================================
// Fault injection
// =============================================================================

/// Wraps the in-memory backend and breaks scans or batches on demand
pub struct FaultyBackend {
    inner: Arc<InMemoryBackend>,
    /// Scans that may open before every later open fails
    scans_allowed: AtomicUsize,
    /// Rows a scan yields before failing mid-stream
    rows_before_failure: AtomicUsize,
    scans_opened: AtomicUsize,
    reverse_scans: AtomicBool,
    drop_batch_results: AtomicBool,
    unavailable: AtomicBool,
}

impl FaultyBackend {
    pub fn new(inner: Arc<InMemoryBackend>) -> Self {
        Self {
            inner,
            scans_allowed: AtomicUsize::new(usize::MAX),
            rows_before_failure: AtomicUsize::new(usize::MAX),
            scans_opened: AtomicUsize::new(0),
            reverse_scans: AtomicBool::new(false),
            drop_batch_results: AtomicBool::new(false),
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn fail_scans_after(&self, opens: usize) {
        self.scans_allowed.store(opens, Ordering::SeqCst);
    }

    pub fn fail_mid_scan_after(&self, rows: usize) {
        self.rows_before_failure.store(rows, Ordering::SeqCst);
    }

    pub fn heal(&self) {
        self.scans_allowed.store(usize::MAX, Ordering::SeqCst);
        self.rows_before_failure.store(usize::MAX, Ordering::SeqCst);
        self.unavailable.store(false, Ordering::SeqCst);
    }

    pub fn reverse_scans(&self) {
        self.reverse_scans.store(true, Ordering::SeqCst);
    }

    pub fn drop_batch_results(&self) {
        self.drop_batch_results.store(true, Ordering::SeqCst);
    }

    pub fn go_down(&self) {
        self.unavailable.store(true, Ordering::SeqCst);
    }

    pub fn scans_opened(&self) -> usize {
        self.scans_opened.load(Ordering::SeqCst)
    }

    fn check_up(&self) -> ClientResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ClientError::backend_unavailable("connection refused"));
        }
        Ok(())
    }
}

impl StorageBackend for FaultyBackend {
    fn get_latest(
        &self,
        table: &str,
        row: &RowKey,
        family: &str,
        qualifier: &Qualifier,
    ) -> ClientResult<Option<Cell>> {
        self.check_up()?;
        self.inner.get_latest(table, row, family, qualifier)
    }

    fn apply_conditional(
        &self,
        table: &str,
        row: &RowKey,
        predicates: &[Predicate],
        mutations: &MutationBatch,
    ) -> ClientResult<bool> {
        self.check_up()?;
        self.inner.apply_conditional(table, row, predicates, mutations)
    }

    fn open_scan(&self, table: &str, request: &ScanRequest<'_>) -> ClientResult<RowScanner> {
        self.check_up()?;
        let opened = self.scans_opened.fetch_add(1, Ordering::SeqCst);
        if opened >= self.scans_allowed.load(Ordering::SeqCst) {
            return Err(ClientError::backend_unavailable("scan timed out"));
        }

        let mut rows: Vec<Row> = self
            .inner
            .open_scan(table, request)?
            .collect::<ClientResult<_>>()?;

        if self.reverse_scans.load(Ordering::SeqCst) {
            rows.reverse();
        }

        let before_failure = self.rows_before_failure.load(Ordering::SeqCst);
        if before_failure == usize::MAX {
            return Ok(RowScanner::from_rows(rows));
        }

        let stream = rows
            .into_iter()
            .take(before_failure)
            .map(Ok)
            .chain(std::iter::once(Err(ClientError::backend_unavailable(
                "region server went away",
            ))));
        Ok(RowScanner::new(stream))
    }

    fn apply_batch(
        &self,
        table: &str,
        operations: &[BatchOperation],
    ) -> ClientResult<Vec<BatchResult>> {
        self.check_up()?;
        let mut results = self.inner.apply_batch(table, operations)?;
        if self.drop_batch_results.load(Ordering::SeqCst) {
            results.pop();
        }
        Ok(results)
    }
}
