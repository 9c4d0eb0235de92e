//! In-memory reference backend
//!
//! Tables live in one `RwLock`. Conditional mutations and batches run under
//! the write lock, so predicate evaluation and application are one step.
//! Scans materialize the page under the read lock.
//!
//! Deletes remove versions at or before their timestamp physically; no
//! tombstones are kept.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::batch::{BatchOperation, BatchResponse, BatchResult};
use crate::cell::{Cell, Qualifier, Row, RowKey, Timestamp};
use crate::errors::{ClientError, ClientResult};
use crate::mutation::{DeleteTarget, Get, Mutation, MutationBatch};
use crate::observability::{log_event_with_fields, Event};
use crate::predicate::{Predicate, PredicateEvaluator};

use super::descriptor::TableDescriptor;
use super::{RowScanner, ScanRequest, StorageBackend};

struct TableState {
    descriptor: TableDescriptor,
    rows: BTreeMap<RowKey, Row>,
}

impl TableState {
    fn new(descriptor: TableDescriptor) -> Self {
        Self {
            descriptor,
            rows: BTreeMap::new(),
        }
    }

    fn check_family(&self, family: &str) -> ClientResult<()> {
        if self.descriptor.has_family(family) {
            Ok(())
        } else {
            Err(ClientError::no_such_family(self.descriptor.name(), family))
        }
    }

    fn check_mutations(&self, batch: &MutationBatch) -> ClientResult<()> {
        if batch.is_empty() {
            return Err(ClientError::invalid_argument(format!(
                "mutation batch for row '{}' is empty",
                batch.row()
            )));
        }
        for family in batch.families() {
            self.check_family(family)?;
        }
        Ok(())
    }

    /// Applies a validated batch to a copy of the row, then swaps it in
    fn apply_mutations(&mut self, batch: &MutationBatch) -> ClientResult<()> {
        let now = Timestamp::now();
        let key = batch.row();
        let mut row = self
            .rows
            .get(key)
            .cloned()
            .unwrap_or_else(|| Row::new(key.clone()));

        for mutation in batch.mutations() {
            match mutation {
                Mutation::Put(write) => row.insert(Cell::new(
                    key.clone(),
                    write.family.clone(),
                    write.qualifier.clone(),
                    write.timestamp.unwrap_or(now),
                    write.value.clone(),
                ))?,
                Mutation::Delete { target, upto } => {
                    let upto = upto.unwrap_or(now);
                    match target {
                        DeleteTarget::Row => row.remove_all(upto),
                        DeleteTarget::Family(family) => row.remove_family(family, upto),
                        DeleteTarget::Column { family, qualifier } => {
                            row.remove_column(family, qualifier, upto)
                        }
                        DeleteTarget::ColumnVersion {
                            family,
                            qualifier,
                            timestamp,
                        } => row.remove_version(family, qualifier, *timestamp),
                    }
                }
            }
        }

        for family in self.descriptor.families() {
            row.truncate_family_versions(family.name(), family.max_versions());
        }

        if row.is_empty() {
            self.rows.remove(key);
        } else {
            self.rows.insert(key.clone(), row);
        }
        Ok(())
    }

    fn get(&self, get: &Get) -> ClientResult<Option<Row>> {
        if get.requested_versions() == Some(0) {
            return Err(ClientError::invalid_argument("get must ask for at least 1 version"));
        }
        for selector in get.selectors() {
            self.check_family(selector.family())?;
        }
        Ok(self.rows.get(get.row()).and_then(|row| get.project(row)))
    }

    fn execute(&mut self, operation: &BatchOperation) -> BatchResult {
        match operation {
            BatchOperation::Get(get) => self.get(get).map(BatchResponse::Row),
            BatchOperation::Put(put) => {
                let batch = MutationBatch::from(put.clone());
                self.check_mutations(&batch)?;
                self.apply_mutations(&batch)?;
                Ok(BatchResponse::Ack)
            }
            BatchOperation::Delete(delete) => {
                let batch = MutationBatch::from(delete.clone());
                self.check_mutations(&batch)?;
                self.apply_mutations(&batch)?;
                Ok(BatchResponse::Ack)
            }
        }
    }
}

/// Reference backend holding every table in memory
pub struct InMemoryBackend {
    tables: RwLock<HashMap<String, TableState>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a table; fails if it already exists
    pub fn create_table(&self, descriptor: TableDescriptor) -> ClientResult<()> {
        descriptor.validate()?;

        let mut tables = self.write()?;
        if tables.contains_key(descriptor.name()) {
            return Err(ClientError::TableExists(descriptor.name().to_string()));
        }

        let name = descriptor.name().to_string();
        let families = descriptor
            .families()
            .iter()
            .map(|f| f.name())
            .collect::<Vec<_>>()
            .join(",");
        log_event_with_fields(
            Event::TableCreated,
            &[("table", name.as_str()), ("families", families.as_str())],
        );

        tables.insert(name, TableState::new(descriptor));
        Ok(())
    }

    /// Drops a table and all of its rows
    pub fn drop_table(&self, name: &str) -> ClientResult<()> {
        let mut tables = self.write()?;
        if tables.remove(name).is_none() {
            return Err(ClientError::TableNotFound(name.to_string()));
        }
        log_event_with_fields(Event::TableDropped, &[("table", name)]);
        Ok(())
    }

    pub fn table_exists(&self, name: &str) -> ClientResult<bool> {
        Ok(self.read()?.contains_key(name))
    }

    /// Descriptor of an existing table
    pub fn describe(&self, name: &str) -> ClientResult<TableDescriptor> {
        self.read()?
            .get(name)
            .map(|state| state.descriptor.clone())
            .ok_or_else(|| ClientError::TableNotFound(name.to_string()))
    }

    fn read(&self) -> ClientResult<RwLockReadGuard<'_, HashMap<String, TableState>>> {
        self.tables
            .read()
            .map_err(|e| ClientError::backend_unavailable(format!("table lock poisoned: {}", e)))
    }

    fn write(&self) -> ClientResult<RwLockWriteGuard<'_, HashMap<String, TableState>>> {
        self.tables
            .write()
            .map_err(|e| ClientError::backend_unavailable(format!("table lock poisoned: {}", e)))
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn table_not_found(table: &str) -> ClientError {
    ClientError::TableNotFound(table.to_string())
}

impl StorageBackend for InMemoryBackend {
    fn get_latest(
        &self,
        table: &str,
        row: &RowKey,
        family: &str,
        qualifier: &Qualifier,
    ) -> ClientResult<Option<Cell>> {
        let tables = self.read()?;
        let state = tables.get(table).ok_or_else(|| table_not_found(table))?;
        state.check_family(family)?;

        Ok(state
            .rows
            .get(row)
            .and_then(|r| r.latest(family, qualifier))
            .cloned())
    }

    fn apply_conditional(
        &self,
        table: &str,
        row: &RowKey,
        predicates: &[Predicate],
        mutations: &MutationBatch,
    ) -> ClientResult<bool> {
        if mutations.row() != row {
            return Err(ClientError::invalid_argument(format!(
                "mutation batch targets row '{}', expected '{}'",
                mutations.row(),
                row
            )));
        }

        let mut tables = self.write()?;
        let state = tables.get_mut(table).ok_or_else(|| table_not_found(table))?;

        for predicate in predicates {
            state.check_family(predicate.family())?;
        }
        state.check_mutations(mutations)?;

        if !PredicateEvaluator::evaluate_all(state.rows.get(row), predicates) {
            return Ok(false);
        }

        state.apply_mutations(mutations)?;
        Ok(true)
    }

    fn open_scan(&self, table: &str, request: &ScanRequest<'_>) -> ClientResult<RowScanner> {
        let tables = self.read()?;
        let state = tables.get(table).ok_or_else(|| table_not_found(table))?;

        let versions = request.versions();
        let rows: Vec<Row> = state
            .rows
            .range::<RowKey, _>((request.start.as_bound(), std::ops::Bound::Unbounded))
            .filter_map(|(_, row)| match request.filter {
                Some(filter) => filter.apply(row),
                None => Some(row.clone()),
            })
            .map(|mut row| {
                row.truncate_versions(versions);
                row
            })
            .filter(|row| !row.is_empty())
            .take(request.row_limit())
            .collect();

        Ok(RowScanner::from_rows(rows))
    }

    fn apply_batch(
        &self,
        table: &str,
        operations: &[BatchOperation],
    ) -> ClientResult<Vec<BatchResult>> {
        let mut tables = self.write()?;
        let state = tables.get_mut(table).ok_or_else(|| table_not_found(table))?;

        Ok(operations.iter().map(|op| state.execute(op)).collect())
    }
}
