//! Conditional Mutation Coordinator
//!
//! Submits a predicate set and a mutation batch as one atomic request.
//! The coordinator holds no row state and takes no locks; atomicity is
//! the backend's responsibility.

use std::sync::Arc;

use crate::backend::StorageBackend;
use crate::cell::RowKey;
use crate::errors::{ClientError, ClientResult};
use crate::observability::{log_event_with_fields, Event, MetricsRegistry};
use crate::predicate::PredicateSet;

use super::batch::MutationBatch;

/// Check-and-mutate over a shared backend
#[derive(Clone)]
pub struct ConditionalMutator {
    backend: Arc<dyn StorageBackend>,
    metrics: Arc<MetricsRegistry>,
}

impl ConditionalMutator {
    pub fn new(backend: Arc<dyn StorageBackend>, metrics: Arc<MetricsRegistry>) -> Self {
        Self { backend, metrics }
    }

    /// Applies `mutations` to `row` iff every predicate holds.
    ///
    /// Returns `Ok(true)` if the batch was applied and `Ok(false)` if any
    /// predicate failed. Predicates and mutations must both target `row`.
    pub fn check_and_mutate(
        &self,
        table: &str,
        row: &RowKey,
        predicates: &PredicateSet,
        mutations: &MutationBatch,
    ) -> ClientResult<bool> {
        let row_text = row.to_string();
        let count = predicates.len().to_string();

        let result = Self::validate(row, predicates, mutations).and_then(|()| {
            self.backend
                .apply_conditional(table, row, predicates.predicates(), mutations)
        });

        match &result {
            Ok(true) => {
                self.metrics.increment_cas_applied();
                let ops = mutations.len().to_string();
                log_event_with_fields(
                    Event::CasApplied,
                    &[
                        ("table", table),
                        ("row", row_text.as_str()),
                        ("predicates", count.as_str()),
                        ("mutations", ops.as_str()),
                    ],
                );
            }
            Ok(false) => {
                self.metrics.increment_cas_rejected();
                log_event_with_fields(
                    Event::CasRejected,
                    &[("table", table), ("row", row_text.as_str()), ("predicates", count.as_str())],
                );
            }
            Err(e) => {
                if e.is_backend_failure() {
                    self.metrics.increment_backend_errors();
                }
                log_event_with_fields(
                    Event::CasFailed,
                    &[("table", table), ("row", row_text.as_str()), ("code", e.code())],
                );
            }
        }

        result
    }

    fn validate(
        row: &RowKey,
        predicates: &PredicateSet,
        mutations: &MutationBatch,
    ) -> ClientResult<()> {
        if predicates.row() != row {
            return Err(ClientError::invalid_argument(format!(
                "predicates target row '{}', expected '{}'",
                predicates.row(),
                row
            )));
        }
        if predicates.is_empty() {
            return Err(ClientError::invalid_argument(
                "check-and-mutate needs at least one predicate",
            ));
        }
        if mutations.row() != row {
            return Err(ClientError::invalid_argument(format!(
                "mutations target row '{}', expected '{}'",
                mutations.row(),
                row
            )));
        }
        if mutations.is_empty() {
            return Err(ClientError::invalid_argument(format!(
                "mutation batch for row '{}' is empty",
                row
            )));
        }
        Ok(())
    }
}
