//! Batch Executor
//!
//! Validates each operation locally, forwards the valid ones in input
//! order, and merges both sets of outcomes back into input positions.

use std::sync::Arc;

use crate::backend::StorageBackend;
use crate::errors::{ClientError, ClientResult};
use crate::observability::{log_event_with_fields, Event, MetricsRegistry};

use super::operation::{BatchOperation, BatchResult};

/// Executes heterogeneous batches against one table
#[derive(Clone)]
pub struct BatchExecutor {
    backend: Arc<dyn StorageBackend>,
    metrics: Arc<MetricsRegistry>,
}

impl BatchExecutor {
    pub fn new(backend: Arc<dyn StorageBackend>, metrics: Arc<MetricsRegistry>) -> Self {
        Self { backend, metrics }
    }

    /// Runs `operations` and returns one result per operation, in order.
    ///
    /// A failing operation yields an error only at its own position. The
    /// outer `Err` is reserved for failures of the call as a whole, such
    /// as a missing table or an unreachable backend.
    pub fn execute(
        &self,
        table: &str,
        operations: &[BatchOperation],
    ) -> ClientResult<Vec<BatchResult>> {
        let mut results: Vec<Option<BatchResult>> = vec![None; operations.len()];
        let mut forwarded: Vec<usize> = Vec::with_capacity(operations.len());

        for (index, operation) in operations.iter().enumerate() {
            match Self::validate(operation) {
                Ok(()) => forwarded.push(index),
                Err(e) => results[index] = Some(Err(e)),
            }
        }

        if !forwarded.is_empty() {
            let sent: Vec<BatchOperation> = forwarded
                .iter()
                .map(|&i| operations[i].clone())
                .collect();

            let responses = match self.backend.apply_batch(table, &sent) {
                Ok(responses) => responses,
                Err(e) => {
                    if e.is_backend_failure() {
                        self.metrics.increment_backend_errors();
                    }
                    return Err(e);
                }
            };

            if responses.len() != sent.len() {
                self.metrics.increment_backend_errors();
                return Err(ClientError::MalformedResponse(format!(
                    "batch of {} operations returned {} results",
                    sent.len(),
                    responses.len()
                )));
            }

            for (index, response) in forwarded.into_iter().zip(responses) {
                results[index] = Some(response);
            }
        }

        let results: Vec<BatchResult> = results
            .into_iter()
            .map(|r| {
                r.unwrap_or_else(|| {
                    Err(ClientError::MalformedResponse(
                        "batch position left without a result".to_string(),
                    ))
                })
            })
            .collect();

        let mut failures = 0u64;
        for (index, (operation, result)) in operations.iter().zip(&results).enumerate() {
            if let Err(e) = result {
                failures += 1;
                let index = index.to_string();
                let row = operation.row().to_string();
                log_event_with_fields(
                    Event::BatchOperationFailed,
                    &[
                        ("table", table),
                        ("index", index.as_str()),
                        ("operation", operation.name()),
                        ("row", row.as_str()),
                        ("code", e.code()),
                    ],
                );
            }
        }

        self.metrics.record_batch(operations.len() as u64, failures);
        let total = operations.len().to_string();
        let failed = failures.to_string();
        log_event_with_fields(
            Event::BatchComplete,
            &[("table", table), ("operations", total.as_str()), ("failures", failed.as_str())],
        );

        Ok(results)
    }

    fn validate(operation: &BatchOperation) -> ClientResult<()> {
        match operation {
            BatchOperation::Put(put) if put.is_empty() => Err(ClientError::invalid_argument(
                format!("put for row '{}' has no columns", put.row()),
            )),
            BatchOperation::Get(get) if get.requested_versions() == Some(0) => {
                Err(ClientError::invalid_argument(format!(
                    "get for row '{}' asks for 0 versions",
                    get.row()
                )))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{InMemoryBackend, TableDescriptor};
    use crate::batch::BatchResponse;
    use crate::mutation::{Get, Put};

    fn executor() -> (BatchExecutor, Arc<MetricsRegistry>) {
        let backend = Arc::new(InMemoryBackend::new());
        backend
            .create_table(TableDescriptor::new("t").with_families(["cf1"], 1))
            .unwrap();
        let metrics = Arc::new(MetricsRegistry::new());
        (BatchExecutor::new(backend, metrics.clone()), metrics)
    }

    #[test]
    fn test_empty_put_fails_only_its_position() {
        let (executor, metrics) = executor();
        let ops = vec![
            BatchOperation::Put(Put::new("r1")),
            BatchOperation::Put(Put::new("r1").add_column("cf1", "q", "v")),
            BatchOperation::Get(Get::new("r1")),
        ];

        let results = executor.execute("t", &ops).unwrap();
        assert_eq!(results.len(), 3);
        assert!(matches!(results[0], Err(ClientError::InvalidArgument(_))));
        assert_eq!(results[1], Ok(BatchResponse::Ack));
        let row = results[2].clone().unwrap().into_row().unwrap();
        assert_eq!(row.value("cf1", "q"), Some(&b"v"[..]));

        let s = metrics.snapshot();
        assert_eq!(s.batch_operations, 3);
        assert_eq!(s.batch_failures, 1);
    }

    #[test]
    fn test_zero_version_get_rejected() {
        let (executor, _) = executor();
        let ops = vec![
            BatchOperation::Get(Get::new("r1").max_versions(0)),
            BatchOperation::Get(Get::new("r1").max_versions(1)),
        ];

        let results = executor.execute("t", &ops).unwrap();
        assert!(matches!(results[0], Err(ClientError::InvalidArgument(_))));
        assert_eq!(results[1], Ok(BatchResponse::Row(None)));
    }

    #[test]
    fn test_empty_batch() {
        let (executor, _) = executor();
        assert!(executor.execute("t", &[]).unwrap().is_empty());
    }

    #[test]
    fn test_missing_table_fails_whole_call() {
        let (executor, _) = executor();
        let ops = vec![BatchOperation::Get(Get::new("r1"))];
        assert!(matches!(
            executor.execute("absent", &ops),
            Err(ClientError::TableNotFound(_))
        ));
    }
}
