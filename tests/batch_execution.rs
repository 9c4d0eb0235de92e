//! Batch Execution Tests
//!
//! - One result per operation, in input order
//! - A failing position never disturbs the others
//! - Whole-call failures are distinct from positional ones

mod common;

use std::sync::Arc;

use common::{connect, demo_backend, FaultyBackend, DEMO_TABLE};
use widecol::batch::{BatchOperation, BatchResponse};
use widecol::mutation::{Delete, Get, Put};
use widecol::ClientError;

// =============================================================================
// Positional results
// =============================================================================

/// [Put(row1), Get(row1), Delete(row2), Get(row2, noexists)]
#[test]
fn test_mixed_batch_isolates_bad_family() {
    let conn = connect(demo_backend());
    let table = conn.table(DEMO_TABLE);
    table
        .put(Put::new("row2").add_column("cf1", "qual1", "before"))
        .unwrap();

    let results = table
        .batch(vec![
            BatchOperation::Put(
                Put::new("row1")
                    .add_column_at("cf1", "qual1", 5, "row1_batch1")
                    .add_column_at("cf2", "qual2", 5, "row1_batch2"),
            ),
            BatchOperation::Get(Get::new("row1").add_column("cf1", "qual1")),
            BatchOperation::Delete(Delete::new("row2").add_columns("cf1", "qual1")),
            BatchOperation::Get(Get::new("row2").add_family("noexists")),
        ])
        .unwrap();

    assert_eq!(results.len(), 4);
    assert_eq!(results[0], Ok(BatchResponse::Ack));

    let row = results[1].clone().unwrap().into_row().unwrap();
    assert_eq!(row.value("cf1", "qual1"), Some(&b"row1_batch1"[..]));
    assert!(!row.has_family("cf2"));

    assert!(results[2].as_ref().unwrap().is_ack());

    match &results[3] {
        Err(ClientError::NoSuchColumnFamily { table, family }) => {
            assert_eq!(table, DEMO_TABLE);
            assert_eq!(family, "noexists");
        }
        other => panic!("expected NoSuchColumnFamily, got {:?}", other),
    }

    // Positions 0 and 2 took effect despite position 3
    assert!(table.get_latest("row1", "cf2", "qual2").unwrap().is_some());
    assert!(table.get_latest("row2", "cf1", "qual1").unwrap().is_none());

    let s = conn.metrics().snapshot();
    assert_eq!(s.batch_failures, 1);
}

/// Same-row side effects follow input order.
#[test]
fn test_same_row_order_preserved() {
    let conn = connect(demo_backend());
    let table = conn.table(DEMO_TABLE);

    let results = table
        .batch(vec![
            Put::new("row1").add_column_at("cf1", "q", 1, "first").into(),
            Delete::new("row1").add_columns("cf1", "q").with_timestamp(1).into(),
            Put::new("row1").add_column_at("cf1", "q", 2, "second").into(),
            Get::new("row1").all_versions().into(),
        ])
        .unwrap();

    let row = results[3].clone().unwrap().into_row().unwrap();
    assert_eq!(row.len(), 1);
    assert_eq!(row.value("cf1", "q"), Some(&b"second"[..]));
}

/// An empty Put fails locally; its neighbours still run.
#[test]
fn test_empty_put_fails_in_place() {
    let conn = connect(demo_backend());
    let table = conn.table(DEMO_TABLE);

    let results = table
        .batch(vec![
            Put::new("row1").into(),
            Put::new("row1").add_column("cf1", "q", "v").into(),
        ])
        .unwrap();
    assert!(matches!(results[0], Err(ClientError::InvalidArgument(_))));
    assert!(results[1].is_ok());
}

/// A Get of a missing row succeeds with no payload.
#[test]
fn test_get_missing_row_is_empty_success() {
    let conn = connect(demo_backend());
    let table = conn.table(DEMO_TABLE);

    let results = table.batch(vec![Get::new("ghost").into()]).unwrap();
    assert_eq!(results[0], Ok(BatchResponse::Row(None)));
}

// =============================================================================
// Whole-call failures
// =============================================================================

#[test]
fn test_missing_table_fails_whole_batch() {
    let conn = connect(demo_backend());
    let table = conn.table("absent");
    let err = table.batch(vec![Get::new("row1").into()]).unwrap_err();
    assert!(matches!(err, ClientError::TableNotFound(_)));
}

#[test]
fn test_backend_down_fails_whole_batch() {
    let faulty = Arc::new(FaultyBackend::new(demo_backend()));
    let conn = connect(faulty.clone());
    let table = conn.table(DEMO_TABLE);
    faulty.go_down();

    let err = table.batch(vec![Get::new("row1").into()]).unwrap_err();
    assert!(err.is_retryable());
}

/// A backend that loses results breaks the positional contract.
#[test]
fn test_result_count_mismatch_is_malformed() {
    let faulty = Arc::new(FaultyBackend::new(demo_backend()));
    let conn = connect(faulty.clone());
    let table = conn.table(DEMO_TABLE);
    faulty.drop_batch_results();

    let err = table
        .batch(vec![Get::new("row1").into(), Get::new("row2").into()])
        .unwrap_err();
    assert!(matches!(err, ClientError::MalformedResponse(_)));
}
