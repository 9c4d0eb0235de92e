//! Batch operations and their positional results

use crate::cell::{Row, RowKey};
use crate::errors::ClientResult;
use crate::mutation::{Delete, Get, Put};

/// One entry of a heterogeneous batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    Put(Put),
    Get(Get),
    Delete(Delete),
}

impl BatchOperation {
    /// Row targeted by this operation
    pub fn row(&self) -> &RowKey {
        match self {
            BatchOperation::Put(put) => put.row(),
            BatchOperation::Get(get) => get.row(),
            BatchOperation::Delete(delete) => delete.row(),
        }
    }

    /// Operation name for logs
    pub fn name(&self) -> &'static str {
        match self {
            BatchOperation::Put(_) => "put",
            BatchOperation::Get(_) => "get",
            BatchOperation::Delete(_) => "delete",
        }
    }

    #[inline]
    pub fn is_read(&self) -> bool {
        matches!(self, BatchOperation::Get(_))
    }
}

impl From<Put> for BatchOperation {
    fn from(put: Put) -> Self {
        BatchOperation::Put(put)
    }
}

impl From<Get> for BatchOperation {
    fn from(get: Get) -> Self {
        BatchOperation::Get(get)
    }
}

impl From<Delete> for BatchOperation {
    fn from(delete: Delete) -> Self {
        BatchOperation::Delete(delete)
    }
}

/// Success payload of one batch position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchResponse {
    /// Result of a Get; None if the row or projection is empty
    Row(Option<Row>),
    /// Put or Delete applied
    Ack,
}

impl BatchResponse {
    /// Row payload of a Get; None for acks and empty reads
    pub fn into_row(self) -> Option<Row> {
        match self {
            BatchResponse::Row(row) => row,
            BatchResponse::Ack => None,
        }
    }

    #[inline]
    pub fn is_ack(&self) -> bool {
        matches!(self, BatchResponse::Ack)
    }
}

/// Outcome of one batch position
pub type BatchResult = ClientResult<BatchResponse>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_row_and_name() {
        let op = BatchOperation::from(Delete::new("row2"));
        assert_eq!(op.row(), &RowKey::from("row2"));
        assert_eq!(op.name(), "delete");
        assert!(!op.is_read());
        assert!(BatchOperation::from(Get::new("row1")).is_read());
    }

    #[test]
    fn test_response_payloads() {
        assert!(BatchResponse::Ack.is_ack());
        assert!(BatchResponse::Ack.into_row().is_none());
        let row = BatchResponse::Row(Some(Row::new("row1"))).into_row().unwrap();
        assert_eq!(row.key(), &RowKey::from("row1"));
    }
}
