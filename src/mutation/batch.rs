//! Mutation batches: puts and deletes for one row, applied together

use crate::cell::{RowKey, Timestamp};
use crate::errors::{ClientError, ClientResult};

use super::ops::{ColumnWrite, Delete, DeleteTarget, Put};

/// One step of a mutation batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Put(ColumnWrite),
    Delete {
        target: DeleteTarget,
        /// None means the backend uses the current time
        upto: Option<Timestamp>,
    },
}

impl Mutation {
    /// Family referenced by this mutation, if any
    pub fn family(&self) -> Option<&str> {
        match self {
            Mutation::Put(write) => Some(&write.family),
            Mutation::Delete { target, .. } => target.family(),
        }
    }
}

/// Ordered puts and deletes scoped to exactly one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationBatch {
    row: RowKey,
    mutations: Vec<Mutation>,
}

impl MutationBatch {
    /// Creates an empty batch for a row
    pub fn new(row: impl Into<RowKey>) -> Self {
        Self {
            row: row.into(),
            mutations: Vec::new(),
        }
    }

    /// Appends every write of a Put; the Put must target this row
    pub fn add_put(&mut self, put: Put) -> ClientResult<()> {
        self.check_row(put.row())?;
        self.mutations
            .extend(put.writes().iter().cloned().map(Mutation::Put));
        Ok(())
    }

    /// Appends every target of a Delete; the Delete must target this row
    pub fn add_delete(&mut self, delete: Delete) -> ClientResult<()> {
        self.check_row(delete.row())?;
        let upto = delete.timestamp();
        self.mutations.extend(
            delete
                .targets()
                .into_iter()
                .map(|target| Mutation::Delete { target, upto }),
        );
        Ok(())
    }

    /// Builder form of [`add_put`](Self::add_put)
    pub fn with_put(mut self, put: Put) -> ClientResult<Self> {
        self.add_put(put)?;
        Ok(self)
    }

    /// Builder form of [`add_delete`](Self::add_delete)
    pub fn with_delete(mut self, delete: Delete) -> ClientResult<Self> {
        self.add_delete(delete)?;
        Ok(self)
    }

    fn check_row(&self, row: &RowKey) -> ClientResult<()> {
        if row != &self.row {
            return Err(ClientError::invalid_argument(format!(
                "mutation for row '{}' does not belong to batch for row '{}'",
                row, self.row
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn row(&self) -> &RowKey {
        &self.row
    }

    #[inline]
    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    /// Distinct families referenced, in first-seen order
    pub fn families(&self) -> Vec<&str> {
        let mut families: Vec<&str> = Vec::new();
        for family in self.mutations.iter().filter_map(Mutation::family) {
            if !families.contains(&family) {
                families.push(family);
            }
        }
        families
    }
}

impl From<Put> for MutationBatch {
    fn from(put: Put) -> Self {
        let mut batch = MutationBatch::new(put.row().clone());
        batch
            .mutations
            .extend(put.writes().iter().cloned().map(Mutation::Put));
        batch
    }
}

impl From<Delete> for MutationBatch {
    fn from(delete: Delete) -> Self {
        let mut batch = MutationBatch::new(delete.row().clone());
        let upto = delete.timestamp();
        batch.mutations.extend(
            delete
                .targets()
                .into_iter()
                .map(|target| Mutation::Delete { target, upto }),
        );
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_batch_keeps_order() {
        let batch = MutationBatch::new("row1")
            .with_put(
                Put::new("row1")
                    .add_column_at("cf1", "qual5", 1, "val1")
                    .add_column_at("cf1", "qual6", 1, "val1"),
            )
            .unwrap()
            .with_delete(Delete::new("row1").add_columns("cf1", "qual4"))
            .unwrap();

        assert_eq!(batch.len(), 3);
        assert!(matches!(batch.mutations()[0], Mutation::Put(_)));
        assert!(matches!(batch.mutations()[2], Mutation::Delete { .. }));
        assert_eq!(batch.families(), vec!["cf1"]);
    }

    #[test]
    fn test_foreign_row_rejected() {
        let mut batch = MutationBatch::new("row1");
        let err = batch
            .add_put(Put::new("row2").add_column("cf1", "q", "v"))
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidArgument(_)));
        assert!(batch.is_empty());
    }

    #[test]
    fn test_from_delete_row() {
        let batch = MutationBatch::from(Delete::new("row1").with_timestamp(7));
        assert_eq!(
            batch.mutations(),
            &[Mutation::Delete {
                target: DeleteTarget::Row,
                upto: Some(Timestamp::new(7)),
            }]
        );
        assert!(batch.families().is_empty());
    }

    #[test]
    fn test_empty_put_yields_empty_batch() {
        let batch = MutationBatch::from(Put::new("row1"));
        assert!(batch.is_empty());
    }
}
