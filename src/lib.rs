//! widecol - Client-side access layer for a sparse, versioned wide-column store
//!
//! Rows are addressed by byte keys; cells by (family, qualifier, timestamp).
//! The core offers atomic multi-predicate check-and-mutate, compiled scan
//! filters, exclusive-start pagination and positional batches over any
//! [`backend::StorageBackend`].

pub mod backend;
pub mod batch;
pub mod cell;
pub mod client;
pub mod config;
pub mod errors;
pub mod filter;
pub mod mutation;
pub mod observability;
pub mod predicate;
pub mod scan;

pub use client::{Connection, Table};
pub use errors::{ClientError, ClientResult};
