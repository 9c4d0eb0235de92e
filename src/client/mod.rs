//! # Client
//!
//! Façade over the core components. A [`Connection`] owns the backend
//! handle, settings and counters; a [`Table`] routes each call to the
//! coordinator, the batch executor or the pagination engine.

mod connection;
mod table;

pub use connection::Connection;
pub use table::Table;
