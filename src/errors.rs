//! # Client Errors
//!
//! Error kinds surfaced by the access layer.
//!
//! A failed check-and-mutate is not an error: it is a normal `Ok(false)`.
//! Per-operation failures inside a batch are carried positionally and never
//! escalate to the whole batch.

use thiserror::Error;

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Client errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    // ==================
    // Caller Errors
    // ==================
    /// Malformed predicate scoping, empty mutation batch, row mismatch
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Filter could not be compiled (bad regex, unsupported operator)
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// Configuration rejected
    #[error("Config error: {0}")]
    Config(String),

    // ==================
    // Schema Errors
    // ==================
    /// Referenced column family is not declared on the table
    #[error("Column family '{family}' does not exist in table '{table}'")]
    NoSuchColumnFamily { table: String, family: String },

    /// Table does not exist
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// Table already exists
    #[error("Table already exists: {0}")]
    TableExists(String),

    // ==================
    // Backend Errors
    // ==================
    /// Transport or connection failure, not retried internally
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Backend broke a protocol invariant
    #[error("Malformed backend response: {0}")]
    MalformedResponse(String),
}

impl ClientError {
    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create an invalid filter error
    pub fn invalid_filter(msg: impl Into<String>) -> Self {
        Self::InvalidFilter(msg.into())
    }

    /// Create a backend unavailable error
    pub fn backend_unavailable(msg: impl Into<String>) -> Self {
        Self::BackendUnavailable(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a missing column family error
    pub fn no_such_family(table: impl Into<String>, family: impl Into<String>) -> Self {
        Self::NoSuchColumnFamily {
            table: table.into(),
            family: family.into(),
        }
    }

    /// Stable error code for logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "WIDECOL_INVALID_ARGUMENT",
            Self::InvalidFilter(_) => "WIDECOL_INVALID_FILTER",
            Self::Config(_) => "WIDECOL_CONFIG",
            Self::NoSuchColumnFamily { .. } => "WIDECOL_NO_SUCH_COLUMN_FAMILY",
            Self::TableNotFound(_) => "WIDECOL_TABLE_NOT_FOUND",
            Self::TableExists(_) => "WIDECOL_TABLE_EXISTS",
            Self::BackendUnavailable(_) => "WIDECOL_BACKEND_UNAVAILABLE",
            Self::MalformedResponse(_) => "WIDECOL_MALFORMED_RESPONSE",
        }
    }

    /// Only transport failures may succeed on a later attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::BackendUnavailable(_))
    }

    /// True for errors raised by the backend rather than by argument checks
    pub fn is_backend_failure(&self) -> bool {
        matches!(
            self,
            Self::BackendUnavailable(_) | Self::MalformedResponse(_)
        )
    }
}

impl From<regex::Error> for ClientError {
    fn from(e: regex::Error) -> Self {
        Self::InvalidFilter(e.to_string())
    }
}
