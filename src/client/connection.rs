//! Connection: a backend, its settings, and shared counters

use std::sync::Arc;

use crate::backend::StorageBackend;
use crate::config::ClientConfig;
use crate::errors::ClientResult;
use crate::observability::MetricsRegistry;

use super::table::Table;

/// Entry point of the access layer
#[derive(Clone)]
pub struct Connection {
    backend: Arc<dyn StorageBackend>,
    config: ClientConfig,
    metrics: Arc<MetricsRegistry>,
}

impl Connection {
    /// Connect over an owned backend
    pub fn new(
        backend: impl StorageBackend + 'static,
        config: ClientConfig,
    ) -> ClientResult<Self> {
        Self::from_shared(Arc::new(backend), config)
    }

    /// Connect over a backend shared with other owners.
    ///
    /// Validates `config`. The log level is process-wide and is not applied
    /// here; see [`ClientConfig::apply_log_level`].
    pub fn from_shared(
        backend: Arc<dyn StorageBackend>,
        config: ClientConfig,
    ) -> ClientResult<Self> {
        config.validate()?;

        Ok(Self {
            backend,
            config,
            metrics: Arc::new(MetricsRegistry::new()),
        })
    }

    /// Handle on one table. No I/O happens until an operation runs.
    pub fn table(&self, name: impl Into<String>) -> Table {
        Table::new(
            name.into(),
            self.backend.clone(),
            self.config.clone(),
            self.metrics.clone(),
        )
    }

    #[inline]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Counters shared by every table handle of this connection
    #[inline]
    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    #[inline]
    pub fn backend(&self) -> &Arc<dyn StorageBackend> {
        &self.backend
    }
}
