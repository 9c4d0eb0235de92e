//! Observable events for widecol
//!
//! Events are explicit and typed; each carries its default severity.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Conditional mutation
    /// Predicates held, batch applied
    CasApplied,
    /// A predicate failed, nothing applied
    CasRejected,
    /// Backend or argument failure during check-and-mutate
    CasFailed,

    // Scans
    /// A bounded page was scanned
    ScanPage,
    /// An empty page ended the traversal
    ScanDone,
    /// A page was aborted
    ScanPageFailed,

    // Batches
    /// Batch returned
    BatchComplete,
    /// One position of a batch failed
    BatchOperationFailed,

    // Setup
    /// Client configuration loaded
    ConfigLoaded,
    /// Table created on the in-memory backend
    TableCreated,
    /// Table dropped from the in-memory backend
    TableDropped,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::CasApplied => "CAS_APPLIED",
            Event::CasRejected => "CAS_REJECTED",
            Event::CasFailed => "CAS_FAILED",
            Event::ScanPage => "SCAN_PAGE",
            Event::ScanDone => "SCAN_DONE",
            Event::ScanPageFailed => "SCAN_PAGE_FAILED",
            Event::BatchComplete => "BATCH_COMPLETE",
            Event::BatchOperationFailed => "BATCH_OPERATION_FAILED",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::TableCreated => "TABLE_CREATED",
            Event::TableDropped => "TABLE_DROPPED",
        }
    }

    /// Default severity for this event
    pub fn severity(&self) -> Severity {
        match self {
            Event::ScanPage | Event::BatchComplete => Severity::Trace,
            Event::CasApplied
            | Event::CasRejected
            | Event::ScanDone
            | Event::ConfigLoaded
            | Event::TableCreated
            | Event::TableDropped => Severity::Info,
            Event::BatchOperationFailed => Severity::Warn,
            Event::CasFailed | Event::ScanPageFailed => Severity::Error,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::CasApplied,
            Event::CasRejected,
            Event::CasFailed,
            Event::ScanPage,
            Event::ScanDone,
            Event::ScanPageFailed,
            Event::BatchComplete,
            Event::BatchOperationFailed,
            Event::ConfigLoaded,
            Event::TableCreated,
            Event::TableDropped,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_failures_are_loud() {
        assert_eq!(Event::CasFailed.severity(), Severity::Error);
        assert_eq!(Event::ScanPageFailed.severity(), Severity::Error);
        assert!(Event::ScanPage.severity() < Event::ScanDone.severity());
    }
}
