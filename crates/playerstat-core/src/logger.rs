//! Logging Sinks
//!
//! Where the reporter sends its own failure reports. The default sink forwards
//! to `tracing`; hosts that want failures in the on-screen status log can use
//! [`StatusLogSink`], and tests use [`RecordingLogger`].

use std::sync::{Arc, Mutex, PoisonError};

use crate::log_buffer::{LogEntry, Severity};
use crate::state::StatusState;

// ----------------------------------------------------------------------------
// Logger Trait
// ----------------------------------------------------------------------------

/// Sink accepting categorized log messages
pub trait StatusLogger: Send + Sync {
    fn log(&self, category: &str, message: &str, severity: Severity);
}

/// Forwards to `tracing`, keeping the category as a structured field
#[derive(Debug, Clone, Default)]
pub struct TracingLogger;

impl StatusLogger for TracingLogger {
    fn log(&self, category: &str, message: &str, severity: Severity) {
        match severity {
            Severity::Error => tracing::error!(category, "{}", message),
            Severity::Warning => tracing::warn!(category, "{}", message),
            Severity::Info => tracing::info!(category, "{}", message),
            Severity::Audit => tracing::debug!(category, "{}", message),
        }
    }
}

/// Discards everything
#[derive(Debug, Clone, Default)]
pub struct NoOpLogger;

impl StatusLogger for NoOpLogger {
    fn log(&self, _category: &str, _message: &str, _severity: Severity) {}
}

/// Appends to the status log of a shared [`StatusState`] and to `tracing`
#[derive(Debug, Clone)]
pub struct StatusLogSink {
    state: Arc<StatusState>,
}

impl StatusLogSink {
    pub fn new(state: Arc<StatusState>) -> Self {
        Self { state }
    }
}

impl StatusLogger for StatusLogSink {
    fn log(&self, category: &str, message: &str, severity: Severity) {
        TracingLogger.log(category, message, severity);
        self.state.logs().put(LogEntry::new(category, message, severity));
    }
}

/// Keeps every entry in memory; cheap to clone and inspect
#[derive(Debug, Clone, Default)]
pub struct RecordingLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.entries()
            .iter()
            .filter(|entry| entry.severity() == severity)
            .count()
    }
}

impl StatusLogger for RecordingLogger {
    fn log(&self, category: &str, message: &str, severity: Severity) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(LogEntry::new(category, message, severity));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_logger_shares_entries() {
        let logger = RecordingLogger::new();
        let clone = logger.clone();
        clone.log("Test - one", "first", Severity::Error);
        clone.log("Test - two", "second", Severity::Warning);

        let entries = logger.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].category(), "Test - one");
        assert_eq!(logger.count(Severity::Error), 1);
        assert_eq!(logger.count(Severity::Info), 0);
    }

    #[test]
    fn test_status_log_sink_appends_to_state() {
        let state = Arc::new(StatusState::new(2));
        let sink = StatusLogSink::new(Arc::clone(&state));
        sink.log("Writer", "disk full", Severity::Error);

        let entries = state.logs().snapshot();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].category(), "Writer");
        assert_eq!(entries[0].severity(), Severity::Error);
    }

    #[test]
    fn test_noop_and_tracing_loggers_accept_everything() {
        NoOpLogger.log("Any", "thing", Severity::Audit);
        TracingLogger.log("Any", "thing", Severity::Error);
    }
}
