//! Player Status Aggregation
//!
//! This crate collects the operational status of a long-running player from
//! many independent producers, keeps a bounded log of recent diagnostic events,
//! and periodically renders that status into a local status file and a remote
//! status notification. Producers never block on, or fail because of, status
//! reporting.

// ----------------------------------------------------------------------------
// Module Declarations
// ----------------------------------------------------------------------------

pub mod config;
pub mod errors;
pub mod log_buffer;
pub mod logger;
pub mod notifier;
pub mod reporter;
pub mod snapshot;
pub mod state;
pub mod writer;

// ----------------------------------------------------------------------------
// Public API
// ----------------------------------------------------------------------------

pub use config::StatusConfig;
pub use errors::{Result, StatusError};
pub use log_buffer::{BoundedLogBuffer, LogEntry, Severity, DEFAULT_LOG_CAPACITY};
pub use logger::{NoOpLogger, RecordingLogger, StatusLogSink, StatusLogger, TracingLogger};
pub use notifier::{NoOpTransport, NotifyAck, StatusNotifier, StatusTransport};
pub use reporter::{CycleOutcome, StatusReporter};
pub use snapshot::StatusSnapshot;
pub use state::{ApplicationState, GeoLocation, StatusState, ViewportSize};
pub use writer::{status_file_path, StatusFileWriter};
