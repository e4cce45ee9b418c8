//! Status Reporter
//!
//! The boundary between the fallible persistence/notification paths and the
//! rest of the player. Every failure is logged exactly once through the
//! configured sink and converted into a [`CycleOutcome`]; nothing escapes to the
//! caller and the shared state is only read.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::StatusConfig;
use crate::errors::StatusError;
use crate::log_buffer::Severity;
use crate::logger::{StatusLogger, TracingLogger};
use crate::notifier::{StatusNotifier, StatusTransport};
use crate::snapshot::StatusSnapshot;
use crate::state::StatusState;
use crate::writer::{status_file_path, StatusFileWriter};

const UPDATE_STATUS_FILE: &str = "StatusReporter - updateStatusFile";
const NOTIFY_STATUS: &str = "StatusReporter - notifyStatus";

// ----------------------------------------------------------------------------
// Cycle Outcome
// ----------------------------------------------------------------------------

/// Result of one persist or notify attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The document was written or the notification accepted
    Completed,
    /// Another writer held the status file; try again next cycle
    Skipped,
    /// The attempt failed and was logged
    Failed,
}

// ----------------------------------------------------------------------------
// Status Reporter
// ----------------------------------------------------------------------------

pub struct StatusReporter {
    state: Arc<StatusState>,
    config: StatusConfig,
    status_path: PathBuf,
    writer: StatusFileWriter,
    notifier: StatusNotifier,
    logger: Arc<dyn StatusLogger>,
}

impl StatusReporter {
    /// Reporter writing to `<library_path>/status.json` and logging to tracing
    pub fn new(state: Arc<StatusState>, config: StatusConfig) -> Self {
        Self {
            status_path: status_file_path(&config.library_path),
            notifier: StatusNotifier::from_config(&config),
            writer: StatusFileWriter::new(),
            logger: Arc::new(TracingLogger),
            state,
            config,
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn StatusLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_status_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.status_path = path.into();
        self
    }

    pub fn state(&self) -> &Arc<StatusState> {
        &self.state
    }

    pub fn config(&self) -> &StatusConfig {
        &self.config
    }

    pub fn status_path(&self) -> &Path {
        &self.status_path
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot::capture(&self.state, &self.config)
    }

    /// Rewrite the status file from a fresh snapshot. Blocks on file I/O.
    pub fn update_status_file(&self) -> CycleOutcome {
        let result = self
            .snapshot()
            .render_for_file()
            .and_then(|body| self.writer.persist(&body, &self.status_path));

        match result {
            Ok(()) => CycleOutcome::Completed,
            Err(err) if err.is_contention() => {
                self.logger.log(
                    UPDATE_STATUS_FILE,
                    &format!("Status file busy, skipping this cycle. e = {}", err),
                    Severity::Warning,
                );
                CycleOutcome::Skipped
            }
            Err(err) => {
                self.report_failure(UPDATE_STATUS_FILE, "Failed to update status file", &err);
                CycleOutcome::Failed
            }
        }
    }

    /// Notify the current status through `transport`. One attempt, no retry.
    pub async fn notify_status(&self, transport: &dyn StatusTransport) -> CycleOutcome {
        let payload = match self.snapshot().render_for_notification() {
            Ok(payload) => payload,
            Err(err) => {
                self.report_failure(NOTIFY_STATUS, "Failed to build status payload", &err);
                return CycleOutcome::Failed;
            }
        };

        match self.notifier.notify(&payload, transport).await {
            Ok(()) => CycleOutcome::Completed,
            Err(err) => {
                self.report_failure(NOTIFY_STATUS, "Failed to notify status to XMDS", &err);
                CycleOutcome::Failed
            }
        }
    }

    fn report_failure(&self, category: &str, context: &str, err: &StatusError) {
        self.logger
            .log(category, &format!("{}. e = {}", context, err), Severity::Error);
    }
}
