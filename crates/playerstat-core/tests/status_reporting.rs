//! Status reporting integration tests
//!
//! Drive the reporter end to end against a temporary library directory and an
//! in-memory transport.

use async_trait::async_trait;
use chrono::{Local, TimeZone};
use playerstat_core::{
    CycleOutcome, NotifyAck, RecordingLogger, Severity, StatusConfig, StatusError,
    StatusLogSink, StatusReporter, StatusState, StatusTransport,
};
use serde_json::Value;
use std::fs::{self, File};
use std::path::Path;
use std::sync::{Arc, Mutex};

// ----------------------------------------------------------------------------
// Test Utilities
// ----------------------------------------------------------------------------

#[derive(Default)]
struct MemoryTransport {
    payloads: Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl StatusTransport for MemoryTransport {
    async fn notify_status(
        &self,
        server_key: &str,
        hardware_key: &str,
        status: &str,
    ) -> playerstat_core::Result<NotifyAck> {
        self.payloads.lock().unwrap().push((
            server_key.to_string(),
            hardware_key.to_string(),
            status.to_string(),
        ));
        Ok(NotifyAck::accepted())
    }
}

struct UnreachableTransport;

#[async_trait]
impl StatusTransport for UnreachableTransport {
    async fn notify_status(
        &self,
        _server_key: &str,
        _hardware_key: &str,
        _status: &str,
    ) -> playerstat_core::Result<NotifyAck> {
        Err(StatusError::Transport("connection refused".to_string()))
    }
}

fn test_config(library: &Path) -> StatusConfig {
    StatusConfig {
        library_path: library.to_path_buf(),
        server_key: "server-key".to_string(),
        hardware_key: "hardware-key".to_string(),
        collect_interval_secs: 600,
        xmds_last_activity: Some(Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
        ..StatusConfig::default()
    }
}

fn reporter(library: &Path) -> (StatusReporter, Arc<StatusState>, RecordingLogger) {
    let config = test_config(library);
    let state = Arc::new(StatusState::from_config(&config));
    let logger = RecordingLogger::new();
    let reporter =
        StatusReporter::new(Arc::clone(&state), config).with_logger(Arc::new(logger.clone()));
    (reporter, state, logger)
}

// ----------------------------------------------------------------------------
// Status File
// ----------------------------------------------------------------------------

#[test]
fn test_status_file_ignores_status_fields() {
    let dir = tempfile::tempdir().unwrap();
    let (reporter, state, logger) = reporter(dir.path());
    state.set_schedule_status("OK");
    state.set_required_files_status("2 pending");

    assert_eq!(reporter.update_status_file(), CycleOutcome::Completed);

    let written = fs::read_to_string(dir.path().join("status.json")).unwrap();
    let document: Value = serde_json::from_str(&written).unwrap();
    let document = document.as_object().unwrap();

    assert_eq!(document.len(), 4);
    assert_eq!(document["state"], "Running");
    assert_eq!(document["xmdsLastActivity"], "2024-05-01 12:00:00");
    assert_eq!(document["xmdsCollectInterval"], "600");
    assert!(document["lastActivity"].as_str().is_some_and(|at| !at.is_empty()));
    assert!(!written.contains("OK"));
    assert!(!written.contains("2 pending"));
    assert!(logger.entries().is_empty());
}

#[test]
fn test_persist_failure_leaves_state_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let (reporter, state, logger) = reporter(dir.path());
    let reporter = reporter.with_status_path(dir.path().join("no-such-dir").join("status.json"));

    state.set_schedule_status("OK");
    state.set_current_layout_id("7");
    state.append_log("[Schedule] started", Severity::Info);
    let before = reporter.snapshot();

    assert_eq!(reporter.update_status_file(), CycleOutcome::Failed);

    let after = reporter.snapshot();
    assert_eq!(after.schedule_status, before.schedule_status);
    assert_eq!(after.current_layout_id, before.current_layout_id);
    assert_eq!(after.logs, before.logs);

    let entries = logger.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].severity(), Severity::Error);
    assert!(entries[0].message().contains("Failed to update status file"));
}

#[test]
fn test_persist_failure_with_state_sink_only_appends_log() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let state = Arc::new(StatusState::from_config(&config));
    let reporter = StatusReporter::new(Arc::clone(&state), config)
        .with_logger(Arc::new(StatusLogSink::new(Arc::clone(&state))))
        .with_status_path(dir.path().join("missing").join("status.json"));

    state.set_schedule_manager_status("idle");
    state.set_current_layout_id("7");
    state.append_log("[Schedule] started", Severity::Info);
    let before = reporter.snapshot();

    assert_eq!(reporter.update_status_file(), CycleOutcome::Failed);

    let after = reporter.snapshot();
    assert_eq!(after.schedule_manager_status, before.schedule_manager_status);
    assert_eq!(after.current_layout_id, before.current_layout_id);
    assert_eq!(after.application_state, before.application_state);

    let logs = state.logs().snapshot();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].category(), "Schedule");
    assert_eq!(logs[1].severity(), Severity::Error);
    assert!(logs[1].message().contains("Failed to update status file"));
}

#[test]
fn test_locked_status_file_skips_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let (reporter, _state, logger) = reporter(dir.path());
    let path = dir.path().join("status.json");
    fs::write(&path, "{}\n").unwrap();

    let holder = File::options().write(true).open(&path).unwrap();
    holder.lock().unwrap();

    assert_eq!(reporter.update_status_file(), CycleOutcome::Skipped);
    assert_eq!(fs::read_to_string(&path).unwrap(), "{}\n");
    assert_eq!(logger.count(Severity::Warning), 1);
    assert_eq!(logger.count(Severity::Error), 0);

    drop(holder);
    assert_eq!(reporter.update_status_file(), CycleOutcome::Completed);
}

// ----------------------------------------------------------------------------
// Notification
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_notification_payload_reaches_transport() {
    let dir = tempfile::tempdir().unwrap();
    let (reporter, state, logger) = reporter(dir.path());
    state.set_schedule_manager_status("Default layout only");
    state.set_required_files_status("Complete");
    state.set_xmr_subscriber_status("Connected, last heartbeat 10s ago");

    let transport = MemoryTransport::default();
    assert_eq!(reporter.notify_status(&transport).await, CycleOutcome::Completed);

    let payloads = transport.payloads.lock().unwrap();
    assert_eq!(payloads.len(), 1);
    let (server_key, hardware_key, payload) = &payloads[0];
    assert_eq!(server_key, "server-key");
    assert_eq!(hardware_key, "hardware-key");

    let outer: Value = serde_json::from_str(payload).unwrap();
    let inner: Value = serde_json::from_str(outer["statusDialog"].as_str().unwrap()).unwrap();
    let inner = inner.as_object().unwrap();
    for key in [
        "lastActivity",
        "applicationState",
        "xmdsLastActivity",
        "scheduleStatus",
        "requiredFilesStatus",
        "xmrStatus",
    ] {
        assert!(inner.contains_key(key), "missing {}", key);
    }
    assert_eq!(inner["scheduleStatus"], "Default layout only");
    assert_eq!(inner["xmrStatus"], "Connected, last heartbeat 10s ago");
    assert!(logger.entries().is_empty());
}

#[tokio::test]
async fn test_transport_failure_is_contained() {
    let dir = tempfile::tempdir().unwrap();
    let (reporter, state, logger) = reporter(dir.path());
    state.set_schedule_status("OK");

    assert_eq!(reporter.notify_status(&UnreachableTransport).await, CycleOutcome::Failed);
    assert_eq!(reporter.notify_status(&UnreachableTransport).await, CycleOutcome::Failed);

    assert_eq!(logger.count(Severity::Error), 2);
    assert!(logger.entries()[0].message().contains("connection refused"));
    assert_eq!(state.schedule_status(), "OK");
    assert!(state.logs().is_empty());
}
