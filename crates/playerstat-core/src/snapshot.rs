//! Status Snapshots and Rendering
//!
//! A snapshot copies every field group of the shared state, plus the retained
//! log entries, so rendering never holds a lock and never observes a half
//! applied update. Each group is read under its own lock: the snapshot is
//! consistent per group, not across groups.

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::config::StatusConfig;
use crate::errors::Result;
use crate::log_buffer::LogEntry;
use crate::state::{ApplicationState, GeoLocation, StatusState, ViewportSize};

/// Format used for every timestamp in the rendered documents
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn format_timestamp(at: Option<DateTime<Local>>) -> String {
    at.map(|at| at.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default()
}

// ----------------------------------------------------------------------------
// Snapshot
// ----------------------------------------------------------------------------

/// Point-in-time copy of the status state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub captured_at: DateTime<Local>,
    pub application_state: ApplicationState,
    pub schedule_status: String,
    pub schedule_manager_status: String,
    pub required_files_status: String,
    pub required_files_list: String,
    pub current_layout_id: String,
    pub currently_playing: String,
    pub xmr_subscriber_status: String,
    pub control_count: i64,
    pub viewport: ViewportSize,
    pub geo_location: Option<GeoLocation>,
    pub xmds_last_activity: Option<DateTime<Local>>,
    pub collect_interval_secs: u64,
    pub logs: Vec<LogEntry>,
}

impl StatusSnapshot {
    /// Copy the current state. Only the configured collect interval is taken
    /// from `config`; everything else comes from `state`.
    pub fn capture(state: &StatusState, config: &StatusConfig) -> Self {
        Self {
            captured_at: Local::now(),
            application_state: state.application_state(),
            schedule_status: state.schedule_status(),
            schedule_manager_status: state.schedule_manager_status(),
            required_files_status: state.required_files_status(),
            required_files_list: state.required_files_list(),
            current_layout_id: state.current_layout_id(),
            currently_playing: state.currently_playing(),
            xmr_subscriber_status: state.xmr_subscriber_status(),
            control_count: state.control_count(),
            viewport: state.viewport_size(),
            geo_location: state.geo_location(),
            xmds_last_activity: state.xmds_last_activity(),
            collect_interval_secs: config.collect_interval_secs,
            logs: state.logs().snapshot(),
        }
    }

    /// Render the local status file body (pretty printed)
    pub fn render_for_file(&self) -> Result<String> {
        let document = StatusFileDocument {
            last_activity: format_timestamp(Some(self.captured_at)),
            state: self.application_state.to_string(),
            xmds_last_activity: format_timestamp(self.xmds_last_activity),
            xmds_collect_interval: self.collect_interval_secs.to_string(),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Render the notification payload.
    ///
    /// The status object is serialized to a string and carried as the
    /// `statusDialog` string field; the service expects a string, not a nested
    /// object.
    pub fn render_for_notification(&self) -> Result<String> {
        let status = NotificationStatus {
            last_activity: format_timestamp(Some(self.captured_at)),
            application_state: self.application_state.to_string(),
            xmds_last_activity: format_timestamp(self.xmds_last_activity),
            schedule_status: &self.schedule_manager_status,
            required_files_status: &self.required_files_status,
            xmr_status: &self.xmr_subscriber_status,
        };
        let envelope = NotificationEnvelope {
            status_dialog: serde_json::to_string(&status)?,
        };
        Ok(serde_json::to_string(&envelope)?)
    }
}

// ----------------------------------------------------------------------------
// Wire Documents
// ----------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusFileDocument {
    last_activity: String,
    state: String,
    xmds_last_activity: String,
    xmds_collect_interval: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NotificationStatus<'a> {
    last_activity: String,
    application_state: String,
    xmds_last_activity: String,
    schedule_status: &'a str,
    required_files_status: &'a str,
    xmr_status: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NotificationEnvelope {
    status_dialog: String,
}
