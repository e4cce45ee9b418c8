//! Shared Status State
//!
//! The single mutable record every producer reports into. Fields are grouped
//! into independently locked cells so the scheduler, the file downloader and
//! the subscriber never contend with each other; a setter touches exactly one
//! cell and is last-write-wins.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{PoisonError, RwLock};

use crate::config::StatusConfig;
use crate::log_buffer::{BoundedLogBuffer, Severity, DEFAULT_LOG_CAPACITY};

// ----------------------------------------------------------------------------
// Field Types
// ----------------------------------------------------------------------------

/// Liveness descriptor reported as `state` and `applicationState`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationState {
    #[default]
    Running,
    Background,
    Suspended,
    Stopped,
}

impl fmt::Display for ApplicationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplicationState::Running => write!(f, "Running"),
            ApplicationState::Background => write!(f, "Background"),
            ApplicationState::Suspended => write!(f, "Suspended"),
            ApplicationState::Stopped => write!(f, "Stopped"),
        }
    }
}

/// Last reported position of the display
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
    /// Horizontal accuracy in meters, when the source reports one
    pub accuracy: Option<f64>,
}

impl GeoLocation {
    /// Build a location, returning `None` for coordinates that cannot be real
    pub fn new(latitude: f64, longitude: f64, accuracy: Option<f64>) -> Option<Self> {
        let latitude_ok = latitude.is_finite() && latitude.abs() <= 90.0;
        let longitude_ok = longitude.is_finite() && longitude.abs() <= 180.0;
        if !latitude_ok || !longitude_ok {
            return None;
        }
        let accuracy = accuracy.filter(|meters| meters.is_finite() && *meters >= 0.0);
        Some(Self {
            latitude,
            longitude,
            accuracy,
        })
    }
}

/// Current player viewport in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Default)]
struct ScheduleCell {
    status: String,
    manager_status: String,
}

#[derive(Debug, Default)]
struct RequiredFilesCell {
    status: String,
    list: String,
}

#[derive(Debug, Default)]
struct PlaybackCell {
    layout_id: String,
    currently_playing: String,
}

// ----------------------------------------------------------------------------
// Status State
// ----------------------------------------------------------------------------

/// Process-wide status record.
///
/// Construct one at startup, wrap it in an `Arc` and hand clones to every
/// producer and to the reporter.
#[derive(Debug)]
pub struct StatusState {
    schedule: RwLock<ScheduleCell>,
    required_files: RwLock<RequiredFilesCell>,
    playback: RwLock<PlaybackCell>,
    xmr_subscriber_status: RwLock<String>,
    control_count: AtomicI64,
    viewport: RwLock<ViewportSize>,
    geo_location: RwLock<Option<GeoLocation>>,
    application_state: RwLock<ApplicationState>,
    xmds_last_activity: RwLock<Option<DateTime<Local>>>,
    logs: BoundedLogBuffer,
}

fn read<T: Clone>(cell: &RwLock<T>) -> T {
    read_with(cell, T::clone)
}

fn read_with<T, R>(cell: &RwLock<T>, project: impl FnOnce(&T) -> R) -> R {
    let guard = cell.read().unwrap_or_else(PoisonError::into_inner);
    project(&guard)
}

fn write<T>(cell: &RwLock<T>, update: impl FnOnce(&mut T)) {
    let mut guard = cell.write().unwrap_or_else(PoisonError::into_inner);
    update(&mut guard);
}

/// Single-line fields drop control characters so they render cleanly
fn single_line(value: impl Into<String>) -> String {
    let value = value.into();
    if value.chars().any(char::is_control) {
        value.chars().filter(|c| !c.is_control()).collect()
    } else {
        value
    }
}

impl StatusState {
    pub fn new(log_capacity: usize) -> Self {
        Self {
            schedule: RwLock::default(),
            required_files: RwLock::default(),
            playback: RwLock::default(),
            xmr_subscriber_status: RwLock::default(),
            control_count: AtomicI64::new(0),
            viewport: RwLock::default(),
            geo_location: RwLock::new(None),
            application_state: RwLock::default(),
            xmds_last_activity: RwLock::new(None),
            logs: BoundedLogBuffer::new(log_capacity),
        }
    }

    /// Build the state from configuration: log capacity and the persisted
    /// last-sync time
    pub fn from_config(config: &StatusConfig) -> Self {
        let state = Self::new(config.log_capacity);
        if let Some(at) = config.xmds_last_activity {
            state.record_xmds_activity(at);
        }
        state
    }

    // Schedule ---------------------------------------------------------------

    pub fn set_schedule_status(&self, status: impl Into<String>) {
        let status = single_line(status);
        write(&self.schedule, |cell| cell.status = status);
    }

    pub fn schedule_status(&self) -> String {
        read_with(&self.schedule, |cell| cell.status.clone())
    }

    pub fn set_schedule_manager_status(&self, status: impl Into<String>) {
        let status = single_line(status);
        write(&self.schedule, |cell| cell.manager_status = status);
    }

    pub fn schedule_manager_status(&self) -> String {
        read_with(&self.schedule, |cell| cell.manager_status.clone())
    }

    // Required files ---------------------------------------------------------

    pub fn set_required_files_status(&self, status: impl Into<String>) {
        let status = single_line(status);
        write(&self.required_files, |cell| cell.status = status);
    }

    pub fn required_files_status(&self) -> String {
        read_with(&self.required_files, |cell| cell.status.clone())
    }

    /// Replace the human-readable required files listing. May span lines.
    pub fn update_required_files(&self, list: impl Into<String>) {
        let list = list.into();
        write(&self.required_files, |cell| cell.list = list);
    }

    pub fn required_files_list(&self) -> String {
        read_with(&self.required_files, |cell| cell.list.clone())
    }

    // Playback ---------------------------------------------------------------

    pub fn set_current_layout_id(&self, layout_id: impl Into<String>) {
        let layout_id = single_line(layout_id);
        write(&self.playback, |cell| cell.layout_id = layout_id);
    }

    pub fn current_layout_id(&self) -> String {
        read_with(&self.playback, |cell| cell.layout_id.clone())
    }

    pub fn set_currently_playing(&self, description: impl Into<String>) {
        let description = single_line(description);
        write(&self.playback, |cell| cell.currently_playing = description);
    }

    pub fn currently_playing(&self) -> String {
        read_with(&self.playback, |cell| cell.currently_playing.clone())
    }

    // Subscriber -------------------------------------------------------------

    pub fn set_xmr_subscriber_status(&self, status: impl Into<String>) {
        let status = single_line(status);
        write(&self.xmr_subscriber_status, |cell| *cell = status);
    }

    pub fn xmr_subscriber_status(&self) -> String {
        read(&self.xmr_subscriber_status)
    }

    // Control count ----------------------------------------------------------

    pub fn set_control_count(&self, count: i64) {
        self.control_count.store(count, Ordering::Release);
    }

    /// Bump the control count, returning the new value. Wraps at `i64::MAX`
    /// like the underlying atomic.
    pub fn increment_control_count(&self) -> i64 {
        self.control_count.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
    }

    pub fn control_count(&self) -> i64 {
        self.control_count.load(Ordering::Acquire)
    }

    // Viewport ---------------------------------------------------------------

    pub fn set_viewport_size(&self, width: u32, height: u32) {
        write(&self.viewport, |cell| *cell = ViewportSize { width, height });
    }

    pub fn viewport_size(&self) -> ViewportSize {
        read(&self.viewport)
    }

    // Geolocation ------------------------------------------------------------

    /// Record the display position. Impossible coordinates clear the location.
    pub fn set_geo_location(&self, latitude: f64, longitude: f64, accuracy: Option<f64>) {
        let location = GeoLocation::new(latitude, longitude, accuracy);
        write(&self.geo_location, |cell| *cell = location);
    }

    pub fn clear_geo_location(&self) {
        write(&self.geo_location, |cell| *cell = None);
    }

    pub fn geo_location(&self) -> Option<GeoLocation> {
        read(&self.geo_location)
    }

    // Application state ------------------------------------------------------

    pub fn set_application_state(&self, state: ApplicationState) {
        write(&self.application_state, |cell| *cell = state);
    }

    pub fn application_state(&self) -> ApplicationState {
        read(&self.application_state)
    }

    // Remote sync ------------------------------------------------------------

    /// Record a successful exchange with the display-management service
    pub fn record_xmds_activity(&self, at: DateTime<Local>) {
        write(&self.xmds_last_activity, |cell| *cell = Some(at));
    }

    pub fn xmds_last_activity(&self) -> Option<DateTime<Local>> {
        read(&self.xmds_last_activity)
    }

    // Log --------------------------------------------------------------------

    /// Append a raw log message. Text without a `[category]` prefix is kept
    /// under the `Unknown` category.
    pub fn append_log(&self, message: &str, severity: Severity) {
        self.logs.put_raw(message, severity);
    }

    pub fn logs(&self) -> &BoundedLogBuffer {
        &self.logs
    }
}

impl Default for StatusState {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}
