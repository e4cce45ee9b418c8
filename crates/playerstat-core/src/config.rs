//! Status Reporting Configuration
//!
//! The settings the aggregator reads from its host: where the library lives,
//! the credentials presented to the display-management service, and the
//! intervals that drive the status cycle.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::{Result, StatusError};
use crate::log_buffer::DEFAULT_LOG_CAPACITY;

// ----------------------------------------------------------------------------
// Status Configuration
// ----------------------------------------------------------------------------

/// Configuration consumed by the snapshot, persist and notify components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    /// Library directory; the status file is written here
    pub library_path: PathBuf,
    /// Server key presented to the display-management service
    pub server_key: String,
    /// Hardware key identifying this display
    pub hardware_key: String,
    /// Display-management service endpoint
    pub xmds_url: String,
    /// Configured remote collection interval, reported in the status file
    pub collect_interval_secs: u64,
    /// How often the status file is rewritten and the status is notified
    pub status_interval_secs: u64,
    /// Number of log entries retained in memory
    pub log_capacity: usize,
    /// Last successful sync with the service, carried across restarts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xmds_last_activity: Option<DateTime<Local>>,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            library_path: PathBuf::from("library"),
            server_key: String::new(),
            hardware_key: String::new(),
            xmds_url: String::new(),
            collect_interval_secs: 300,
            status_interval_secs: 60,
            log_capacity: DEFAULT_LOG_CAPACITY,
            xmds_last_activity: None,
        }
    }
}

impl StatusConfig {
    pub fn status_interval(&self) -> Duration {
        Duration::from_secs(self.status_interval_secs)
    }

    /// Reject settings the status cycle cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.collect_interval_secs == 0 {
            return Err(StatusError::InvalidConfig(
                "collect interval must be greater than 0".to_string(),
            ));
        }
        if self.status_interval_secs == 0 {
            return Err(StatusError::InvalidConfig(
                "status interval must be greater than 0".to_string(),
            ));
        }
        if self.log_capacity == 0 {
            return Err(StatusError::InvalidConfig(
                "log capacity must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
