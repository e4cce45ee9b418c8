//! Bounded Diagnostic Log
//!
//! Keeps the most recent log entries in a fixed-capacity ring so memory use
//! stays flat no matter how long the player runs. Entries are appended by any
//! number of producer threads; the oldest entry is evicted once the ring is
//! full.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Default number of entries retained by the status log
pub const DEFAULT_LOG_CAPACITY: usize = 10;

/// Category assigned to raw messages that do not carry one
pub const UNKNOWN_CATEGORY: &str = "Unknown";

// ----------------------------------------------------------------------------
// Severity
// ----------------------------------------------------------------------------

/// Severity of a status log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Audit,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Audit => write!(f, "audit"),
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

// ----------------------------------------------------------------------------
// Log Entry
// ----------------------------------------------------------------------------

/// A single diagnostic event. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    timestamp: DateTime<Local>,
    category: String,
    message: String,
    severity: Severity,
}

impl LogEntry {
    pub fn new(category: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            timestamp: Local::now(),
            category: category.into(),
            message: message.into(),
            severity,
        }
    }

    /// Parse raw text of the form `[category] message`.
    ///
    /// Returns `None` when the text has no bracketed category or the category
    /// is blank.
    pub fn parse(raw: &str, severity: Severity) -> Option<Self> {
        let rest = raw.trim_start().strip_prefix('[')?;
        let close = rest.find(']')?;
        let category = rest[..close].trim();
        if category.is_empty() {
            return None;
        }
        let message = rest[close + 1..].trim_start();
        Some(Self::new(category, message, severity))
    }

    /// Parse raw text, falling back to the `Unknown` category with the original
    /// text as the message. Never fails.
    pub fn from_raw(raw: &str, severity: Severity) -> Self {
        Self::parse(raw, severity).unwrap_or_else(|| Self::new(UNKNOWN_CATEGORY, raw, severity))
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.category, self.message)
    }
}

// ----------------------------------------------------------------------------
// Bounded Log Buffer
// ----------------------------------------------------------------------------

/// Fixed-capacity FIFO of log entries, safe to share between threads.
///
/// Callers take no locks; the buffer serializes access internally. A poisoned
/// lock is recovered because every mutation leaves the ring structurally valid.
#[derive(Debug)]
pub struct BoundedLogBuffer {
    capacity: usize,
    entries: Mutex<VecDeque<LogEntry>>,
}

impl BoundedLogBuffer {
    /// Create a buffer holding at most `capacity` entries. A capacity of zero
    /// is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Append an entry, evicting the oldest one when the buffer is full
    pub fn put(&self, entry: LogEntry) {
        let mut entries = self.lock();
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Append raw text, substituting an `Unknown` entry when it cannot be parsed
    pub fn put_raw(&self, raw: &str, severity: Severity) {
        self.put(LogEntry::from_raw(raw, severity));
    }

    /// Copy of the retained entries, oldest first
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<LogEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for BoundedLogBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}
