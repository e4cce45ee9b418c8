//! Status File Persistence
//!
//! Writes the rendered status document to disk. Two guards keep concurrent
//! cycles from interleaving: an in-process mutex, and an exclusive advisory
//! lock on the file itself for writers in other processes. Readers are never
//! blocked. Both guards release on drop, on every exit path.

use std::fs::{File, OpenOptions, TryLockError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{self, Mutex};

use tracing::debug;

use crate::errors::{Result, StatusError};

/// File name of the status document inside the library directory
pub const STATUS_FILE_NAME: &str = "status.json";

/// Location of the status document for a library directory
pub fn status_file_path(library_path: &Path) -> PathBuf {
    library_path.join(STATUS_FILE_NAME)
}

// ----------------------------------------------------------------------------
// Status File Writer
// ----------------------------------------------------------------------------

/// Persists status documents with exclusive-write discipline
#[derive(Debug, Default)]
pub struct StatusFileWriter {
    write_guard: Mutex<()>,
}

impl StatusFileWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents of `path` with `body`.
    ///
    /// Returns [`StatusError::LockContention`] without touching the file when
    /// another writer holds it; the caller should skip this cycle.
    pub fn persist(&self, body: &str, path: &Path) -> Result<()> {
        let _in_process = match self.write_guard.try_lock() {
            Ok(guard) => guard,
            Err(sync::TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(sync::TryLockError::WouldBlock) => {
                return Err(StatusError::LockContention {
                    path: path.to_path_buf(),
                })
            }
        };

        // Truncation waits until the lock is held so a contended open cannot
        // wipe another writer's document.
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        lock_exclusive(&file, path)?;

        file.set_len(0)?;
        file.write_all(body.as_bytes())?;
        file.write_all(b"\n")?;
        file.flush()?;
        file.sync_all()?;

        debug!(path = %path.display(), bytes = body.len(), "Status file written");
        Ok(())
    }
}

fn lock_exclusive(file: &File, path: &Path) -> Result<()> {
    match file.try_lock() {
        Ok(()) => Ok(()),
        Err(TryLockError::WouldBlock) => Err(StatusError::LockContention {
            path: path.to_path_buf(),
        }),
        Err(TryLockError::Error(err)) => Err(StatusError::Io(err)),
    }
}
