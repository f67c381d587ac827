// src/lock.rs

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// Marker file signalling an install/uninstall in progress, shared with any
/// other protonup process on the machine.
pub const LOCK_PATH: &str = "/tmp/protonup";

/// Holds the marker file for the duration of one operation. Acquisition is
/// atomic (`create_new`), and dropping the guard removes the marker.
pub struct OperationLock {
    path: PathBuf,
}

impl OperationLock {
    pub fn acquire() -> Result<Self> {
        Self::acquire_at(Path::new(LOCK_PATH))
    }

    pub fn acquire_at(path: &Path) -> Result<Self> {
        let mut marker = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .with_context(|| {
                format!("another operation holds the lock at {}", path.display())
            })?;
        let _ = writeln!(marker, "{}", std::process::id());
        Ok(Self {
            path: path.to_path_buf(),
        })
    }
}

impl Drop for OperationLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            eprintln!("could not remove lock marker {}: {}", self.path.display(), e);
        }
    }
}

pub fn is_locked() -> bool {
    is_locked_at(Path::new(LOCK_PATH))
}

pub fn is_locked_at(path: &Path) -> bool {
    path.exists()
}

/// Polls the marker with doubling sleep backoff until it clears or `max_wait`
/// elapses. Returns whether the marker is gone.
pub fn wait_until_idle(max_wait: Duration) -> bool {
    wait_until_idle_at(Path::new(LOCK_PATH), max_wait)
}

pub fn wait_until_idle_at(path: &Path, max_wait: Duration) -> bool {
    let mut delay = Duration::from_millis(100);
    let mut waited = Duration::ZERO;
    while is_locked_at(path) {
        if waited >= max_wait {
            return false;
        }
        thread::sleep(delay);
        waited += delay;
        delay = (delay * 2).min(Duration::from_secs(2));
    }
    true
}
