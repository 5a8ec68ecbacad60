//! File-system and clock seams for the sidecar reconciler.
//!
//! The reconciler performs all of its effects through [`MetaFs`] so tests can
//! substitute an in-memory file system and a fixed [`Clock`].

use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::Result;

/// The handful of file operations the reconciler needs.
pub trait MetaFs {
    fn exists(&self, path: &Path) -> bool;

    fn write(&self, path: &Path, contents: &str) -> Result<()>;

    /// Moves `from` to `to`, replacing any file already at `to`.
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    fn remove(&self, path: &Path) -> Result<()>;
}

/// Source of creation timestamps.
pub trait Clock {
    /// Seconds since 1970-01-01T00:00:00Z.
    fn unix_now(&self) -> u64;
}

/// [`MetaFs`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFs;

impl MetaFs for OsFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        fs::write(path, contents)?;
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        // A single rename call replaces any existing destination file on
        // both Unix and Windows, and keeps the move atomic.
        fs::rename(from, to)?;
        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<()> {
        fs::remove_file(path)?;
        Ok(())
    }
}

/// [`Clock`] reading the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}
