//! Sidecar file reconciliation and the on-disk `.meta` format.
//!
//! A sidecar carries the stable identity of its asset, so the reconciler
//! never deletes-and-recreates where a rename will do. All operations are
//! idempotent and swallow I/O failures after logging them: one failed
//! sidecar must never stall the notification stream.
//!
//! Format (three lines, CRLF):
//! ```text
//! fileFormatVersion: 2
//! guid: 3f2a9b0c4d5e6f708192a3b4c5d6e7f8
//! timeCreated: 1735689600
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{debug, error};
use uuid::Uuid;

use crate::error::{Result, TrackerError};
use crate::fs::{Clock, MetaFs};
use crate::tracker::scope::SIDECAR_EXTENSION;

/// Version marker written to the first line of every sidecar.
pub const SIDECAR_FORMAT_VERSION: u32 = 2;

/// Derives the sidecar path for an asset: the full file name plus `.meta`.
pub fn sidecar_path(asset: &Path) -> PathBuf {
    let mut path = OsString::from(asset.as_os_str());
    path.push(".");
    path.push(SIDECAR_EXTENSION);
    PathBuf::from(path)
}

/// Contents of one sidecar file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidecarRecord {
    /// 32 lowercase hex digits, no separators.
    pub guid: String,
    /// Unix seconds at creation.
    pub time_created: u64,
}

impl SidecarRecord {
    /// Mints a record with a fresh random identity.
    pub fn mint(time_created: u64) -> Self {
        Self {
            guid: Uuid::new_v4().simple().to_string(),
            time_created,
        }
    }

    pub fn render(&self) -> String {
        format!(
            "fileFormatVersion: {}\r\nguid: {}\r\ntimeCreated: {}\r\n",
            SIDECAR_FORMAT_VERSION, self.guid, self.time_created
        )
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let mut guid = None;
        let mut time_created = None;

        for line in contents.lines() {
            if let Some(value) = line.strip_prefix("guid: ") {
                guid = Some(value.trim().to_string());
            } else if let Some(value) = line.strip_prefix("timeCreated: ") {
                time_created = Some(value.trim().parse::<u64>().map_err(|e| {
                    TrackerError::Format(format!("Invalid timeCreated: {}", e))
                })?);
            }
        }

        match (guid, time_created) {
            (Some(guid), Some(time_created)) => Ok(Self { guid, time_created }),
            _ => Err(TrackerError::Format(
                "Missing guid or timeCreated line".to_string(),
            )),
        }
    }
}

/// Performs sidecar create/rename/delete against an injected file system.
#[derive(Debug)]
pub struct SidecarReconciler<F, C> {
    fs: F,
    clock: C,
}

impl<F: MetaFs, C: Clock> SidecarReconciler<F, C> {
    pub fn new(fs: F, clock: C) -> Self {
        Self { fs, clock }
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    /// Ensures a sidecar exists for the asset. A no-op when one is already
    /// there, so duplicate add notifications never regenerate the identity.
    pub fn create(&self, asset: &Path) {
        let sidecar = sidecar_path(asset);
        if self.fs.exists(&sidecar) {
            debug!(sidecar = %sidecar.display(), "Sidecar already present, keeping identity");
            return;
        }

        let record = SidecarRecord::mint(self.clock.unix_now());
        debug!(sidecar = %sidecar.display(), guid = %record.guid, "Creating sidecar");

        if let Err(e) = self.fs.write(&sidecar, &record.render()) {
            error!(op = "create", sidecar = %sidecar.display(), %e, "Sidecar operation failed");
        }
    }

    /// Moves the sidecar from the old asset path to the new one, preserving
    /// its identity. Falls back to creating a fresh sidecar when the old one
    /// is missing (an asset that was never tracked).
    pub fn rename(&self, old_asset: &Path, new_asset: &Path) {
        let old_sidecar = sidecar_path(old_asset);
        if !self.fs.exists(&old_sidecar) {
            debug!(
                old = %old_sidecar.display(),
                "No sidecar at prior path, creating fresh one"
            );
            self.create(new_asset);
            return;
        }

        let new_sidecar = sidecar_path(new_asset);
        debug!(
            old = %old_sidecar.display(),
            new = %new_sidecar.display(),
            "Renaming sidecar"
        );

        if let Err(e) = self.fs.rename(&old_sidecar, &new_sidecar) {
            error!(
                op = "rename",
                old = %old_sidecar.display(),
                new = %new_sidecar.display(),
                %e,
                "Sidecar operation failed"
            );
        }
    }

    /// Removes the sidecar for the asset; a no-op when none exists. With the
    /// `soft-delete` feature the sidecar is renamed to `<path>.deleted`
    /// instead, keeping it around for postmortems.
    pub fn delete(&self, asset: &Path) {
        let sidecar = sidecar_path(asset);
        if !self.fs.exists(&sidecar) {
            return;
        }

        debug!(sidecar = %sidecar.display(), "Deleting sidecar");
        if let Err(e) = self.remove_or_mark(&sidecar) {
            error!(op = "delete", sidecar = %sidecar.display(), %e, "Sidecar operation failed");
        }
    }

    #[cfg(feature = "soft-delete")]
    fn remove_or_mark(&self, sidecar: &Path) -> Result<()> {
        let mut marker = OsString::from(sidecar.as_os_str());
        marker.push(".deleted");
        self.fs.rename(sidecar, Path::new(&marker))
    }

    #[cfg(not(feature = "soft-delete"))]
    fn remove_or_mark(&self, sidecar: &Path) -> Result<()> {
        self.fs.remove(sidecar)
    }
}
