//! Sidecar tracking core: classification, reconciliation and traversal.
//!
//! One [`MetaTracker`] instance serves one monitored project root; its
//! pending-add memory is instance state, so independent roots get
//! independent trackers. Processing is synchronous and run-to-completion
//! per notification; hosts with concurrent delivery must serialize ahead of
//! the tracker, e.g. through [`TrackerSubscription`]'s single-consumer queue.

pub mod classify;
pub mod scope;
pub mod sidecar;
pub mod walker;

use std::sync::mpsc::Receiver;
use std::thread::JoinHandle;

use tracing::debug;

use crate::error::{Result, TrackerError};
use crate::fs::{Clock, MetaFs, OsFs, SystemClock};
use crate::project::ChangeNotification;

pub use classify::{classify, ChangeAction, PendingAdd};
pub use scope::{
    is_in_scope, is_sidecar_file, is_under_assets_root, ASSETS_ROOT, SIDECAR_EXTENSION,
};
pub use sidecar::{sidecar_path, SidecarReconciler, SidecarRecord, SIDECAR_FORMAT_VERSION};
pub use walker::ChangeWalker;

/// Keeps `.meta` sidecar files synchronized with one project's asset tree.
#[derive(Debug)]
pub struct MetaTracker<F = OsFs, C = SystemClock> {
    reconciler: SidecarReconciler<F, C>,
    pending: PendingAdd,
}

impl MetaTracker {
    /// Tracker operating on the real file system and clock.
    pub fn with_os_fs() -> Self {
        Self::new(OsFs, SystemClock)
    }
}

impl<F: MetaFs, C: Clock> MetaTracker<F, C> {
    pub fn new(fs: F, clock: C) -> Self {
        Self {
            reconciler: SidecarReconciler::new(fs, clock),
            pending: PendingAdd::Idle,
        }
    }

    /// Processes one change notification, walking every root node of its
    /// delta tree. Open and close notifications are skipped entirely.
    pub fn handle_notification(&mut self, notification: &ChangeNotification) {
        if notification.initial_open || notification.final_close {
            debug!(
                initial_open = notification.initial_open,
                final_close = notification.final_close,
                "Skipping open/close notification"
            );
            return;
        }

        let mut walker = ChangeWalker::new(&self.reconciler, &mut self.pending);
        for node in &notification.changes {
            walker.walk(node);
        }
    }

    pub fn reconciler(&self) -> &SidecarReconciler<F, C> {
        &self.reconciler
    }

    pub fn pending(&self) -> &PendingAdd {
        &self.pending
    }
}

/// Subscribes a tracker to a host-provided notification stream.
///
/// Notifications are drained on a single worker thread, giving the
/// synchronous core the external serialization it requires. The worker exits
/// when every sender is dropped.
pub struct TrackerSubscription {
    handle: Option<JoinHandle<()>>,
}

impl TrackerSubscription {
    pub fn spawn<F, C>(
        mut tracker: MetaTracker<F, C>,
        receiver: Receiver<ChangeNotification>,
    ) -> Self
    where
        F: MetaFs + Send + 'static,
        C: Clock + Send + 'static,
    {
        let handle = std::thread::spawn(move || {
            debug!("Tracker subscription started");
            while let Ok(notification) = receiver.recv() {
                tracker.handle_notification(&notification);
            }
            debug!("Tracker subscription stopped");
        });

        Self {
            handle: Some(handle),
        }
    }

    /// Waits for the worker to drain and exit. Senders must be dropped first
    /// or this blocks indefinitely.
    pub fn stop(mut self) -> Result<()> {
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| TrackerError::Subscription("Worker thread panicked".to_string()))?;
        }
        Ok(())
    }
}
