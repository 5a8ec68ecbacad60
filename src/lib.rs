pub mod error;
pub mod fs;
pub mod project;
pub mod tracker;

pub use error::{Result, TrackerError};
pub use fs::{Clock, MetaFs, OsFs, SystemClock};
pub use project::{ChangeKind, ChangeNode, ChangeNotification, ItemKind, ItemPath};
pub use tracker::{
    classify, is_in_scope, is_sidecar_file, is_under_assets_root, sidecar_path, ChangeAction,
    ChangeWalker, MetaTracker, PendingAdd, SidecarReconciler, SidecarRecord, TrackerSubscription,
    ASSETS_ROOT, SIDECAR_EXTENSION, SIDECAR_FORMAT_VERSION,
};
