//! Change classification and the pending-add correlation state machine.
//!
//! A move-to-folder arrives as two independent notifications: an add at the
//! new location (before the file materializes on disk) followed by a remove
//! at the old one. [`PendingAdd`] remembers the first half so the remove can
//! be turned into a sidecar rename instead of a delete.

use std::path::Path;

use tracing::trace;

use crate::project::{ChangeKind, ChangeNode, ItemKind, ItemPath};
use crate::tracker::scope::is_in_scope;

/// Single-slot memory of the most recently added item whose backing file is
/// not yet on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PendingAdd {
    #[default]
    Idle,
    Pending(ItemPath),
}

impl PendingAdd {
    pub fn remember(&mut self, item: ItemPath) {
        trace!(name = %item.name, location = %item.location.display(), "Remembering pending add");
        *self = PendingAdd::Pending(item);
    }

    pub fn clear(&mut self) {
        if matches!(self, PendingAdd::Pending(_)) {
            trace!("Clearing pending add");
        }
        *self = PendingAdd::Idle;
    }

    pub fn item(&self) -> Option<&ItemPath> {
        match self {
            PendingAdd::Idle => None,
            PendingAdd::Pending(item) => Some(item),
        }
    }

    /// Whether the pending item sits at exactly this location.
    pub fn matches_location(&self, location: &Path) -> bool {
        self.item().is_some_and(|item| item.location == location)
    }

    /// Whether a removed item correlates with the pending add as the two
    /// halves of a move-to-folder: same name, different location.
    pub fn correlates_move(&self, removed: &ItemPath) -> bool {
        self.item()
            .is_some_and(|item| item.name == removed.name && item.location != removed.location)
    }
}

/// The sidecar action one change node calls for. Paths borrow from the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeAction<'a> {
    /// Move the sidecar from the old asset path to the new one.
    Rename { old: &'a ItemPath, new: &'a ItemPath },
    /// Ensure a sidecar exists for the asset.
    Add { item: &'a ItemPath },
    /// Drop (or relocate, when correlated) the sidecar at the old path.
    Remove { old: &'a ItemPath },
    /// Removal of a top-level container; never touch sidecars for these.
    Ignore,
    /// Nothing to do, but children are still visited.
    Skip,
}

/// Classifies one change node. Pure: reads the node and the pending-add
/// state, mutates nothing; exactly one outcome per node.
pub fn classify<'a>(node: &'a ChangeNode, pending: &PendingAdd) -> ChangeAction<'a> {
    // A project reload manifests as remove-of-project followed by a flood of
    // adds; reacting to the removal would regenerate every sidecar under it
    // and mint all-new identities.
    if node.item_kind == ItemKind::Project && node.kind == ChangeKind::Removed {
        trace!(item = %node.item.name, "Ignoring removal of top-level container");
        return ChangeAction::Ignore;
    }

    let in_scope = is_in_scope(node);

    let action = match node.kind {
        ChangeKind::Renamed if in_scope => match &node.old_item {
            Some(old) => ChangeAction::Rename {
                old,
                new: &node.item,
            },
            None => ChangeAction::Skip,
        },
        ChangeKind::Added if in_scope => ChangeAction::Add { item: &node.item },
        // A re-notification during project reload surfaces as an external
        // content change for the item we just saw added.
        ChangeKind::ContentChanged
            if in_scope && pending.matches_location(&node.item.location) =>
        {
            ChangeAction::Add { item: &node.item }
        }
        ChangeKind::Removed if in_scope => ChangeAction::Remove {
            old: node.scope_item(),
        },
        _ => ChangeAction::Skip,
    };

    trace!(
        item = %node.item.name,
        kind = ?node.kind,
        in_scope,
        ?action,
        "Classified change"
    );

    action
}
