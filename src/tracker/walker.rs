//! Depth-first traversal of a change-delta tree.

use tracing::trace;

use crate::fs::{Clock, MetaFs};
use crate::project::{ChangeNode, ItemKind};
use crate::tracker::classify::{classify, ChangeAction, PendingAdd};
use crate::tracker::sidecar::{sidecar_path, SidecarReconciler};

/// Walks one delta tree, applying the classified sidecar action per node and
/// updating the pending-add memory for compound-move correlation.
pub struct ChangeWalker<'a, F, C> {
    reconciler: &'a SidecarReconciler<F, C>,
    pending: &'a mut PendingAdd,
}

impl<'a, F: MetaFs, C: Clock> ChangeWalker<'a, F, C> {
    pub fn new(reconciler: &'a SidecarReconciler<F, C>, pending: &'a mut PendingAdd) -> Self {
        Self {
            reconciler,
            pending,
        }
    }

    pub fn walk(&mut self, node: &ChangeNode) {
        let action = classify(node, self.pending);
        let recurse = self.apply(node, action);

        if recurse {
            for child in &node.children {
                self.walk(child);
            }
        } else {
            trace!(item = %node.item.name, "Not recursing into renamed folder");
        }
    }

    /// Applies one action; returns whether to visit the node's children.
    fn apply(&mut self, node: &ChangeNode, action: ChangeAction<'_>) -> bool {
        match action {
            ChangeAction::Rename { old, new } => {
                self.reconciler.rename(&old.location, &new.location);
                // A folder rename already covers its children: their own
                // events arrive with mapped-but-unchanged relative paths, so
                // recursing here would double-process them.
                node.item_kind == ItemKind::File
            }
            ChangeAction::Add { item } => {
                // Create first: idempotent, so safe even when this add turns
                // out to be the first half of a move.
                self.reconciler.create(&item.location);

                if self.reconciler.fs().exists(&item.location) {
                    self.pending.clear();
                } else {
                    // Not on disk yet: may be half of a move-to-folder.
                    self.pending.remember(item.clone());
                }
                true
            }
            ChangeAction::Remove { old } => {
                let old_sidecar = sidecar_path(&old.location);
                if self.reconciler.fs().exists(&old_sidecar) {
                    if self.pending.correlates_move(old) {
                        let destination = self
                            .pending
                            .item()
                            .map(|item| item.location.clone())
                            .unwrap_or_default();
                        self.reconciler.rename(&old.location, &destination);
                    } else {
                        self.reconciler.delete(&old.location);
                    }
                    self.pending.clear();
                }
                true
            }
            ChangeAction::Ignore | ChangeAction::Skip => true,
        }
    }
}
