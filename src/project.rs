//! Data model for host-delivered project change notifications.
//!
//! The host's project model parses its own change events and hands the core
//! one [`ChangeNotification`] per batch: a tree of [`ChangeNode`]s describing
//! which items were added, removed, renamed or externally modified. The core
//! only reads this model; it never mutates project items.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// What happened to an item in one change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Removed,
    /// Moved out of its old location, possibly within the same parent.
    Renamed,
    /// Contents changed on disk outside the project model.
    ContentChanged,
    #[default]
    None,
}

/// Kind of project item a change refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    File,
    Folder,
    /// Top-level container owning the item tree.
    Project,
}

/// An item's name, on-disk location and folder ancestry within its project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPath {
    /// Item name, including any extension.
    pub name: String,
    /// Full path of the item, ending in `name`.
    pub location: PathBuf,
    /// Folder names from the immediate parent upward, stopping at (and
    /// excluding) the top-level project container.
    #[serde(default)]
    pub ancestry: Vec<String>,
}

impl ItemPath {
    pub fn new(name: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            ancestry: Vec::new(),
        }
    }

    pub fn with_ancestry(mut self, ancestry: Vec<String>) -> Self {
        self.ancestry = ancestry;
        self
    }

    /// Builds an item path from a location under a project root, deriving the
    /// name and ancestry from the path components between root and item.
    pub fn under(project_root: &Path, location: impl Into<PathBuf>) -> Self {
        let location = location.into();
        let name = location
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let ancestry = location
            .parent()
            .and_then(|parent| parent.strip_prefix(project_root).ok())
            .map(|relative| {
                let mut names: Vec<String> = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                // Ancestry is ordered from the immediate parent upward.
                names.reverse();
                names
            })
            .unwrap_or_default();

        Self {
            name,
            location,
            ancestry,
        }
    }

    /// The boundary node of the parent chain: the topmost folder directly
    /// under the project container, or the item itself when it has no
    /// recorded ancestors.
    pub fn root_folder(&self) -> &str {
        self.ancestry.last().map(String::as_str).unwrap_or(&self.name)
    }
}

/// One node of a change-delta tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeNode {
    pub kind: ChangeKind,
    pub item_kind: ItemKind,
    /// The item at its current location.
    pub item: ItemPath,
    /// Prior location for renames and removes.
    #[serde(default)]
    pub old_item: Option<ItemPath>,
    /// Whether the containing project is asset-managed.
    #[serde(default)]
    pub asset_project: bool,
    #[serde(default)]
    pub children: Vec<ChangeNode>,
}

impl ChangeNode {
    pub fn new(kind: ChangeKind, item_kind: ItemKind, item: ItemPath) -> Self {
        Self {
            kind,
            item_kind,
            item,
            old_item: None,
            asset_project: true,
            children: Vec::new(),
        }
    }

    pub fn with_old_item(mut self, old_item: ItemPath) -> Self {
        self.old_item = Some(old_item);
        self
    }

    pub fn with_asset_project(mut self, asset_project: bool) -> Self {
        self.asset_project = asset_project;
        self
    }

    pub fn with_children(mut self, children: Vec<ChangeNode>) -> Self {
        self.children = children;
        self
    }

    /// The item path scope checks apply to: the prior path when the event
    /// carries one (renames, removes), otherwise the current path.
    pub fn scope_item(&self) -> &ItemPath {
        self.old_item.as_ref().unwrap_or(&self.item)
    }
}

/// One change-notification batch from the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeNotification {
    pub changes: Vec<ChangeNode>,
    /// Set on the first notification after the project is opened.
    #[serde(default)]
    pub initial_open: bool,
    /// Set on the last notification before the project is closed.
    #[serde(default)]
    pub final_close: bool,
}

impl ChangeNotification {
    pub fn new(changes: Vec<ChangeNode>) -> Self {
        Self {
            changes,
            initial_open: false,
            final_close: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_path_under_derives_name_and_ancestry() {
        let item = ItemPath::under(Path::new("/project"), "/project/Assets/Scripts/Foo.cs");

        assert_eq!(item.name, "Foo.cs");
        assert_eq!(item.location, PathBuf::from("/project/Assets/Scripts/Foo.cs"));
        assert_eq!(item.ancestry, vec!["Scripts".to_string(), "Assets".to_string()]);
        assert_eq!(item.root_folder(), "Assets");
    }

    #[test]
    fn test_item_path_under_direct_child() {
        let item = ItemPath::under(Path::new("/project"), "/project/Assets");

        assert!(item.ancestry.is_empty());
        assert_eq!(item.root_folder(), "Assets");
    }

    #[test]
    fn test_scope_item_prefers_old_path() {
        let node = ChangeNode::new(
            ChangeKind::Removed,
            ItemKind::File,
            ItemPath::new("Foo.cs", "/project/Assets/B/Foo.cs"),
        )
        .with_old_item(ItemPath::new("Foo.cs", "/project/Assets/A/Foo.cs"));

        assert_eq!(
            node.scope_item().location,
            PathBuf::from("/project/Assets/A/Foo.cs")
        );
    }

    #[test]
    fn test_notification_roundtrip() {
        let notification = ChangeNotification::new(vec![ChangeNode::new(
            ChangeKind::Added,
            ItemKind::File,
            ItemPath::under(Path::new("/p"), "/p/Assets/Foo.cs"),
        )]);

        let json = serde_json::to_string(&notification).unwrap();
        let back: ChangeNotification = serde_json::from_str(&json).unwrap();

        assert_eq!(back.changes.len(), 1);
        assert_eq!(back.changes[0].kind, ChangeKind::Added);
        assert!(!back.initial_open);
        assert!(!back.final_close);
    }

    #[test]
    fn test_notification_flags_default_when_absent() {
        let json = r#"{"changes": []}"#;
        let notification: ChangeNotification = serde_json::from_str(json).unwrap();

        assert!(!notification.initial_open);
        assert!(!notification.final_close);
    }
}
