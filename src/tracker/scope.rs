//! Predicates deciding which change events warrant sidecar reconciliation.

use std::path::Path;

use crate::project::{ChangeNode, ItemKind, ItemPath};

/// Name of the folder under which sidecar tracking applies.
pub const ASSETS_ROOT: &str = "Assets";

/// Extension of sidecar files, without the leading dot.
pub const SIDECAR_EXTENSION: &str = "meta";

/// Whether the item lives under the designated assets root: the boundary of
/// its parent chain (the node whose parent is the project container) must be
/// named "Assets", case-insensitively.
pub fn is_under_assets_root(item: &ItemPath) -> bool {
    item.root_folder().eq_ignore_ascii_case(ASSETS_ROOT)
}

/// Whether the path is itself a sidecar file.
pub fn is_sidecar_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(SIDECAR_EXTENSION))
}

/// Whether a change node is in scope for sidecar reconciliation: the item is
/// not a top-level container, its project is asset-managed, its prior path is
/// under the assets root, and it is not itself a sidecar file.
pub fn is_in_scope(node: &ChangeNode) -> bool {
    let scope_item = node.scope_item();

    node.item_kind != ItemKind::Project
        && node.asset_project
        && is_under_assets_root(scope_item)
        && !is_sidecar_file(&scope_item.location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::ChangeKind;
    use std::path::PathBuf;

    fn asset_item(location: &str, ancestry: &[&str]) -> ItemPath {
        let location = PathBuf::from(location);
        let name = location.file_name().unwrap().to_string_lossy().into_owned();
        ItemPath::new(name, location)
            .with_ancestry(ancestry.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_under_assets_root() {
        assert!(is_under_assets_root(&asset_item(
            "/p/Assets/Scripts/Foo.cs",
            &["Scripts", "Assets"],
        )));
        assert!(is_under_assets_root(&asset_item("/p/Assets/Foo.cs", &["Assets"])));
    }

    #[test]
    fn test_under_assets_root_case_insensitive() {
        assert!(is_under_assets_root(&asset_item("/p/assets/Foo.cs", &["assets"])));
        assert!(is_under_assets_root(&asset_item("/p/ASSETS/Foo.cs", &["ASSETS"])));
    }

    #[test]
    fn test_outside_assets_root() {
        assert!(!is_under_assets_root(&asset_item(
            "/p/Library/cache.bin",
            &["Library"],
        )));
        assert!(!is_under_assets_root(&asset_item("/p/Foo.cs", &[])));
    }

    #[test]
    fn test_assets_folder_is_its_own_boundary() {
        // The Assets folder itself has no recorded ancestors.
        assert!(is_under_assets_root(&asset_item("/p/Assets", &[])));
    }

    #[test]
    fn test_sidecar_file_extension() {
        assert!(is_sidecar_file(Path::new("/p/Assets/Foo.cs.meta")));
        assert!(is_sidecar_file(Path::new("/p/Assets/Foo.cs.META")));
        assert!(!is_sidecar_file(Path::new("/p/Assets/Foo.cs")));
        assert!(!is_sidecar_file(Path::new("/p/Assets/meta")));
    }

    #[test]
    fn test_in_scope_plain_asset() {
        let node = ChangeNode::new(
            ChangeKind::Added,
            ItemKind::File,
            asset_item("/p/Assets/Foo.cs", &["Assets"]),
        );
        assert!(is_in_scope(&node));
    }

    #[test]
    fn test_project_never_in_scope() {
        let node = ChangeNode::new(
            ChangeKind::Removed,
            ItemKind::Project,
            asset_item("/p/Assets", &[]),
        );
        assert!(!is_in_scope(&node));
    }

    #[test]
    fn test_non_asset_project_out_of_scope() {
        let node = ChangeNode::new(
            ChangeKind::Added,
            ItemKind::File,
            asset_item("/p/Assets/Foo.cs", &["Assets"]),
        )
        .with_asset_project(false);
        assert!(!is_in_scope(&node));
    }

    #[test]
    fn test_sidecar_itself_out_of_scope() {
        let node = ChangeNode::new(
            ChangeKind::Added,
            ItemKind::File,
            asset_item("/p/Assets/Foo.cs.meta", &["Assets"]),
        );
        assert!(!is_in_scope(&node));
    }

    #[test]
    fn test_scope_uses_prior_path_for_removes() {
        // Removed from under Assets, even though the current path is elsewhere.
        let node = ChangeNode::new(
            ChangeKind::Removed,
            ItemKind::File,
            asset_item("/p/Library/Foo.cs", &["Library"]),
        )
        .with_old_item(asset_item("/p/Assets/Foo.cs", &["Assets"]));
        assert!(is_in_scope(&node));
    }
}
