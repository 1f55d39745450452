//! Recursive read model of the backup directory.

use serde::Serialize;
use std::path::Path;

/// A node of the backup tree.
///
/// `children` is present for every directory (possibly empty) and absent for
/// files, so clients can tell the two apart without looking at `isDir`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileNode {
    pub name: String,
    pub is_dir: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileNode>>,
}

/// Build the tree rooted at `root`. Symlinks are followed.
///
/// Fails only if `root` itself cannot be read; unreadable descendants are
/// left out of the result.
pub fn build_tree(root: &Path) -> std::io::Result<FileNode> {
    let metadata = std::fs::metadata(root)?;
    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| root.display().to_string());

    if !metadata.is_dir() {
        return Ok(FileNode {
            name,
            is_dir: false,
            children: None,
        });
    }

    let mut paths = std::fs::read_dir(root)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .collect::<Vec<_>>();
    paths.sort();

    let children = paths
        .iter()
        .filter_map(|path| match build_tree(path) {
            Ok(node) => Some(node),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Skipping unreadable entry");
                None
            }
        })
        .collect();

    Ok(FileNode {
        name,
        is_dir: true,
        children: Some(children),
    })
}
