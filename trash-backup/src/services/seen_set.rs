use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Source paths that have been replicated successfully at least once.
///
/// Grows for the lifetime of the process and is never pruned: an entry that
/// leaves the watched directory and comes back under the same path is not
/// copied again.
#[derive(Debug, Default)]
pub struct SeenSet {
    paths: Mutex<HashSet<PathBuf>>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn has(&self, path: &Path) -> bool {
        self.paths.lock().await.contains(path)
    }

    /// Record `path`. Only call this once its copy has fully succeeded.
    pub async fn mark(&self, path: PathBuf) {
        self.paths.lock().await.insert(path);
    }

    pub async fn len(&self) -> usize {
        self.paths.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
