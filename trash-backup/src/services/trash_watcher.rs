//! Polling loop that backs up every new entry of the watched directory.

use crate::fs::listing::{list_entries, ListedEntry};
use crate::fs::replicator::replicate;
use crate::services::seen_set::SeenSet;
use crate::ws::hub::{NotificationHub, Observer};
use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub struct TrashWatcher<O> {
    watch_dir: PathBuf,
    backup_dir: PathBuf,
    poll_interval: Duration,
    seen: Arc<SeenSet>,
    hub: Arc<NotificationHub<O>>,
}

impl<O: Observer> TrashWatcher<O> {
    pub fn new(
        watch_dir: PathBuf,
        backup_dir: PathBuf,
        poll_interval: Duration,
        seen: Arc<SeenSet>,
        hub: Arc<NotificationHub<O>>,
    ) -> Self {
        Self {
            watch_dir,
            backup_dir,
            poll_interval,
            seen,
            hub,
        }
    }

    /// Create the backup root and spawn the polling loop.
    ///
    /// Fails without spawning anything if the backup root cannot be created.
    /// The loop runs until `cancel` fires.
    pub fn start(self, cancel: CancellationToken) -> anyhow::Result<JoinHandle<()>> {
        std::fs::create_dir_all(&self.backup_dir).with_context(|| {
            format!("Failed to create backup directory {}", self.backup_dir.display())
        })?;

        Ok(tokio::spawn(async move {
            tracing::info!(
                watch_dir = %self.watch_dir.display(),
                backup_dir = %self.backup_dir.display(),
                "Trash watcher started"
            );
            loop {
                self.poll_once().await;
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(self.poll_interval) => {}
                }
            }
            tracing::info!("Trash watcher stopped");
        }))
    }

    /// Run one list/copy cycle and return the number of newly backed up entries.
    ///
    /// An unreadable watched directory skips the cycle. An entry whose copy
    /// fails stays unmarked and is retried on the next cycle.
    pub async fn poll_once(&self) -> usize {
        let watch_dir = self.watch_dir.clone();
        let entries = match tokio::task::spawn_blocking(move || list_entries(&watch_dir)).await {
            Ok(Ok(entries)) => entries,
            Ok(Err(e)) => {
                tracing::debug!(watch_dir = %self.watch_dir.display(), error = %e, "Cannot list watched directory");
                return 0;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Listing task failed");
                return 0;
            }
        };

        let mut replicated = 0;
        for entry in entries {
            if self.seen.has(&entry.path).await {
                continue;
            }
            if self.back_up(&entry).await {
                self.seen.mark(entry.path.clone()).await;
                self.hub.broadcast(&entry.name).await;
                replicated += 1;
            }
        }
        replicated
    }

    async fn back_up(&self, entry: &ListedEntry) -> bool {
        let Some(file_name) = entry.path.file_name() else {
            return false;
        };
        let source = entry.path.clone();
        let destination = self.backup_dir.join(file_name);

        match tokio::task::spawn_blocking(move || replicate(&source, &destination)).await {
            Ok(Ok(())) => {
                tracing::info!(name = %entry.name, is_dir = entry.is_dir, "Backed up new trash entry");
                true
            }
            Ok(Err(e)) => {
                tracing::warn!(name = %entry.name, error = %e, "Backup failed, will retry next cycle");
                false
            }
            Err(e) => {
                tracing::warn!(name = %entry.name, error = %e, "Backup task failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ws::hub::testing::{Behavior, RecordingObserver};
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        watch_dir: PathBuf,
        backup_dir: PathBuf,
        seen: Arc<SeenSet>,
        observer: RecordingObserver,
        watcher: TrashWatcher<RecordingObserver>,
    }

    async fn fixture() -> std::io::Result<Fixture> {
        let temp = TempDir::new()?;
        let watch_dir = temp.path().join(".Trash");
        let backup_dir = temp.path().join("TrashBackup");
        fs::create_dir_all(&watch_dir)?;
        fs::create_dir_all(&backup_dir)?;

        let seen = Arc::new(SeenSet::new());
        let hub = Arc::new(NotificationHub::new(Duration::from_millis(100)));
        let observer = RecordingObserver::new(Behavior::Accept);
        hub.register(observer.clone()).await;

        let watcher = TrashWatcher::new(
            watch_dir.clone(),
            backup_dir.clone(),
            Duration::from_millis(20),
            seen.clone(),
            hub,
        );

        Ok(Fixture {
            _temp: temp,
            watch_dir,
            backup_dir,
            seen,
            observer,
            watcher,
        })
    }

    #[tokio::test]
    async fn test_new_entries_are_copied_and_announced() -> std::io::Result<()> {
        let f = fixture().await?;
        fs::write(f.watch_dir.join("b.txt"), b"bee")?;
        fs::create_dir_all(f.watch_dir.join("a/nested"))?;
        fs::write(f.watch_dir.join("a/nested/deep.txt"), b"deep")?;

        assert_eq!(f.watcher.poll_once().await, 2);

        assert_eq!(fs::read(f.backup_dir.join("b.txt"))?, b"bee");
        assert_eq!(fs::read(f.backup_dir.join("a/nested/deep.txt"))?, b"deep");
        assert_eq!(f.observer.messages(), ["a", "b.txt"]);
        assert!(f.seen.has(&f.watch_dir.join("a")).await);
        Ok(())
    }

    #[tokio::test]
    async fn test_seen_entries_are_not_copied_again() -> std::io::Result<()> {
        let f = fixture().await?;
        let source = f.watch_dir.join("draft.md");
        fs::write(&source, b"v1")?;

        assert_eq!(f.watcher.poll_once().await, 1);

        // A later change to the same path must not reach the backup.
        fs::write(&source, b"v2")?;
        assert_eq!(f.watcher.poll_once().await, 0);
        assert_eq!(f.watcher.poll_once().await, 0);

        assert_eq!(fs::read(f.backup_dir.join("draft.md"))?, b"v1");
        assert_eq!(f.observer.messages(), ["draft.md"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_watch_dir_skips_cycle() -> std::io::Result<()> {
        let f = fixture().await?;
        fs::write(f.watch_dir.join("kept.txt"), b"k")?;
        f.watcher.poll_once().await;

        fs::remove_dir_all(&f.watch_dir)?;
        assert_eq!(f.watcher.poll_once().await, 0);
        assert_eq!(f.seen.len().await, 1);

        fs::create_dir_all(&f.watch_dir)?;
        fs::write(f.watch_dir.join("later.txt"), b"l")?;
        assert_eq!(f.watcher.poll_once().await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_copy_is_retried() -> std::io::Result<()> {
        let f = fixture().await?;
        fs::create_dir_all(f.watch_dir.join("album"))?;
        fs::write(f.watch_dir.join("album/1.jpg"), b"jpg")?;
        // A plain file in the backup root blocks the directory copy.
        fs::write(f.backup_dir.join("album"), b"blocker")?;

        assert_eq!(f.watcher.poll_once().await, 0);
        assert!(!f.seen.has(&f.watch_dir.join("album")).await);
        assert!(f.observer.messages().is_empty());

        fs::remove_file(f.backup_dir.join("album"))?;
        assert_eq!(f.watcher.poll_once().await, 1);
        assert_eq!(fs::read(f.backup_dir.join("album/1.jpg"))?, b"jpg");
        assert_eq!(f.observer.messages(), ["album"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_loop_picks_up_entries_and_stops_on_cancel() -> anyhow::Result<()> {
        let f = fixture().await?;
        let cancel = CancellationToken::new();
        let handle = f.watcher.start(cancel.clone())?;

        fs::write(f.watch_dir.join("late.bin"), [1u8, 2, 3])?;
        let copied = f.backup_dir.join("late.bin");
        for _ in 0..100 {
            if f.observer.messages().len() == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(fs::read(&copied)?, [1u8, 2, 3]);
        assert_eq!(f.observer.messages(), ["late.bin"]);

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(2), handle).await??;
        Ok(())
    }

    #[tokio::test]
    async fn test_start_fails_when_backup_root_cannot_be_created() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let blocker = temp.path().join("file");
        fs::write(&blocker, b"not a directory")?;

        let watcher: TrashWatcher<RecordingObserver> = TrashWatcher::new(
            temp.path().join("watch"),
            blocker.join("backup"),
            Duration::from_millis(20),
            Arc::new(SeenSet::new()),
            Arc::new(NotificationHub::new(Duration::from_millis(100))),
        );
        assert!(watcher.start(CancellationToken::new()).is_err());
        Ok(())
    }
}
