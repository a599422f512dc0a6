// src/watch/watcher.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::session::HostEvent;

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive for
/// as long as needed. Dropping this handle will stop file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Spawn a filesystem watcher that observes `root` recursively and sends one
/// `HostEvent::FilesChanged` per batch of changes.
///
/// Events arriving within `debounce` of each other are collected into the
/// same batch. Paths are reported relative to `root`.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    debounce: Duration,
    host_tx: mpsc::Sender<HostEvent>,
) -> Result<WatcherHandle> {
    let root = root.into();
    // Canonicalize once so we have a stable base path.
    let root = root.canonicalize().unwrap_or_else(|_| root.clone());

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    // We can't log via tracing here easily, so fallback to stderr.
                    eprintln!("konawatch: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("konawatch: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;

    info!("file watcher started on {:?}", root);

    tokio::spawn(async move {
        while let Some(first) = event_rx.recv().await {
            let mut batch: Vec<PathBuf> = Vec::new();
            collect_paths(&root, first, &mut batch);

            // Keep draining until the debounce window passes quietly.
            while let Ok(Some(event)) = timeout(debounce, event_rx.recv()).await {
                collect_paths(&root, event, &mut batch);
            }

            if batch.is_empty() {
                continue;
            }

            debug!(paths = ?batch, "file change batch");
            if let Err(err) = host_tx.send(HostEvent::FilesChanged(batch)).await {
                warn!("failed to send HostEvent::FilesChanged: {err}");
                // The session is gone; nothing left to watch for.
                return;
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle { _inner: watcher })
}

fn collect_paths(root: &Path, event: Event, batch: &mut Vec<PathBuf>) {
    if matches!(event.kind, EventKind::Access(_)) {
        return;
    }

    for path in event.paths {
        match relative_path(root, &path) {
            Some(rel) => {
                if !batch.contains(&rel) {
                    batch.push(rel);
                }
            }
            None => warn!(
                "could not relativize path {:?} against root {:?}",
                path, root
            ),
        }
    }
}

/// Convert `path` into a path relative to `root`.
///
/// Tries a plain `strip_prefix` first, then again on canonicalized paths
/// (macOS reports `/private/var/...` for `/var/...`). Deleted files cannot be
/// canonicalized, so only their parent is.
pub fn relative_path(root: &Path, path: &Path) -> Option<PathBuf> {
    if let Ok(rel) = path.strip_prefix(root) {
        return Some(rel.to_path_buf());
    }

    let root_canon = root.canonicalize().ok()?;
    let path_canon = path.canonicalize().ok().or_else(|| {
        let parent = path.parent()?.canonicalize().ok()?;
        Some(parent.join(path.file_name()?))
    })?;

    path_canon
        .strip_prefix(&root_canon)
        .ok()
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_root_prefix() {
        let rel = relative_path(Path::new("/proj"), Path::new("/proj/spec/javascripts/a_spec.js"));
        assert_eq!(rel, Some(PathBuf::from("spec/javascripts/a_spec.js")));
    }

    #[test]
    fn deleted_file_under_real_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let gone = root.join("removed_spec.js");
        assert_eq!(relative_path(&root, &gone), Some(PathBuf::from("removed_spec.js")));
    }

    #[test]
    fn unrelated_path_is_rejected() {
        assert_eq!(relative_path(Path::new("/proj"), Path::new("/elsewhere/a.js")), None);
    }

    #[tokio::test]
    async fn batches_file_changes() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let (tx, mut rx) = mpsc::channel(8);

        let _handle = spawn_watcher(&root, Duration::from_millis(200), tx).unwrap();
        // Give the backend a moment to register the watch.
        tokio::time::sleep(Duration::from_millis(100)).await;

        std::fs::write(root.join("a_spec.js"), "describe()").unwrap();

        let event = timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("no file change batch within 5 seconds")
            .expect("watcher channel closed");

        match event {
            HostEvent::FilesChanged(paths) => {
                assert!(paths.contains(&PathBuf::from("a_spec.js")), "got {paths:?}");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}
