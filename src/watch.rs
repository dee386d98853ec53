//! Directory watching
//!
//! Reports Go source files as they are written, so checks can run on save
//! without an editor. Editors often emit several events for one save; those
//! are coalesced into a single batch.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

/// Events arriving within this window after the first one join its batch
const DEBOUNCE: Duration = Duration::from_millis(200);

/// Events from the file watcher
#[derive(Debug)]
enum WatchEvent {
    SourceSaved(PathBuf),
    WatcherError(notify::Error),
}

/// Watches a directory tree for saved Go files
pub struct GoFileWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::UnboundedReceiver<WatchEvent>,
}

impl GoFileWatcher {
    /// Start watching `dir` recursively
    pub fn new(dir: &Path) -> Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| match res {
                Ok(event) => {
                    if let EventKind::Create(_) | EventKind::Modify(_) = event.kind {
                        for path in event.paths {
                            if is_go_source(&path) {
                                let _ = tx.send(WatchEvent::SourceSaved(path));
                            }
                        }
                    }
                }
                Err(e) => {
                    let _ = tx.send(WatchEvent::WatcherError(e));
                }
            },
            Config::default().with_poll_interval(Duration::from_secs(1)),
        )?;

        watcher
            .watch(dir, RecursiveMode::Recursive)
            .with_context(|| format!("Failed to watch {}", dir.display()))?;
        log::info!("Watching {} for Go source changes", dir.display());

        Ok(Self {
            _watcher: watcher,
            rx,
        })
    }

    /// Wait for the next batch of saved files
    ///
    /// Each path appears once per batch, in the order first seen. Returns
    /// `None` once the watcher has shut down.
    pub async fn next_batch(&mut self) -> Option<Vec<PathBuf>> {
        let mut batch = Vec::new();

        while batch.is_empty() {
            let event = self.rx.recv().await?;
            Self::collect(event, &mut batch);
        }

        tokio::time::sleep(DEBOUNCE).await;
        while let Ok(event) = self.rx.try_recv() {
            Self::collect(event, &mut batch);
        }

        Some(batch)
    }

    fn collect(event: WatchEvent, batch: &mut Vec<PathBuf>) {
        match event {
            WatchEvent::SourceSaved(path) => {
                if !batch.contains(&path) {
                    batch.push(path);
                }
            }
            WatchEvent::WatcherError(e) => log::error!("File watcher error: {}", e),
        }
    }
}

/// `.go` files, skipping editor backups and hidden files
pub fn is_go_source(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };
    !name.starts_with('.') && name.ends_with(".go")
}
