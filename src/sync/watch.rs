//! Watch mode: re-run the full mirror whenever the watched tree changes
//!
//! Events that arrive while a mirror run is in progress are dropped, not
//! queued. The output becomes consistent again on the next qualifying event,
//! so a change made during a run is only picked up once something else
//! changes afterwards.

use super::lock::RunLock;
use super::{copy_all, MirrorStats};
use crate::types::{CopyTask, SiteKitError};
use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::fmt;
use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Kind of filesystem change that triggers a mirror run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Add,
    Change,
    Remove,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Add => f.write_str("add"),
            ChangeKind::Change => f.write_str("change"),
            ChangeKind::Remove => f.write_str("remove"),
        }
    }
}

/// A single qualifying change below the watched directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub path: PathBuf,
}

/// Decides whether a change starts a mirror run.
///
/// Owns the [`RunLock`]. Each accepted change spawns one run on the tokio
/// runtime; the lock is held by that task until the run finishes.
pub struct WatchCoordinator<F> {
    lock: Arc<RunLock>,
    run: Arc<F>,
}

impl<F, Fut> WatchCoordinator<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<MirrorStats, SiteKitError>> + Send + 'static,
{
    pub fn new(run: F) -> Self {
        Self {
            lock: Arc::new(RunLock::new()),
            run: Arc::new(run),
        }
    }

    pub fn lock(&self) -> &RunLock {
        &self.lock
    }

    /// Start a mirror run for `event` unless one is already running.
    ///
    /// Returns the handle of the spawned run, or `None` when the event was
    /// dropped. Errors of the run are logged and never escape.
    pub fn handle(&self, event: &ChangeEvent) -> Option<JoinHandle<()>> {
        let Some(guard) = self.lock.try_acquire() else {
            debug!(
                "[{}] {} ignored, copy already running",
                event.kind,
                event.path.display()
            );
            return None;
        };

        info!(
            "[{}] {}. Re-copying all files...",
            event.kind,
            event.path.display()
        );

        let run = Arc::clone(&self.run);
        Some(tokio::spawn(async move {
            let _guard = guard;
            if let Err(e) = run().await {
                error!("Error during copy: {}", e);
            }
        }))
    }
}

/// Watch `watch_dir` recursively and re-mirror all `tasks` on every change.
///
/// Runs until Ctrl+C. Paths with a dot-prefixed component below `watch_dir`
/// never trigger a run, even though [`copy_all`] itself copies dotfiles.
///
/// # Errors
/// * `SiteKitError::Watch` if the watcher cannot be created or attached
pub async fn watch_files(tasks: Vec<CopyTask>, watch_dir: &Path) -> Result<(), SiteKitError> {
    let tasks = Arc::new(tasks);
    let coordinator = WatchCoordinator::new(move || {
        let tasks = Arc::clone(&tasks);
        async move { copy_all(&tasks).await }
    });

    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                let _ = tx.send(event);
            }
            Err(e) => warn!("Watcher error: {}", e),
        },
        notify::Config::default(),
    )
    .map_err(|e| SiteKitError::Watch(e.to_string()))?;

    watcher
        .watch(watch_dir, RecursiveMode::Recursive)
        .map_err(|e| SiteKitError::Watch(format!("{}: {}", watch_dir.display(), e)))?;

    info!("Watching for file changes in {}/", watch_dir.display());

    let roots = watch_roots(watch_dir);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            received = rx.recv() => {
                let Some(event) = received else { break };
                for change in changes_from(&event, &roots) {
                    coordinator.handle(&change);
                }
            }
            _ = &mut shutdown => {
                info!("Stopping watcher");
                break;
            }
        }
    }

    Ok(())
}

/// Translate a notify event into qualifying changes.
///
/// Access events and anything below a dot-prefixed path component (relative
/// to one of `roots`) are filtered out.
pub fn changes_from(event: &Event, roots: &[PathBuf]) -> Vec<ChangeEvent> {
    let Some(kind) = classify(&event.kind) else {
        return Vec::new();
    };

    event
        .paths
        .iter()
        .filter(|path| !is_dotfile_path(path, roots))
        .map(|path| ChangeEvent {
            kind,
            path: path.clone(),
        })
        .collect()
}

fn classify(kind: &EventKind) -> Option<ChangeKind> {
    match kind {
        EventKind::Create(_) => Some(ChangeKind::Add),
        EventKind::Modify(ModifyKind::Metadata(_)) => None,
        EventKind::Modify(_) => Some(ChangeKind::Change),
        EventKind::Remove(_) => Some(ChangeKind::Remove),
        _ => None,
    }
}

/// True if any component of `path` below the watched root starts with `.`
///
/// Falls back to checking every component when `path` is not under any of
/// `roots`.
pub fn is_dotfile_path(path: &Path, roots: &[PathBuf]) -> bool {
    let relative = roots
        .iter()
        .find_map(|root| path.strip_prefix(root).ok())
        .unwrap_or(path);

    relative.components().any(|c| match c {
        Component::Normal(name) => name.to_string_lossy().starts_with('.'),
        _ => false,
    })
}

/// The watched dir as given plus its canonical form, since some backends
/// report canonicalized paths.
fn watch_roots(watch_dir: &Path) -> Vec<PathBuf> {
    let mut roots = vec![watch_dir.to_path_buf()];
    if let Ok(canonical) = watch_dir.canonicalize() {
        if canonical != watch_dir {
            roots.push(canonical);
        }
    }
    roots
}
