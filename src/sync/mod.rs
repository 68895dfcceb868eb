//! Local mirror pipeline: clear destinations, copy matched files, optionally watch

mod lock;
mod watch;

pub use lock::{RunGuard, RunLock, RunState};
pub use watch::{changes_from, is_dotfile_path, watch_files, ChangeEvent, ChangeKind, WatchCoordinator};

use crate::executor::{empty_dir, mirror_task, TaskStats};
use crate::types::{CopyTask, SiteKitError, SyncMode};
use std::path::PathBuf;
use std::time::Instant;
use tokio::task::{JoinError, JoinSet};
use tracing::{error, info};

/// Default directory watched in dev mode
pub const DEFAULT_WATCH_DIR: &str = "src";

/// Aggregate statistics of one mirror run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorStats {
    /// Number of tasks mirrored.
    pub tasks: usize,
    /// Files copied across all tasks.
    pub files_copied: usize,
    /// Bytes copied across all tasks.
    pub bytes_copied: u64,
}

impl MirrorStats {
    fn add(&mut self, task: &TaskStats) {
        self.tasks += 1;
        self.files_copied += task.files_copied;
        self.bytes_copied += task.bytes_copied;
    }
}

/// Options for [`run`].
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Directory watched for changes in dev mode
    pub watch_dir: PathBuf,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            watch_dir: PathBuf::from(DEFAULT_WATCH_DIR),
        }
    }
}

/// Mirror every task: empty all destinations, then copy all tasks concurrently.
///
/// A destination is always cleared before anything is copied into it, so
/// files removed from the source do not survive in the output. Tasks run in
/// parallel with each other; files inside one task are copied in order.
///
/// # Errors
/// If a task fails, the remaining tasks still run to completion and the first
/// error is returned. Destinations are left partially mirrored.
pub async fn copy_all(tasks: &[CopyTask]) -> Result<MirrorStats, SiteKitError> {
    info!("Starting copy of all files ({} task(s))...", tasks.len());
    let started = Instant::now();

    for task in tasks {
        let dest = task.dest.clone();
        tokio::task::spawn_blocking(move || empty_dir(&dest))
            .await
            .map_err(map_join_error)??;
    }

    let mut set = JoinSet::new();
    for task in tasks.iter().cloned() {
        set.spawn_blocking(move || {
            let result = mirror_task(&task);
            (task.name, result)
        });
    }

    let mut stats = MirrorStats::default();
    let mut first_error = None;
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((name, Ok(task_stats))) => {
                info!("[{}] {} file(s) copied", name, task_stats.files_copied);
                stats.add(&task_stats);
            }
            Ok((name, Err(e))) => {
                error!("[{}] copy failed: {}", name, e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
            Err(e) => {
                if first_error.is_none() {
                    first_error = Some(map_join_error(e));
                }
            }
        }
    }

    if let Some(e) = first_error {
        return Err(e);
    }

    info!(
        "Copy complete: {} file(s) in {:.2?}",
        stats.files_copied,
        started.elapsed()
    );
    Ok(stats)
}

/// Dispatch on the sync mode: `build` mirrors once, `dev` mirrors then watches.
///
/// In dev mode this only returns when the watcher stops (Ctrl+C) or fails
/// to start.
pub async fn run(
    tasks: Vec<CopyTask>,
    mode: SyncMode,
    options: SyncOptions,
) -> Result<(), SiteKitError> {
    copy_all(&tasks).await?;

    match mode {
        SyncMode::Build => Ok(()),
        SyncMode::Dev => watch_files(tasks, &options.watch_dir).await,
    }
}

fn map_join_error(error: JoinError) -> SiteKitError {
    SiteKitError::TaskJoin(format!("copy task failed: {}", error))
}
