//! Executor module for local file operations

pub mod copy;

use crate::scanner::{enumerate, relative_to};
use crate::types::{CopyTask, SiteKitError};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

pub use copy::copy_file_atomic;

/// Result of mirroring a single copy task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStats {
    /// Number of files copied into the destination.
    pub files_copied: usize,
    /// Aggregate copied bytes.
    pub bytes_copied: u64,
}

/// Recursively remove everything inside `dir`, keeping `dir` itself.
///
/// A missing `dir` is created. Symlinks inside are removed, never followed.
pub fn empty_dir(dir: &Path) -> Result<(), SiteKitError> {
    match fs::read_dir(dir) {
        Ok(entries) => {
            for entry in entries {
                let entry = entry?;
                remove_path_any(&entry.path())?;
            }
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            fs::create_dir_all(dir)?;
            Ok(())
        }
        Err(e) => Err(SiteKitError::Io(e)),
    }
}

/// Remove any filesystem entry at `path`.
///
/// Directories are removed recursively; files and symlinks are removed as files.
fn remove_path_any(path: &Path) -> Result<(), SiteKitError> {
    let metadata = fs::symlink_metadata(path)?;
    if metadata.file_type().is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    Ok(())
}

/// Copy every file matched by `task.src` to `task.dest/<path relative to base>`.
///
/// Files are copied sequentially in enumeration order. The destination is
/// expected to have been emptied already; nothing is deleted here.
///
/// # Errors
/// The first failing copy aborts the task with `SiteKitError::Transfer`.
pub fn mirror_task(task: &CopyTask) -> Result<TaskStats, SiteKitError> {
    let files = enumerate(&task.src, &[])?;
    let mut stats = TaskStats::default();

    if files.is_empty() {
        debug!("[{}] no files match {}", task.name, task.src);
        return Ok(stats);
    }

    for file in &files {
        let relative = relative_to(file, &task.base)?;
        let dest_path = task.dest.join(&relative);

        let bytes = copy_file_atomic(file, &dest_path)
            .map_err(|e| SiteKitError::transfer(file.clone(), e))?;

        debug!("[{}] {} -> {}", task.name, file.display(), dest_path.display());
        stats.files_copied += 1;
        stats.bytes_copied += bytes;
    }

    Ok(stats)
}
