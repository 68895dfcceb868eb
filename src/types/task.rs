//! Task definitions - what to copy and what to upload

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A local mirror task: every file matching `src` is copied under `dest`,
/// keeping its path relative to `base`.
///
/// `dest` is owned by the task and is emptied before each mirror run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyTask {
    /// Human readable task name (used in logs)
    pub name: String,

    /// Glob pattern selecting source files, rooted under `base`
    pub src: String,

    /// Source root the matched files are relativized against
    pub base: PathBuf,

    /// Destination root
    pub dest: PathBuf,
}

impl CopyTask {
    pub fn new(
        name: impl Into<String>,
        src: impl Into<String>,
        base: impl Into<PathBuf>,
        dest: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            src: src.into(),
            base: base.into(),
            dest: dest.into(),
        }
    }
}

/// A remote upload task: every file matching `local_pattern` (minus
/// `ignore`) is uploaded below `remote_dir`.
///
/// Remote state is never pruned; uploads add or overwrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadTask {
    /// Human readable task name (used in logs)
    pub name: String,

    /// Glob pattern selecting local files
    pub local_pattern: String,

    /// Local root the matched files are relativized against
    pub local_base: PathBuf,

    /// Remote directory the relative paths are joined onto
    pub remote_dir: String,

    /// Glob patterns excluded from the upload
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl UploadTask {
    pub fn new(
        name: impl Into<String>,
        local_pattern: impl Into<String>,
        local_base: impl Into<PathBuf>,
        remote_dir: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            local_pattern: local_pattern.into(),
            local_base: local_base.into(),
            remote_dir: remote_dir.into(),
            ignore: Vec::new(),
        }
    }

    /// Add ignore patterns to this task
    pub fn with_ignore<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore.extend(patterns.into_iter().map(Into::into));
        self
    }
}
