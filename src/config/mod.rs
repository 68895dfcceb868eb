//! Configuration management

mod cli;

pub use cli::{Cli, Command};

use crate::deploy::SleepPacer;
use crate::scanner::strip_cur_dir;
use crate::sync::DEFAULT_WATCH_DIR;
use crate::types::{CopyTask, SiteKitError, UploadTask};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default config file name looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "sitekit.toml";

/// Task lists and pipeline settings, loaded from `sitekit.toml`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Directory watched in dev mode
    #[serde(default = "default_watch_dir")]
    pub watch_dir: PathBuf,

    /// Pause after each upload task's progress bar (milliseconds)
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Local mirror tasks
    #[serde(default)]
    pub copy: Vec<CopyTask>,

    /// Remote upload tasks
    #[serde(default)]
    pub upload: Vec<UploadTask>,
}

fn default_watch_dir() -> PathBuf {
    PathBuf::from(DEFAULT_WATCH_DIR)
}

fn default_settle_delay_ms() -> u64 {
    SleepPacer::DEFAULT_DELAY.as_millis() as u64
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            watch_dir: default_watch_dir(),
            settle_delay_ms: default_settle_delay_ms(),
            copy: Vec::new(),
            upload: Vec::new(),
        }
    }
}

impl SiteConfig {
    /// Read and validate a config file
    pub fn load(path: &Path) -> Result<Self, SiteKitError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SiteKitError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&raw).map_err(|e| match e {
            SiteKitError::Config(msg) => {
                SiteKitError::Config(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Parse and validate config text
    pub fn parse(raw: &str) -> Result<Self, SiteKitError> {
        let config: SiteConfig =
            toml::from_str(raw).map_err(|e| SiteKitError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Settle delay as a duration
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), SiteKitError> {
        let mut destinations = HashSet::new();
        for task in &self.copy {
            if task.name.trim().is_empty() {
                return Err(SiteKitError::Config(
                    "copy task without a name".to_string(),
                ));
            }
            if task.src.trim().is_empty() {
                return Err(SiteKitError::Config(format!(
                    "copy task '{}' has an empty src pattern",
                    task.name
                )));
            }
            // Each destination is emptied before a run, so it must belong to one task
            if !destinations.insert(strip_cur_dir(&task.dest)) {
                return Err(SiteKitError::Config(format!(
                    "copy task '{}' shares destination {} with another task",
                    task.name,
                    task.dest.display()
                )));
            }
        }

        for task in &self.upload {
            if task.name.trim().is_empty() {
                return Err(SiteKitError::Config(
                    "upload task without a name".to_string(),
                ));
            }
            if task.local_pattern.trim().is_empty() {
                return Err(SiteKitError::Config(format!(
                    "upload task '{}' has an empty local_pattern",
                    task.name
                )));
            }
        }

        Ok(())
    }
}
