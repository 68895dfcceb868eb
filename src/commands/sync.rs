//! `sitekit sync <dev|build>`

use crate::config::SiteConfig;
use crate::sync::{self, SyncOptions};
use crate::types::{SiteKitError, SyncMode};
use tokio::runtime::Builder;
use tracing::warn;

/// Parse the sync mode argument; a missing or unknown mode is a configuration error.
pub fn parse_mode(raw: Option<&str>) -> Result<SyncMode, SiteKitError> {
    match raw {
        Some(value) => value.parse(),
        None => Err(SiteKitError::Config(
            "a mode needs to be given, either \"dev\" or \"build\"".to_string(),
        )),
    }
}

/// Run the sync pipeline for `mode` on a fresh tokio runtime.
///
/// `build` returns after one mirror run; `dev` returns when the watcher stops.
pub fn run(config: &SiteConfig, mode: SyncMode) -> Result<(), SiteKitError> {
    if config.copy.is_empty() {
        warn!("No copy tasks configured, nothing to mirror");
    }

    let runtime = Builder::new_multi_thread().enable_all().build()?;
    let options = SyncOptions {
        watch_dir: config.watch_dir.clone(),
    };

    runtime.block_on(sync::run(config.copy.clone(), mode, options))
}
