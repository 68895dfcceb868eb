//! # sitekit - asset mirroring and deployment for web projects
//!
//! Two pipelines with the same shape (tasks, then files per task, then one
//! action per file):
//!
//! - [`sync`] mirrors source assets into output directories, once or on
//!   every change under a watched directory.
//! - [`deploy`] uploads build output to an FTPS target selected by a named
//!   mode, one task after another.

// Module declarations
pub mod commands;
pub mod config;
pub mod deploy;
pub mod executor;
pub mod scanner;
pub mod sync;
pub mod types;
pub mod ui;

// Re-export commonly used types
pub use config::SiteConfig;
pub use types::{CopyTask, DeployMode, SiteKitError, SyncMode, UploadTask};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
