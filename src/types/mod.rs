//! Core type definitions for sitekit

mod error;
mod mode;
mod task;

pub use error::SiteKitError;
pub use mode::{DeployMode, SyncMode};
pub use task::{CopyTask, UploadTask};
