//! Command entry points behind the CLI

pub mod deploy;
pub mod sync;
