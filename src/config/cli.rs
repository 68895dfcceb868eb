//! Command line definition

use super::DEFAULT_CONFIG_FILE;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Mirror web assets and deploy them over FTPS
#[derive(Parser, Debug)]
#[command(name = "sitekit", author, version, about)]
pub struct Cli {
    /// Path to the task configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Copy assets once (`build`) or copy and keep watching (`dev`)
    Sync {
        /// `dev` or `build`
        mode: Option<String>,
    },
    /// Upload files to `staging` or `production`
    Deploy {
        /// `staging` or `production`
        mode: Option<String>,
    },
}
