//! `sitekit deploy <staging|production>`

use crate::config::SiteConfig;
use crate::deploy::{DeployReport, Deployer, SleepPacer};
use crate::types::{DeployMode, SiteKitError};
use crate::ui::confirm_production;
use std::io::{self, BufRead, Write};
use tracing::{debug, info};

/// What happened after the confirmation gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    /// The deploy ran to completion
    Completed(DeployReport),
    /// The operator declined; nothing was touched
    Aborted,
}

/// Parse the deploy mode argument. Must happen before any environment is loaded.
pub fn parse_mode(raw: Option<&str>) -> Result<DeployMode, SiteKitError> {
    raw.unwrap_or_default().parse()
}

/// Load `.env` from the working directory, if there is one.
pub fn load_env_file() {
    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => debug!("No .env file found"),
        Err(e) => tracing::warn!("Ignoring unreadable .env file: {}", e),
    }
}

/// Ask for confirmation when `mode` requires it, then call `deploy`.
///
/// `deploy` is never called when the operator declines.
pub fn confirm_and_deploy<R, W, F>(
    mode: DeployMode,
    input: &mut R,
    output: &mut W,
    deploy: F,
) -> Result<DeployOutcome, SiteKitError>
where
    R: BufRead,
    W: Write,
    F: FnOnce(DeployMode) -> Result<DeployReport, SiteKitError>,
{
    if mode.requires_confirmation() {
        if !confirm_production(input, output)? {
            writeln!(output, "Deployment aborted.")?;
            return Ok(DeployOutcome::Aborted);
        }
        writeln!(output, "Confirmed. Starting upload...")?;
    }

    deploy(mode).map(DeployOutcome::Completed)
}

/// Run the deploy pipeline against the FTPS target for `mode`.
pub fn run(config: &SiteConfig, mode: DeployMode) -> Result<DeployOutcome, SiteKitError> {
    if config.upload.is_empty() {
        info!("No upload tasks configured");
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    confirm_and_deploy(mode, &mut input, &mut output, |mode| {
        Deployer::ftp()
            .with_pacer(SleepPacer::new(config.settle_delay()))
            .run_deploy(mode, &config.upload)
    })
}
