use clap::Parser;
use sitekit::commands::{self, deploy::DeployOutcome};
use sitekit::config::{Cli, Command};
use sitekit::SiteConfig;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Sync { mode } => {
            let mode = commands::sync::parse_mode(mode.as_deref())?;
            let config = SiteConfig::load(&cli.config)?;
            commands::sync::run(&config, mode)?;
        }
        Command::Deploy { mode } => {
            // Validate before touching .env or the network
            let mode = commands::deploy::parse_mode(mode.as_deref())?;
            commands::deploy::load_env_file();
            let config = SiteConfig::load(&cli.config)?;

            if let DeployOutcome::Completed(report) = commands::deploy::run(&config, mode)? {
                tracing::debug!("Deploy report: {:?}", report);
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Warning: a global tracing subscriber was already installed");
    }
}
