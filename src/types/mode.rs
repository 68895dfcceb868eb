//! Invocation modes selected on the command line

use super::SiteKitError;
use std::fmt;
use std::str::FromStr;

/// How the sync pipeline runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Mirror once, then watch for changes
    Dev,

    /// Mirror once and exit
    Build,
}

impl FromStr for SyncMode {
    type Err = SiteKitError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "dev" => Ok(SyncMode::Dev),
            "build" => Ok(SyncMode::Build),
            other => Err(SiteKitError::Config(format!(
                "unknown sync mode '{}', expected \"dev\" or \"build\"",
                other
            ))),
        }
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncMode::Dev => f.write_str("dev"),
            SyncMode::Build => f.write_str("build"),
        }
    }
}

/// Named deployment target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployMode {
    Staging,
    Production,
}

impl DeployMode {
    /// Lowercase mode name as typed on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            DeployMode::Staging => "staging",
            DeployMode::Production => "production",
        }
    }

    /// Suffix used for the `FTP_*_<MODE>` environment variables
    pub fn env_suffix(&self) -> String {
        self.as_str().to_uppercase()
    }

    /// Whether this target needs an interactive confirmation
    pub fn requires_confirmation(&self) -> bool {
        matches!(self, DeployMode::Production)
    }
}

impl FromStr for DeployMode {
    type Err = SiteKitError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "staging" => Ok(DeployMode::Staging),
            "production" => Ok(DeployMode::Production),
            _ => Err(SiteKitError::Config(
                "a mode needs to be given, either \"staging\" or \"production\"".to_string(),
            )),
        }
    }
}

impl fmt::Display for DeployMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
