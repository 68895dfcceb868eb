//! Mode-scoped FTP credentials

use crate::types::{DeployMode, SiteKitError};
use std::fmt;

/// Default control port for explicit FTPS
pub const DEFAULT_FTP_PORT: u16 = 21;

/// Login data for one deployment target.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Read `FTP_HOST_<MODE>`, `FTP_USER_<MODE>`, `FTP_PASSWORD_<MODE>` and the
    /// optional `FTP_PORT_<MODE>` through `lookup`.
    ///
    /// # Errors
    /// * `SiteKitError::Authentication` if a required variable is missing or
    ///   the port is not a number
    pub fn resolve<L>(mode: DeployMode, lookup: L) -> Result<Self, SiteKitError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let suffix = mode.env_suffix();
        let required = |name: &str| {
            let key = format!("FTP_{}_{}", name, suffix);
            lookup(&key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| SiteKitError::Authentication(format!("{} is not set", key)))
        };

        let host = required("HOST")?;
        let user = required("USER")?;
        let password = required("PASSWORD")?;

        let port_key = format!("FTP_PORT_{}", suffix);
        let port = match lookup(&port_key) {
            Some(raw) if !raw.is_empty() => raw.parse::<u16>().map_err(|_| {
                SiteKitError::Authentication(format!("{} is not a valid port: {}", port_key, raw))
            })?,
            _ => DEFAULT_FTP_PORT,
        };

        Ok(Self {
            host,
            port,
            user,
            password,
        })
    }

    /// Resolve from the process environment
    pub fn from_env(mode: DeployMode) -> Result<Self, SiteKitError> {
        Self::resolve(mode, |key| std::env::var(key).ok())
    }

    /// `host:port` for the control connection
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
