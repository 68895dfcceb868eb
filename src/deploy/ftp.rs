//! Explicit FTPS session backed by suppaftp

use super::credentials::Credentials;
use super::session::TransferSession;
use crate::types::SiteKitError;
use std::fs::File;
use std::path::Path;
use suppaftp::native_tls::TlsConnector;
use suppaftp::types::FileType;
use suppaftp::{NativeTlsConnector, NativeTlsFtpStream};
use tracing::{debug, warn};

/// FTP over explicit TLS (`AUTH TLS`), binary transfers, passive mode.
#[derive(Default)]
pub struct FtpSession {
    stream: Option<NativeTlsFtpStream>,
    /// Working directory right after login; relative remote paths resolve
    /// against it.
    home: String,
}

impl FtpSession {
    pub fn new() -> Self {
        Self::default()
    }

    fn stream_mut(&mut self) -> Result<&mut NativeTlsFtpStream, SiteKitError> {
        self.stream
            .as_mut()
            .ok_or_else(|| SiteKitError::Authentication("session is not connected".to_string()))
    }
}

fn auth_error(stage: &str, error: impl std::fmt::Display) -> SiteKitError {
    SiteKitError::Authentication(format!("{}: {}", stage, error))
}

impl TransferSession for FtpSession {
    fn connect(&mut self, credentials: &Credentials) -> Result<(), SiteKitError> {
        let plain = NativeTlsFtpStream::connect(credentials.address())
            .map_err(|e| auth_error("connect", e))?;
        let connector = TlsConnector::new().map_err(|e| auth_error("tls", e))?;
        let mut stream = plain
            .into_secure(NativeTlsConnector::from(connector), &credentials.host)
            .map_err(|e| auth_error("tls handshake", e))?;

        stream
            .login(credentials.user.as_str(), credentials.password.as_str())
            .map_err(|e| auth_error("login", e))?;
        stream
            .transfer_type(FileType::Binary)
            .map_err(|e| auth_error("transfer type", e))?;

        self.home = stream.pwd().map_err(|e| auth_error("pwd", e))?;
        debug!("Connected to {} (home {})", credentials.address(), self.home);
        self.stream = Some(stream);
        Ok(())
    }

    fn ensure_dir(&mut self, remote_dir: &str) -> Result<(), SiteKitError> {
        if remote_dir.is_empty() || remote_dir == "." {
            return Ok(());
        }

        let home = self.home.clone();
        let stream = self.stream_mut()?;
        let dir_error = |e: suppaftp::FtpError| SiteKitError::transfer(remote_dir, e);

        if remote_dir.starts_with('/') {
            stream.cwd("/").map_err(dir_error)?;
        }
        for segment in remote_dir.split('/').filter(|s| !s.is_empty() && *s != ".") {
            if stream.cwd(segment).is_err() {
                stream.mkdir(segment).map_err(dir_error)?;
                stream.cwd(segment).map_err(dir_error)?;
            }
        }

        stream.cwd(home.as_str()).map_err(dir_error)
    }

    fn upload(&mut self, local: &Path, remote_path: &str) -> Result<(), SiteKitError> {
        let mut file = File::open(local).map_err(|e| SiteKitError::transfer(local, e))?;
        let stream = self.stream_mut()?;
        let bytes = stream
            .put_file(remote_path, &mut file)
            .map_err(|e| SiteKitError::transfer(local, e))?;
        debug!("{} -> {} ({} bytes)", local.display(), remote_path, bytes);
        Ok(())
    }

    fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = stream.quit() {
                warn!("Closing FTP session failed: {}", e);
            }
        }
    }
}
