//! Error types for sitekit

use std::path::PathBuf;
use thiserror::Error;

/// Error types for sitekit operations
#[derive(Debug, Error)]
pub enum SiteKitError {
    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration (bad CLI mode, unreadable config file, ...)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A glob or ignore pattern could not be parsed or walked
    #[error("Invalid pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    /// Missing credentials or a failed connect/login
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// A single file could not be copied or uploaded
    #[error("Transfer failed for {path}: {message}")]
    Transfer { path: PathBuf, message: String },

    /// The filesystem watcher could not be started
    #[error("Watcher error: {0}")]
    Watch(String),

    /// A concurrent copy task panicked or was cancelled
    #[error("Task failed: {0}")]
    TaskJoin(String),
}

impl SiteKitError {
    /// Build a transfer error for `path` from any displayable cause.
    pub fn transfer(path: impl Into<PathBuf>, cause: impl std::fmt::Display) -> Self {
        SiteKitError::Transfer {
            path: path.into(),
            message: cause.to_string(),
        }
    }

    /// Check if this error comes from bad configuration
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, SiteKitError::Config(_) | SiteKitError::Pattern { .. })
    }

    /// Check if this error aborted a deploy before any upload
    pub fn is_authentication_error(&self) -> bool {
        matches!(self, SiteKitError::Authentication(_))
    }

    /// Check if this error is a per-file copy/upload failure
    pub fn is_transfer_error(&self) -> bool {
        matches!(self, SiteKitError::Transfer { .. } | SiteKitError::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_io_error_automatic_conversion() {
        let io_error = IoError::new(ErrorKind::NotFound, "file not found");
        let err: SiteKitError = io_error.into();

        assert!(matches!(err, SiteKitError::Io(_)));
        assert!(err.to_string().contains("IO error"));
        assert!(err.is_transfer_error());
    }

    #[test]
    fn test_io_error_from_function() {
        fn returns_io_error() -> Result<(), SiteKitError> {
            let _file = std::fs::File::open("/nonexistent/path/file.txt")?;
            Ok(())
        }

        let result = returns_io_error();
        assert!(matches!(result.unwrap_err(), SiteKitError::Io(_)));
    }

    #[test]
    fn test_config_error() {
        let error = SiteKitError::Config("unknown sync mode 'serve'".to_string());
        assert!(error.to_string().contains("Configuration error"));
        assert!(error.to_string().contains("serve"));
        assert!(error.is_configuration_error());
        assert!(!error.is_transfer_error());
    }

    #[test]
    fn test_pattern_error_is_configuration_error() {
        let error = SiteKitError::Pattern {
            pattern: "src/[".to_string(),
            message: "unclosed character class".to_string(),
        };
        assert!(error.to_string().contains("src/["));
        assert!(error.is_configuration_error());
    }

    #[test]
    fn test_authentication_error() {
        let error = SiteKitError::Authentication("missing FTP_HOST_STAGING".to_string());
        assert!(error.to_string().contains("Authentication failed"));
        assert!(error.to_string().contains("FTP_HOST_STAGING"));
        assert!(error.is_authentication_error());
        assert!(!error.is_configuration_error());
    }

    #[test]
    fn test_transfer_helper_records_path_and_cause() {
        let error = SiteKitError::transfer("dist/app.js", "550 Permission denied");
        assert!(error.is_transfer_error());
        let text = error.to_string();
        assert!(text.contains("dist/app.js"));
        assert!(text.contains("550 Permission denied"));
    }

    #[test]
    fn test_result_propagation() {
        fn inner_function() -> Result<(), SiteKitError> {
            Err(SiteKitError::Watch("inotify limit reached".to_string()))
        }

        fn outer_function() -> Result<(), SiteKitError> {
            inner_function()?;
            Ok(())
        }

        assert!(matches!(
            outer_function().unwrap_err(),
            SiteKitError::Watch(_)
        ));
    }
}
