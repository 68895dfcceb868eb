//! Remote transfer session abstraction

use super::credentials::Credentials;
use crate::types::SiteKitError;
use std::path::{Component, Path};

/// One connection to a deployment target.
///
/// A session is created unconnected, connected once, used for any number of
/// directory/upload calls and closed exactly once by its owner.
pub trait TransferSession {
    /// Open and authenticate the connection.
    fn connect(&mut self, credentials: &Credentials) -> Result<(), SiteKitError>;

    /// Create `remote_dir` and any missing parents.
    fn ensure_dir(&mut self, remote_dir: &str) -> Result<(), SiteKitError>;

    /// Upload `local` to `remote_path`, overwriting any existing file.
    fn upload(&mut self, local: &Path, remote_path: &str) -> Result<(), SiteKitError>;

    /// Tear down the connection. Must be safe to call on a session that never
    /// connected.
    fn close(&mut self);
}

/// Remote path for a file: `relative` joined onto `remote_dir` with `/`
/// separators.
///
/// ```
/// use sitekit::deploy::remote_path;
/// use std::path::Path;
///
/// assert_eq!(remote_path("/www/", Path::new("css/site.css")), "/www/css/site.css");
/// ```
pub fn remote_path(remote_dir: &str, relative: &Path) -> String {
    let segments: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().replace('\\', "/")),
            _ => None,
        })
        .collect();
    let tail = segments.join("/");

    let dir = remote_dir.replace('\\', "/");
    let absolute = dir.starts_with('/');
    let dir = dir.trim_end_matches('/');

    if dir.is_empty() || dir == "." {
        if absolute {
            format!("/{}", tail)
        } else {
            tail
        }
    } else if tail.is_empty() {
        dir.to_string()
    } else {
        format!("{}/{}", dir, tail)
    }
}

/// Parent directory of a remote path (`"."` for a bare file name).
pub fn remote_parent(remote_path: &str) -> &str {
    match remote_path.rsplit_once('/') {
        Some(("", _)) => "/",
        Some((parent, _)) => parent,
        None => ".",
    }
}
