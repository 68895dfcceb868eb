//! Atomic file copy implementation

use crate::types::SiteKitError;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

const COPY_BUFFER_SIZE: usize = 128 * 1024;

/// Copy a file atomically using the write-then-rename strategy
///
/// 1. Write to a sibling `<name>.part` file
/// 2. Flush and sync to disk
/// 3. Preserve metadata (permissions, mtime)
/// 4. Rename onto the final destination
///
/// Parent directories of `dest` are created as needed and an existing
/// `dest` is overwritten.
///
/// # Returns
/// * `Ok(u64)` - Number of bytes copied
/// * `Err(SiteKitError)` - IO error or other failure
///
/// # Example
/// ```no_run
/// use sitekit::executor::copy_file_atomic;
/// use std::path::Path;
///
/// let bytes = copy_file_atomic(Path::new("src/app.js"), Path::new("dist/app.js"))?;
/// # Ok::<(), sitekit::SiteKitError>(())
/// ```
pub fn copy_file_atomic(src: &Path, dest: &Path) -> Result<u64, SiteKitError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let part_path = part_path_for(dest);

    let result = write_part_file(src, &part_path).and_then(|bytes| {
        fs::rename(&part_path, dest)?;
        Ok(bytes)
    });

    if result.is_err() {
        // Leave no stale .part behind in the mirrored tree
        let _ = fs::remove_file(&part_path);
    }

    result
}

fn write_part_file(src: &Path, part_path: &Path) -> Result<u64, SiteKitError> {
    let mut src_file = File::open(src)?;
    let mut part_file = File::create(part_path)?;

    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = src_file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        part_file.write_all(&buffer[..bytes_read])?;
        total_bytes += bytes_read as u64;
    }

    part_file.sync_all()?;

    // Drop the file handle before rename (required on Windows)
    drop(part_file);

    let src_metadata = fs::metadata(src)?;
    fs::set_permissions(part_path, src_metadata.permissions())?;

    let mtime = filetime::FileTime::from_system_time(src_metadata.modified()?);
    filetime::set_file_mtime(part_path, mtime)?;

    Ok(total_bytes)
}

/// `dist/app.js` -> `dist/app.js.part`
fn part_path_for(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}
