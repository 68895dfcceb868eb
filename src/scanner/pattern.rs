//! Glob-based file enumeration for copy and upload tasks

use crate::types::SiteKitError;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Resolve `pattern` into the sorted list of matching regular files.
///
/// Hidden files and directories are matched like any other entry.
/// Directories themselves are never returned. Any path matching one of the
/// `ignore` globs is dropped.
///
/// An empty result is not an error: callers treat "no files" as a no-op.
///
/// # Errors
/// * `SiteKitError::Pattern` if `pattern` or one of the ignore globs is invalid
pub fn enumerate(pattern: &str, ignore: &[String]) -> Result<Vec<PathBuf>, SiteKitError> {
    let ignore_set = compile_patterns(ignore)?;

    let options = glob::MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    let entries = glob::glob_with(pattern, options).map_err(|e| SiteKitError::Pattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => {
                if !path.is_file() {
                    continue;
                }
                if ignore_set.is_match(&path) {
                    debug!("Ignoring {}", path.display());
                    continue;
                }
                files.push(path);
            }
            Err(e) => {
                // Unreadable directories are skipped, not fatal
                warn!(
                    "Skipping {} while expanding '{}': {}",
                    e.path().display(),
                    pattern,
                    e.error()
                );
            }
        }
    }

    // glob walks in directory order; sort so deploy order is reproducible
    files.sort();
    Ok(files)
}

/// Compile ignore globs into a single matcher.
///
/// `*` does not cross path separators; use `**` for that.
pub fn compile_patterns(patterns: &[String]) -> Result<GlobSet, SiteKitError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|e| SiteKitError::Pattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
        builder.add(glob);
    }

    builder.build().map_err(|e| SiteKitError::Pattern {
        pattern: patterns.join(", "),
        message: e.to_string(),
    })
}

/// Path of `file` relative to `base`.
///
/// `./` segments are ignored on both sides, so `./src/a.txt` against `src`
/// yields `a.txt`.
pub fn relative_to(file: &Path, base: &Path) -> Result<PathBuf, SiteKitError> {
    let file = strip_cur_dir(file);
    let base = strip_cur_dir(base);

    file.strip_prefix(&base)
        .map(Path::to_path_buf)
        .map_err(|_| {
            SiteKitError::Config(format!(
                "{} is not located under base directory {}",
                file.display(),
                base.display()
            ))
        })
}

/// `path` without `.` components: `./dist/` and `dist` compare equal
pub(crate) fn strip_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
