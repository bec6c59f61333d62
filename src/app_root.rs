//! Application root resolution.

use crate::error::Violation;
use crate::options::SpawnOptions;
use std::path::{Path, PathBuf};

/// Canonicalize an application root and check it is a directory.
///
/// Relative paths resolve against the current working directory.
///
/// # Errors
///
/// - `AppRootEmpty` if path is empty
/// - `AppRootNotFound` if path doesn't exist
/// - `AppRootCanonicalizeFailed` for other canonicalization failures
/// - `AppRootNotDirectory` if path resolves to something other than a directory
pub fn check_app_root(path: &Path) -> Result<PathBuf, Violation> {
    if path.as_os_str().is_empty() {
        return Err(Violation::AppRootEmpty);
    }

    let canonical = std::fs::canonicalize(path).map_err(|e| {
        let path_str = path.display().to_string();
        match e.kind() {
            std::io::ErrorKind::NotFound => Violation::AppRootNotFound { path: path_str },
            _ => Violation::AppRootCanonicalizeFailed {
                path: path_str,
                reason: e.to_string(),
            },
        }
    })?;

    if !canonical.is_dir() {
        return Err(Violation::AppRootNotDirectory {
            path: canonical.display().to_string(),
        });
    }

    Ok(canonical)
}

impl SpawnOptions {
    /// Resolve `app_root` to a canonical directory path.
    ///
    /// See [`check_app_root`].
    pub fn resolve_app_root(&self) -> Result<PathBuf, Violation> {
        check_app_root(&self.app_root)
    }
}
