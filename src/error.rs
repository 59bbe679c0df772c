//! Error types for dirsnap
//!
//! None of these abort a run. They are collected while scanning and handed
//! back to the caller next to the tree, which decides how to report them.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// A path that could not be included in the snapshot.
#[derive(Error, Debug)]
pub enum ScanError {
    /// A directory exists but could not be listed (permissions, removed mid-scan, I/O).
    /// Its subtree resolves to empty.
    #[error("cannot read directory '{}': {source}", .path.display())]
    NotReadable { path: PathBuf, source: io::Error },

    /// A supplied root does not exist or cannot be accessed.
    /// The root is left out of the result.
    #[error("cannot access '{}': {source}", .path.display())]
    RootNotFound { path: PathBuf, source: io::Error },

    /// Two entries of one directory map to the same key even after escaping
    /// their raw names. The later entry is left out.
    #[error("duplicate entry name '{name}' in '{}'", .path.display())]
    NameCollision { path: PathBuf, name: String },
}

impl ScanError {
    pub fn not_readable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::NotReadable {
            path: path.into(),
            source,
        }
    }

    pub fn root_not_found(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::RootNotFound {
            path: path.into(),
            source,
        }
    }

    /// The path this error refers to.
    pub fn path(&self) -> &Path {
        match self {
            ScanError::NotReadable { path, .. } => path,
            ScanError::RootNotFound { path, .. } => path,
            ScanError::NameCollision { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_path() {
        let err = ScanError::not_readable(
            "some/dir",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("some/dir"), "message should name path: {}", msg);
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_path_accessor() {
        let err = ScanError::root_not_found("Z", io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(err.path(), Path::new("Z"));
        assert!(matches!(err, ScanError::RootNotFound { .. }));
    }
}
