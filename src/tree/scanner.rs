//! Single-directory listing

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ScanError;

/// One named entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub path: PathBuf,
}

/// The immediate entries of one directory, split by kind and sorted by name.
#[derive(Debug, Default)]
pub struct Listing {
    pub subdirs: Vec<Entry>,
    pub files: Vec<Entry>,
}

/// List the immediate entries of `path` without recursing.
///
/// Entries are classified by their own file type, so symlinks are never
/// followed and always land in `files`.
pub fn scan(path: &Path) -> Result<Listing, ScanError> {
    let read_dir = fs::read_dir(path).map_err(|e| ScanError::not_readable(path, e))?;

    let mut listing = Listing::default();
    for entry in read_dir {
        let entry = entry.map_err(|e| ScanError::not_readable(path, e))?;
        let file_type = match entry.file_type() {
            Ok(t) => t,
            Err(e) => {
                debug!(path = %entry.path().display(), error = %e, "skipping entry of unknown type");
                continue;
            }
        };

        let item = Entry {
            name: entry.file_name().to_string_lossy().to_string(),
            path: entry.path(),
        };
        if file_type.is_dir() {
            listing.subdirs.push(item);
        } else {
            listing.files.push(item);
        }
    }

    // Lossy names may tie, so break ties on the raw path.
    listing.subdirs.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));
    listing.files.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));
    Ok(listing)
}
