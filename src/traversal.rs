//! Source directory traversal.
//!
//! Enumerates the candidate files of a run. Non-recursive runs consider only
//! the immediate children of the source directory; recursive runs descend
//! into every nested subdirectory. Directories themselves are never
//! candidates, and each run re-walks the filesystem from scratch.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::file_placer::{OrganizeError, OrganizeResult};

/// Collects candidate file paths under `source`, sorted by file name so
/// repeated runs report files in the same order.
///
/// # Errors
///
/// Returns `OrganizeError::SourceNotFound` before walking anything if
/// `source` is not an existing directory, and `OrganizeError::TraversalFailed`
/// if an entry cannot be read during the walk.
pub fn discover_files(source: &Path, recursive: bool) -> OrganizeResult<Vec<PathBuf>> {
    if !source.is_dir() {
        return Err(OrganizeError::SourceNotFound {
            path: source.to_path_buf(),
        });
    }

    let mut walker = WalkDir::new(source).min_depth(1).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| source.to_path_buf());
            OrganizeError::TraversalFailed {
                path,
                source: e.into(),
            }
        })?;

        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}
