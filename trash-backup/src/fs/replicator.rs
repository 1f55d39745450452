//! Content-level copy of a file or a whole directory tree.
//!
//! Only names, structure and bytes are carried over. Permissions, timestamps
//! and symlinks are not preserved. Links are not followed while walking a
//! tree: a link to a file is copied as that file's content, a link to a
//! directory fails the copy. Nothing is rolled back when a copy fails half way.

use crate::error::ReplicateError;
use std::fs::File;
use std::path::Path;
use walkdir::WalkDir;

/// Copy `source` to `destination`.
///
/// A regular file is streamed into a created (or truncated) destination file.
/// A directory is walked depth-first in file name order; each directory is
/// created with its parents before its children are copied. The first failure
/// aborts the walk and is returned, leaving already copied entries in place.
pub fn replicate(source: &Path, destination: &Path) -> Result<(), ReplicateError> {
    let metadata = std::fs::metadata(source).map_err(|e| ReplicateError::Stat {
        path: source.to_path_buf(),
        source: e,
    })?;

    if metadata.is_dir() {
        replicate_dir(source, destination)
    } else {
        copy_file(source, destination)
    }
}

fn replicate_dir(source: &Path, destination: &Path) -> Result<(), ReplicateError> {
    let walker = WalkDir::new(source)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| ReplicateError::Walk {
            path: e.path().unwrap_or(source).to_path_buf(),
            source: e,
        })?;

        let relative = entry.path().strip_prefix(source).unwrap_or(entry.path());
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).map_err(|e| ReplicateError::CreateDir {
                path: target.clone(),
                source: e,
            })?;
        } else {
            copy_file(entry.path(), &target)?;
        }
    }

    Ok(())
}

fn copy_file(source: &Path, destination: &Path) -> Result<(), ReplicateError> {
    let copy_err = |e| ReplicateError::CopyFile {
        from: source.to_path_buf(),
        to: destination.to_path_buf(),
        source: e,
    };

    let mut from = File::open(source).map_err(copy_err)?;
    let mut to = File::create(destination).map_err(copy_err)?;
    std::io::copy(&mut from, &mut to).map_err(copy_err)?;
    Ok(())
}
