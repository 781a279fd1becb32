//! Vacated directory reclaimer.
//!
//! After files move out of a directory, the directory and its newly-empty
//! ancestors are removed, walking upward until the uploads root or the
//! first non-empty directory.

use crate::store::UploadsLayout;
use crate::utils::fs as fsutil;
use std::path::Path;

/// Remove a vacated directory and recurse into its parent.
///
/// A directory is removed only if it exists, is a directory, is empty, and
/// is not the uploads root. A failed removal is logged and stops the upward
/// walk for this branch. Returns the number of directories removed.
pub fn reclaim(directory: &Path, layout: &UploadsLayout) -> usize {
    let mut removed = 0;
    let mut current = directory.to_path_buf();

    loop {
        if layout.is_root(&current) || !current.starts_with(&layout.root) {
            break;
        }
        if !current.is_dir() {
            break;
        }
        match fsutil::is_dir_empty(&current) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                tracing::warn!("Cannot inspect directory {:?}: {}", current, e);
                break;
            }
        }

        if let Err(e) = std::fs::remove_dir(&current) {
            tracing::warn!("Cannot remove empty directory {:?}: {}", current, e);
            break;
        }
        tracing::debug!("Reclaimed empty directory: {:?}", current);
        removed += 1;

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => break,
        }
    }

    removed
}
