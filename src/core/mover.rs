//! Physical file mover.
//!
//! Moves an attachment's primary file and its size variants between
//! uploads-relative locations. Re-running a finished move converges to a
//! no-op, and a differing file at the destination is never overwritten.

use crate::models::attachment::MediaAttachment;
use crate::store::UploadsLayout;
use crate::utils::fs as fsutil;
use crate::{Error, Result};
use std::path::Path;

/// How a requested move was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDisposition {
    /// The file was physically relocated.
    Relocated,
    /// The destination already held the file and the source was gone.
    AlreadyMoved,
    /// The destination held an identical copy; the source was deleted.
    DedupedSource,
}

/// Move one file according to the collision decision table:
///
/// | source | destination | identical | action                        |
/// |--------|-------------|-----------|-------------------------------|
/// | no     | no          | -         | error: source missing         |
/// | no     | yes         | -         | already moved, no-op          |
/// | yes    | yes         | yes       | delete source (dedup)         |
/// | yes    | yes         | no        | error: conflict, touch nothing|
/// | yes    | no          | -         | mkdir -p, rename or copy+del  |
pub fn move_file(from: &Path, to: &Path) -> Result<MoveDisposition> {
    let source_exists = from.exists();
    let dest_exists = to.exists();

    if !source_exists {
        if dest_exists {
            tracing::debug!("Already moved: {:?}", to);
            return Ok(MoveDisposition::AlreadyMoved);
        }
        return Err(Error::SourceMissing(from.display().to_string()));
    }

    if dest_exists {
        if fsutil::files_identical(from, to)? {
            std::fs::remove_file(from)?;
            tracing::debug!("Deduplicated: removed source {:?}", from);
            return Ok(MoveDisposition::DedupedSource);
        }
        return Err(Error::DestinationConflict(to.display().to_string()));
    }

    if let Some(parent) = to.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    fsutil::move_file(from, to)?;

    // A rename over some network filesystems can report success while the
    // source entry lingers. Retry the deletion once.
    if from.exists() {
        if let Err(e) = std::fs::remove_file(from) {
            tracing::warn!("Source still present after move, delete failed: {:?}: {}", from, e);
        }
    }

    tracing::debug!("Moved: {:?} -> {:?}", from, to);
    Ok(MoveDisposition::Relocated)
}

/// Outcome of moving an attachment's whole file set.
#[derive(Debug, Clone)]
pub struct AttachmentMove {
    /// How the primary file move was satisfied.
    pub primary: MoveDisposition,
    /// Size-variant filenames that could not be moved.
    pub failed_variants: Vec<String>,
}

/// Move an attachment's primary file and every sibling (size variants and
/// the pre-scaled original) from its current directory to the directory of
/// `new_relative`.
///
/// The primary file move is authoritative: its failure fails the whole
/// operation before anything else is touched. Sibling moves are best-effort;
/// failures are logged and reported but do not revert the primary move.
pub fn move_attachment(
    layout: &UploadsLayout,
    attachment: &MediaAttachment,
    new_relative: &str,
) -> Result<AttachmentMove> {
    let old_abs = layout.absolute(&attachment.file);
    let new_abs = layout.absolute(new_relative);

    let primary = move_file(&old_abs, &new_abs)?;

    let old_dir = old_abs.parent().map(Path::to_path_buf);
    let new_dir = new_abs.parent().map(Path::to_path_buf);

    let mut failed_variants = Vec::new();
    if let (Some(old_dir), Some(new_dir)) = (old_dir, new_dir) {
        for name in attachment.sibling_files() {
            match move_file(&old_dir.join(name), &new_dir.join(name)) {
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Size variant move failed for {}: {}", name, e);
                    failed_variants.push(name.to_string());
                }
            }
        }
    }

    Ok(AttachmentMove {
        primary,
        failed_variants,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_source_missing_both_absent() {
        let temp_dir = TempDir::new().unwrap();
        let result = move_file(
            &temp_dir.path().join("gone.jpg"),
            &temp_dir.path().join("target.jpg"),
        );
        assert!(matches!(result, Err(Error::SourceMissing(_))));
    }

    #[test]
    fn test_already_moved_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let to = temp_dir.path().join("target.jpg");
        std::fs::write(&to, b"content").unwrap();

        let disposition = move_file(&temp_dir.path().join("gone.jpg"), &to).unwrap();
        assert_eq!(disposition, MoveDisposition::AlreadyMoved);
        assert_eq!(std::fs::read(&to).unwrap(), b"content");
    }

    #[test]
    fn test_identical_destination_dedups() {
        let temp_dir = TempDir::new().unwrap();
        let from = temp_dir.path().join("source.jpg");
        let to = temp_dir.path().join("target.jpg");
        std::fs::write(&from, b"same").unwrap();
        std::fs::write(&to, b"same").unwrap();

        let disposition = move_file(&from, &to).unwrap();
        assert_eq!(disposition, MoveDisposition::DedupedSource);
        assert!(!from.exists());
        assert!(to.exists());
    }

    #[test]
    fn test_conflict_touches_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let from = temp_dir.path().join("source.jpg");
        let to = temp_dir.path().join("target.jpg");
        std::fs::write(&from, b"mine").unwrap();
        std::fs::write(&to, b"theirs").unwrap();

        let result = move_file(&from, &to);
        assert!(matches!(result, Err(Error::DestinationConflict(_))));
        assert_eq!(std::fs::read(&from).unwrap(), b"mine");
        assert_eq!(std::fs::read(&to).unwrap(), b"theirs");
    }

    #[test]
    fn test_plain_move_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let from = temp_dir.path().join("source.jpg");
        let to = temp_dir.path().join("a/b/c/target.jpg");
        std::fs::write(&from, b"payload").unwrap();

        let disposition = move_file(&from, &to).unwrap();
        assert_eq!(disposition, MoveDisposition::Relocated);
        assert!(!from.exists());
        assert_eq!(std::fs::read(&to).unwrap(), b"payload");
    }
}
