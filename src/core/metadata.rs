//! Attachment metadata updater.
//!
//! Rewrites the stored file location of an attachment after its files were
//! physically moved. Must only run once the mover has confirmed the primary
//! file move; metadata is never updated for a file that was not moved.

use crate::store::ContentStore;
use crate::{Error, Result};

/// Point an attachment's stored primary path at its new location.
///
/// Size-variant entries hold directory-relative filenames, so they follow
/// the primary path and need no rewriting of their own.
pub fn apply_move<S: ContentStore>(
    store: &mut S,
    attachment_id: u64,
    new_relative: &str,
) -> Result<()> {
    // Re-fetch: the record may have changed since the batch started.
    let attachment = store
        .attachment(attachment_id)
        .ok_or(Error::AttachmentNotFound(attachment_id))?;

    let old_relative = attachment.file;
    store.update_attachment_file(attachment_id, new_relative)?;

    tracing::info!(
        "Attachment {} metadata updated: {} -> {}",
        attachment_id,
        old_relative,
        new_relative
    );
    Ok(())
}
