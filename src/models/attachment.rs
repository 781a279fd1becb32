//! Attachment data models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A stored media file record.
///
/// Paths are relative to the uploads root and always use forward slashes,
/// e.g. `2024/03/photo.jpg`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaAttachment {
    /// Attachment ID.
    pub id: u64,
    /// Owning post ID. Attachments can be orphaned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<u64>,
    /// Primary file path, relative to the uploads root.
    pub file: String,
    /// Structured size-variant metadata.
    #[serde(default)]
    pub meta: AttachmentMeta,
}

/// Size-variant metadata attached to a media record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttachmentMeta {
    /// Size name -> variant, e.g. "thumbnail" -> photo-150x150.jpg.
    #[serde(default)]
    pub sizes: BTreeMap<String, SizeVariant>,
    /// Pre-scaled original filename, when the primary file is a scaled-down copy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_image: Option<String>,
}

/// A derived resized copy of the primary image.
///
/// The filename is relative to the primary file's directory, so variants
/// travel with the primary file when it moves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeVariant {
    /// Variant filename without any directory component.
    pub file: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl MediaAttachment {
    /// Directory component of the primary file path, relative to the uploads
    /// root. Empty string when the file sits directly in the root.
    pub fn dir(&self) -> &str {
        match self.file.rfind('/') {
            Some(idx) => &self.file[..idx],
            None => "",
        }
    }

    /// Filename component of the primary file path.
    pub fn file_name(&self) -> &str {
        match self.file.rfind('/') {
            Some(idx) => &self.file[idx + 1..],
            None => &self.file,
        }
    }

    /// All filenames that live alongside the primary file: size variants
    /// plus the pre-scaled original, deduplicated against the primary.
    pub fn sibling_files(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for variant in self.meta.sizes.values() {
            if variant.file != self.file_name() && !names.contains(&variant.file.as_str()) {
                names.push(&variant.file);
            }
        }
        if let Some(ref original) = self.meta.original_image {
            if original != self.file_name() && !names.contains(&original.as_str()) {
                names.push(original);
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment(file: &str) -> MediaAttachment {
        MediaAttachment {
            id: 1,
            parent: None,
            file: file.to_string(),
            meta: AttachmentMeta::default(),
        }
    }

    #[test]
    fn test_dir_and_file_name() {
        let a = attachment("2024/03/photo.jpg");
        assert_eq!(a.dir(), "2024/03");
        assert_eq!(a.file_name(), "photo.jpg");

        let root = attachment("photo.jpg");
        assert_eq!(root.dir(), "");
        assert_eq!(root.file_name(), "photo.jpg");
    }

    #[test]
    fn test_sibling_files_skips_primary_and_duplicates() {
        let mut a = attachment("2024/03/photo.jpg");
        a.meta.sizes.insert(
            "thumbnail".to_string(),
            SizeVariant {
                file: "photo-150x150.jpg".to_string(),
                width: 150,
                height: 150,
            },
        );
        a.meta.sizes.insert(
            "full".to_string(),
            SizeVariant {
                file: "photo.jpg".to_string(),
                width: 2000,
                height: 1000,
            },
        );
        a.meta.original_image = Some("photo-original.jpg".to_string());

        let siblings = a.sibling_files();
        assert_eq!(siblings, vec!["photo-150x150.jpg", "photo-original.jpg"]);
    }
}
