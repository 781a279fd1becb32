//! JSON-file-backed content library.
//!
//! The shipping [`ContentStore`] implementation: a single JSON document
//! holding posts, attachments, metadata records, the uploads layout and the
//! settings map. The CLI loads it, runs the pipeline against it, and saves
//! it back.

use super::{ContentStore, MetaRecord, MetaValue, UpdateOrigin, UploadsLayout};
use crate::models::attachment::MediaAttachment;
use crate::models::post::OwningPost;
use crate::models::settings::Settings;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// Content library document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Library {
    /// Document format version.
    pub version: String,
    /// Uploads layout.
    pub layout: UploadsLayout,
    /// Raw settings map, parsed with [`Settings::from_map`].
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
    /// Posts.
    #[serde(default)]
    pub posts: Vec<OwningPost>,
    /// Attachments.
    #[serde(default)]
    pub attachments: Vec<MediaAttachment>,
    /// Metadata records across posts and attachments.
    #[serde(default)]
    pub meta: Vec<MetaRecord>,
}

impl Library {
    /// Load a library document from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::PathNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let library: Library = serde_json::from_str(&content)
            .map_err(|e| Error::InvalidLibraryFile(format!("{}: {}", path.display(), e)))?;
        Ok(library)
    }

    /// Save the library document to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = std::fs::File::create(path)?;
        file.write_all(json.as_bytes())?;

        tracing::info!("Library saved to {:?}", path);
        Ok(())
    }

    /// Parse the settings map into typed settings.
    pub fn typed_settings(&self) -> Result<Settings> {
        Settings::from_map(&self.settings)
    }

    fn attachment_mut(&mut self, id: u64) -> Result<&mut MediaAttachment> {
        self.attachments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(Error::AttachmentNotFound(id))
    }
}

impl ContentStore for Library {
    fn post(&self, id: u64) -> Option<OwningPost> {
        self.posts.iter().find(|p| p.id == id).cloned()
    }

    fn post_ids(&self) -> Vec<u64> {
        self.posts.iter().map(|p| p.id).collect()
    }

    fn attachment(&self, id: u64) -> Option<MediaAttachment> {
        self.attachments.iter().find(|a| a.id == id).cloned()
    }

    fn attachments_of(&self, post_id: u64) -> Vec<u64> {
        self.attachments
            .iter()
            .filter(|a| a.parent == Some(post_id))
            .map(|a| a.id)
            .collect()
    }

    fn attachment_by_file(&self, relative: &str) -> Option<u64> {
        self.attachments
            .iter()
            .find(|a| a.file == relative)
            .map(|a| a.id)
    }

    fn update_attachment_file(&mut self, id: u64, relative: &str) -> Result<()> {
        let attachment = self.attachment_mut(id)?;
        attachment.file = relative.to_string();
        Ok(())
    }

    fn update_post_content(
        &mut self,
        id: u64,
        content: String,
        origin: UpdateOrigin,
    ) -> Result<()> {
        let post = self
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(Error::PostNotFound(id))?;
        post.content = content;
        tracing::debug!("Post {} content updated (origin: {:?})", id, origin);
        Ok(())
    }

    fn meta_records(&self) -> Vec<MetaRecord> {
        self.meta.clone()
    }

    fn set_meta(&mut self, owner: u64, key: &str, value: MetaValue) -> Result<()> {
        match self
            .meta
            .iter_mut()
            .find(|record| record.owner == owner && record.key == key)
        {
            Some(record) => record.value = value,
            None => self.meta.push(MetaRecord {
                owner,
                key: key.to_string(),
                value,
            }),
        }
        Ok(())
    }
}
