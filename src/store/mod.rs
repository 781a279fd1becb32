//! Content store abstraction.
//!
//! The engine never owns post or attachment storage. It reads and mutates
//! records through the [`ContentStore`] contract, and every read must be
//! treated as potentially stale (re-fetch before mutating in long batches).

pub mod library;
pub mod transient;

use crate::models::attachment::MediaAttachment;
use crate::models::post::OwningPost;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub use library::Library;
pub use transient::TransientStore;

/// Who is saving a post.
///
/// Reorganizer-origin saves must not re-trigger reorganization, so the
/// marker travels with the save instead of living in a shared flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOrigin {
    /// A regular editor/author save.
    Editor,
    /// A save performed by the reorganizer while rewriting references.
    Reorganizer,
}

/// A metadata value: a tagged variant whose string leaves can carry URLs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<MetaValue>),
    Map(BTreeMap<String, MetaValue>),
}

impl MetaValue {
    /// Whether any string leaf contains the given substring.
    pub fn contains_str(&self, needle: &str) -> bool {
        match self {
            MetaValue::Str(s) => s.contains(needle),
            MetaValue::List(items) => items.iter().any(|v| v.contains_str(needle)),
            MetaValue::Map(entries) => entries.values().any(|v| v.contains_str(needle)),
            _ => false,
        }
    }
}

/// One stored metadata entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaRecord {
    /// Owning object ID (post or attachment).
    pub owner: u64,
    /// Meta key.
    pub key: String,
    /// Stored value.
    pub value: MetaValue,
}

/// Read/write contract the engine requires from the hosting system.
pub trait ContentStore {
    /// Fetch a post by ID.
    fn post(&self, id: u64) -> Option<OwningPost>;

    /// All post IDs, in stored order.
    fn post_ids(&self) -> Vec<u64>;

    /// Fetch an attachment by ID.
    fn attachment(&self, id: u64) -> Option<MediaAttachment>;

    /// IDs of attachments whose parent is the given post, in stored order.
    fn attachments_of(&self, post_id: u64) -> Vec<u64>;

    /// Look up an attachment by its primary relative file path.
    fn attachment_by_file(&self, relative: &str) -> Option<u64>;

    /// Rewrite an attachment's primary relative file path.
    fn update_attachment_file(&mut self, id: u64, relative: &str) -> Result<()>;

    /// Save new post content. The origin marker lets save-side triggers
    /// distinguish reorganizer writes from editor writes.
    fn update_post_content(&mut self, id: u64, content: String, origin: UpdateOrigin)
        -> Result<()>;

    /// Snapshot of every metadata record in the system.
    fn meta_records(&self) -> Vec<MetaRecord>;

    /// Replace a metadata value.
    fn set_meta(&mut self, owner: u64, key: &str, value: MetaValue) -> Result<()>;
}

/// Physical and URL layout of the uploads tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadsLayout {
    /// Uploads root directory on disk.
    pub root: PathBuf,
    /// Public base URL of the uploads root, without trailing slash.
    pub base_url: String,
    /// Whether year/month date folders are enabled site-wide.
    pub date_folders: bool,
}

impl UploadsLayout {
    /// Absolute path for an uploads-relative path.
    pub fn absolute(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Public URL for an uploads-relative path.
    pub fn url_for(&self, relative: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), relative)
    }

    /// Uploads-relative path for a URL under the base URL, with any query
    /// string or fragment stripped. None for foreign URLs.
    pub fn relative_from_url(&self, url: &str) -> Option<String> {
        let base = self.base_url.trim_end_matches('/');
        let rest = url.strip_prefix(base)?.strip_prefix('/')?;
        let rest = rest.split(['?', '#']).next().unwrap_or(rest);
        if rest.is_empty() {
            None
        } else {
            Some(rest.to_string())
        }
    }

    /// Whether a directory is the uploads root itself.
    pub fn is_root(&self, dir: &Path) -> bool {
        dir == self.root
    }
}
