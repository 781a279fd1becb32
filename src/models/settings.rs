//! Reorganization settings.
//!
//! Settings live in the library document as a string key-value map and are
//! parsed into a typed structure before use. Recognized keys:
//! - `use_post_type`: "0" | "1"
//! - `taxonomy_name`: taxonomy to pull the term segment from, empty = disabled
//! - `post_identifier`: "none" | "slug" | "id"
//! - `strip_dedup_suffix`: "0" | "1"
//! - `log_levels`: comma-joined level names, e.g. "info,warn,error"

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Post types that may contribute a post-type path segment.
pub const ALLOWED_POST_TYPES: &[&str] = &["post", "page"];

/// Which post identifier ends the directory part of a target path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostIdentifier {
    /// No identifier segment. Paths may collide across posts.
    None,
    /// The post slug, falling back to a slugified title for drafts.
    Slug,
    /// The literal numeric post ID.
    Id,
}

/// Typed reorganization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Prepend a post-type segment for allowed post types.
    pub use_post_type: bool,
    /// Taxonomy supplying the term segment. Empty = disabled.
    pub taxonomy_name: String,
    /// Identifier segment mode.
    pub post_identifier: PostIdentifier,
    /// Strip `-N` dedup suffixes from the filename. Opt-in.
    pub strip_dedup_suffix: bool,
    /// Enabled log level names for the file log sink.
    pub log_levels: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            use_post_type: false,
            taxonomy_name: String::new(),
            post_identifier: PostIdentifier::None,
            strip_dedup_suffix: false,
            log_levels: vec!["warn".to_string(), "error".to_string()],
        }
    }
}

impl Settings {
    /// Parse settings from the library's string key-value map.
    ///
    /// Unrecognized keys are ignored so older library files keep loading.
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self> {
        let mut settings = Settings::default();

        if let Some(value) = map.get("use_post_type") {
            settings.use_post_type = parse_flag("use_post_type", value)?;
        }
        if let Some(value) = map.get("taxonomy_name") {
            settings.taxonomy_name = value.trim().to_string();
        }
        if let Some(value) = map.get("post_identifier") {
            settings.post_identifier = match value.trim() {
                "none" => PostIdentifier::None,
                "slug" => PostIdentifier::Slug,
                "id" => PostIdentifier::Id,
                other => {
                    return Err(Error::InvalidSetting(format!(
                        "post_identifier must be none, slug or id, got {:?}",
                        other
                    )))
                }
            };
        }
        if let Some(value) = map.get("strip_dedup_suffix") {
            settings.strip_dedup_suffix = parse_flag("strip_dedup_suffix", value)?;
        }
        if let Some(value) = map.get("log_levels") {
            settings.log_levels = value
                .split(',')
                .map(|level| level.trim().to_lowercase())
                .filter(|level| !level.is_empty())
                .collect();
        }

        Ok(settings)
    }

    /// Whether this post type gets a post-type segment.
    pub fn allows_post_type(&self, post_type: &str) -> bool {
        self.use_post_type && ALLOWED_POST_TYPES.contains(&post_type)
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim() {
        "0" => Ok(false),
        "1" => Ok(true),
        other => Err(Error::InvalidSetting(format!(
            "{} must be \"0\" or \"1\", got {:?}",
            key, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_map(&BTreeMap::new()).unwrap();
        assert!(!settings.use_post_type);
        assert!(settings.taxonomy_name.is_empty());
        assert_eq!(settings.post_identifier, PostIdentifier::None);
        assert!(!settings.strip_dedup_suffix);
    }

    #[test]
    fn test_parse_full_map() {
        let settings = Settings::from_map(&map(&[
            ("use_post_type", "1"),
            ("taxonomy_name", "category"),
            ("post_identifier", "slug"),
            ("log_levels", "info, warn,error"),
        ]))
        .unwrap();

        assert!(settings.use_post_type);
        assert_eq!(settings.taxonomy_name, "category");
        assert_eq!(settings.post_identifier, PostIdentifier::Slug);
        assert_eq!(settings.log_levels, vec!["info", "warn", "error"]);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Settings::from_map(&map(&[("use_post_type", "yes")])).is_err());
        assert!(Settings::from_map(&map(&[("post_identifier", "title")])).is_err());
    }

    #[test]
    fn test_allows_post_type() {
        let mut settings = Settings::default();
        settings.use_post_type = true;
        assert!(settings.allows_post_type("post"));
        assert!(settings.allows_post_type("page"));
        assert!(!settings.allows_post_type("revision"));

        settings.use_post_type = false;
        assert!(!settings.allows_post_type("post"));
    }
}
