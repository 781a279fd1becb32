//! Target path resolver.
//!
//! Pure computation of where an attachment's files belong, from the owning
//! post and the reorganization settings. Never touches the filesystem.
//!
//! Segment order is fixed:
//! `[post_type] / [taxonomy/term] / [year/month] / [identifier] / filename`.
//! Absent segments are skipped without leaving empty components.

use crate::models::post::OwningPost;
use crate::models::settings::{PostIdentifier, Settings};
use crate::utils::slug;
use crate::{Error, Result};

/// Ordered directory segments of a target path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathComponents {
    segments: Vec<String>,
}

impl PathComponents {
    /// Append a non-empty segment. Empty segments are dropped so joined
    /// paths never contain `//`.
    fn push(&mut self, segment: &str) {
        if !segment.is_empty() {
            self.segments.push(segment.to_string());
        }
    }

    /// Directory segments in order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Relative path for a filename under these segments.
    pub fn relative_path(&self, file_name: &str) -> String {
        if self.segments.is_empty() {
            file_name.to_string()
        } else {
            format!("{}/{}", self.segments.join("/"), file_name)
        }
    }
}

/// Compute the directory segments for an attachment owned by `post`.
pub fn resolve_components(
    post: &OwningPost,
    settings: &Settings,
    date_folders: bool,
) -> Result<PathComponents> {
    let mut components = PathComponents::default();

    if settings.allows_post_type(&post.post_type) {
        components.push(&post.post_type);
    }

    // Taxonomy segment is all-or-nothing: a term without a slug contributes
    // neither the taxonomy name nor the term.
    if !settings.taxonomy_name.is_empty() {
        if let Some(term) = post.first_term(&settings.taxonomy_name) {
            if !term.slug.is_empty() {
                components.push(&settings.taxonomy_name);
                components.push(&term.slug);
            }
        }
    }

    if date_folders {
        components.push(&post.date.format("%Y").to_string());
        components.push(&post.date.format("%m").to_string());
    }

    match settings.post_identifier {
        PostIdentifier::None => {}
        PostIdentifier::Id => components.push(&post.id.to_string()),
        PostIdentifier::Slug => {
            let identifier = if post.slug.is_empty() {
                // Drafts may not have a slug yet.
                slug::slugify(&post.title)
            } else {
                post.slug.clone()
            };
            if identifier.is_empty() {
                return Err(Error::UnresolvedPath(format!(
                    "post {} has neither slug nor title",
                    post.id
                )));
            }
            components.push(&identifier);
        }
    }

    Ok(components)
}

/// Resolve the full relative target path for an attachment file.
///
/// Deterministic: the same inputs always yield the same path.
pub fn resolve(
    file_name: &str,
    post: &OwningPost,
    settings: &Settings,
    date_folders: bool,
) -> Result<String> {
    if file_name.is_empty() {
        return Err(Error::UnresolvedPath(format!(
            "attachment of post {} has no filename",
            post.id
        )));
    }

    let components = resolve_components(post, settings, date_folders)?;
    let file_name = if settings.strip_dedup_suffix {
        slug::strip_dedup_suffix(file_name)
    } else {
        file_name.to_string()
    };

    Ok(components.relative_path(&file_name))
}

/// Compare two relative paths for the already-organized decision.
///
/// Exact comparison after normalizing backslashes to forward slashes and
/// trimming leading slashes. Case differences count as a real relocation.
pub fn paths_equal(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

/// Normalize a relative path to forward slashes with no leading slash.
pub fn normalize(path: &str) -> String {
    path.replace('\\', "/").trim_start_matches('/').to_string()
}
