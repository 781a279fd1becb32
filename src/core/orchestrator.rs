//! Reorganization orchestrator.
//!
//! Coordinates the resolver, mover, metadata updater, reference rewriter
//! and directory reclaimer for a post's full media set, or for a batch of
//! posts, aggregating per-item outcomes into a summary. The preview variant
//! runs the resolver only, against a speculative post state.

use crate::core::{metadata, mover, reclaimer, resolver, rewriter};
use crate::models::attachment::MediaAttachment;
use crate::models::post::{OwningPost, PostStatus, Term};
use crate::models::result::{MoveOutcome, MoveResult, PostResults, ReorganizationSummary};
use crate::models::settings::Settings;
use crate::store::{ContentStore, UpdateOrigin, UploadsLayout};
use crate::{Error, Result};
use regex::Regex;

/// Status of one preview line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewStatus {
    /// Reorganizing now would move this file.
    WillMove,
    /// File already sits at its target.
    AlreadyOrganized,
    /// No target can be resolved.
    Skipped,
}

/// One row of a preview run.
#[derive(Debug, Clone)]
pub struct PreviewItem {
    /// Attachment ID.
    pub attachment_id: u64,
    /// Current relative path.
    pub current_path: String,
    /// Resolved relative target path. Empty when skipped.
    pub target_path: String,
    /// Row status.
    pub status: PreviewStatus,
}

/// Save-side trigger guard for hosts that reorganize on post save.
///
/// Rejects reorganizer-origin saves (the rewriter's own content save),
/// revisions, attachments themselves and anything not published.
pub fn should_reorganize_on_save(post: &OwningPost, origin: UpdateOrigin) -> bool {
    if origin == UpdateOrigin::Reorganizer {
        return false;
    }
    if post.post_type == "revision" || post.post_type == "attachment" {
        return false;
    }
    post.status == PostStatus::Publish
}

/// Drives the per-attachment pipeline over posts.
pub struct Reorganizer<'a, S: ContentStore> {
    store: &'a mut S,
    settings: Settings,
    layout: UploadsLayout,
    url_pattern: Regex,
}

impl<'a, S: ContentStore> Reorganizer<'a, S> {
    /// Create a reorganizer over a store. Services are passed in explicitly;
    /// there is no ambient lookup.
    pub fn new(store: &'a mut S, settings: Settings, layout: UploadsLayout) -> Self {
        let url_pattern = Regex::new(&format!(
            r#"{}/([^\s"'<>)]+)"#,
            regex::escape(layout.base_url.trim_end_matches('/'))
        ))
        .expect("escaped base URL forms a valid pattern");

        Self {
            store,
            settings,
            layout,
            url_pattern,
        }
    }

    /// Reorganize the media sets of the given posts.
    ///
    /// Every attempted attachment lands in the summary with exactly one
    /// outcome. A failure inside one post's processing becomes a failed
    /// item and the batch moves on to the next post.
    pub fn reorganize(&mut self, post_ids: &[u64]) -> ReorganizationSummary {
        let mut summary = ReorganizationSummary::new();
        for &post_id in post_ids {
            summary.posts.push(self.reorganize_post(post_id));
        }

        tracing::info!(
            "Reorganization run {}: {} moved, {} already organized, {} skipped, {} failed",
            summary.run_id,
            summary.moved(),
            summary.already_organized(),
            summary.skipped(),
            summary.failed()
        );
        summary
    }

    /// Reorganize a single post's media set.
    pub fn reorganize_post(&mut self, post_id: u64) -> PostResults {
        let post = match self.store.post(post_id) {
            Some(post) => post,
            None => {
                return PostResults {
                    post_id,
                    post_title: String::new(),
                    results: vec![],
                    error: Some(Error::PostNotFound(post_id).to_string()),
                }
            }
        };

        let mut results = Vec::new();
        for attachment_id in self.media_for_post(&post) {
            results.push(self.process_attachment(&post, attachment_id));
        }

        PostResults {
            post_id,
            post_title: post.title,
            results,
            error: None,
        }
    }

    /// Resolver-only preview against a speculative post state.
    ///
    /// Overrides replace the slug and the first term of the configured
    /// taxonomy before resolving. Nothing is mutated.
    pub fn preview(
        &self,
        post_id: u64,
        slug_override: Option<&str>,
        term_override: Option<&str>,
    ) -> Result<Vec<PreviewItem>> {
        let mut post = self.store.post(post_id).ok_or(Error::PostNotFound(post_id))?;

        if let Some(slug) = slug_override {
            post.slug = slug.to_string();
        }
        if let Some(term_slug) = term_override {
            if !self.settings.taxonomy_name.is_empty() {
                post.terms.insert(
                    self.settings.taxonomy_name.clone(),
                    vec![Term {
                        id: 0,
                        name: term_slug.to_string(),
                        slug: term_slug.to_string(),
                    }],
                );
            }
        }

        let mut items = Vec::new();
        for attachment_id in self.media_for_post(&post) {
            let attachment = match self.store.attachment(attachment_id) {
                Some(attachment) => attachment,
                None => continue,
            };
            let current = resolver::normalize(&attachment.file);

            let item = match resolver::resolve(
                attachment.file_name(),
                &post,
                &self.settings,
                self.layout.date_folders,
            ) {
                Ok(target) if resolver::paths_equal(&current, &target) => PreviewItem {
                    attachment_id,
                    current_path: current,
                    target_path: target,
                    status: PreviewStatus::AlreadyOrganized,
                },
                Ok(target) => PreviewItem {
                    attachment_id,
                    current_path: current,
                    target_path: target,
                    status: PreviewStatus::WillMove,
                },
                Err(_) => PreviewItem {
                    attachment_id,
                    current_path: current,
                    target_path: String::new(),
                    status: PreviewStatus::Skipped,
                },
            };
            items.push(item);
        }
        Ok(items)
    }

    /// Enumerate a post's media set: attached files, the featured image,
    /// then in-body references, deduplicated in first-seen order.
    fn media_for_post(&self, post: &OwningPost) -> Vec<u64> {
        let mut ids = self.store.attachments_of(post.id);

        if let Some(featured) = post.featured_image {
            if !ids.contains(&featured) {
                ids.push(featured);
            }
        }

        for id in self.referenced_attachments(&post.content) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }

        ids
    }

    /// Resolve media URLs inside post content back to attachment IDs.
    ///
    /// Size-variant URLs (`photo-300x200.jpg`) resolve to the attachment
    /// owning the base file.
    fn referenced_attachments(&self, content: &str) -> Vec<u64> {
        let mut ids = Vec::new();
        for capture in self.url_pattern.captures_iter(content) {
            let raw = capture[1].trim_end_matches(['.', ',', ';']);
            let relative = raw.split(['?', '#']).next().unwrap_or(raw);
            let relative = relative.replace("&amp;", "&");

            let id = self
                .store
                .attachment_by_file(&relative)
                .or_else(|| self.store.attachment_by_file(&strip_size_suffix(&relative)));

            if let Some(id) = id {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        ids
    }

    /// Run the full pipeline for one attachment. Never panics the batch;
    /// every path ends in exactly one outcome.
    fn process_attachment(&mut self, post: &OwningPost, attachment_id: u64) -> MoveResult {
        // Re-fetch: earlier items in the batch may have touched this record.
        let attachment = match self.store.attachment(attachment_id) {
            Some(attachment) => attachment,
            None => {
                return MoveResult {
                    attachment_id,
                    outcome: MoveOutcome::Skipped,
                    current_path: String::new(),
                    target_path: String::new(),
                    message: Some(Error::AttachmentNotFound(attachment_id).to_string()),
                }
            }
        };

        let current = resolver::normalize(&attachment.file);

        let target = match resolver::resolve(
            attachment.file_name(),
            post,
            &self.settings,
            self.layout.date_folders,
        ) {
            Ok(target) => target,
            Err(e) => {
                return MoveResult {
                    attachment_id,
                    outcome: MoveOutcome::Skipped,
                    current_path: current,
                    target_path: String::new(),
                    message: Some(e.to_string()),
                }
            }
        };

        if resolver::paths_equal(&current, &target) {
            return MoveResult {
                attachment_id,
                outcome: MoveOutcome::AlreadyOrganized,
                current_path: current,
                target_path: target,
                message: None,
            };
        }

        match self.relocate(post, &attachment, &current, &target) {
            Ok(()) => MoveResult {
                attachment_id,
                outcome: MoveOutcome::Moved,
                current_path: current,
                target_path: target,
                message: None,
            },
            Err(e) => MoveResult {
                attachment_id,
                outcome: MoveOutcome::Failed,
                current_path: current,
                target_path: target,
                message: Some(e.to_string()),
            },
        }
    }

    /// The move/update/rewrite/reclaim unit for one attachment.
    fn relocate(
        &mut self,
        post: &OwningPost,
        attachment: &MediaAttachment,
        old_relative: &str,
        new_relative: &str,
    ) -> Result<()> {
        let moved = mover::move_attachment(&self.layout, attachment, new_relative)?;
        for name in &moved.failed_variants {
            tracing::warn!(
                "Attachment {}: size variant {} left behind",
                attachment.id,
                name
            );
        }

        metadata::apply_move(self.store, attachment.id, new_relative)?;

        rewriter::rewrite_references(
            self.store,
            &self.layout,
            Some(post.id),
            attachment,
            old_relative,
            new_relative,
        )?;

        let vacated = self.layout.absolute(old_relative);
        if let Some(old_dir) = vacated.parent() {
            reclaimer::reclaim(old_dir, &self.layout);
        }

        Ok(())
    }
}

/// Strip a `-WxH` size suffix from a relative path's filename.
fn strip_size_suffix(relative: &str) -> String {
    // photo-300x200.jpg -> photo.jpg
    let pattern = Regex::new(r"-\d+x\d+(\.[A-Za-z0-9]+)$").expect("static pattern is valid");
    pattern.replace(relative, "$1").into_owned()
}
