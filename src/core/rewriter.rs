//! Content reference rewriter.
//!
//! After a move, every reference to an attachment's old URL must point at
//! the new one: in the owning post's body and in any metadata value across
//! the system. References may appear scheme-swapped, HTML-entity-encoded or
//! percent-encoded, so replacement works on a cross-product of variants.

use crate::models::attachment::MediaAttachment;
use crate::store::{ContentStore, MetaValue, UpdateOrigin, UploadsLayout};
use crate::Result;

/// Old/new URL replacement pairs across encoding variants.
///
/// For each old-URL form (as-is and scheme-swapped) and each encoding
/// (raw, HTML-entity, percent), the matching new URL carries the same
/// encoding but always the canonical scheme. Pairs that would replace a
/// string with itself are dropped.
pub fn variant_pairs(old_url: &str, new_url: &str) -> Vec<(String, String)> {
    let old_forms = [old_url.to_string(), swap_scheme(old_url)];

    let mut pairs: Vec<(String, String)> = Vec::new();
    for old in &old_forms {
        for (old_encoded, new_encoded) in [
            (old.clone(), new_url.to_string()),
            (entity_encode(old), entity_encode(new_url)),
            (percent_encode(old), percent_encode(new_url)),
        ] {
            if old_encoded != new_encoded && !pairs.iter().any(|(o, _)| *o == old_encoded) {
                pairs.push((old_encoded, new_encoded));
            }
        }
    }
    pairs
}

fn swap_scheme(url: &str) -> String {
    if let Some(rest) = url.strip_prefix("https://") {
        format!("http://{}", rest)
    } else if let Some(rest) = url.strip_prefix("http://") {
        format!("https://{}", rest)
    } else {
        url.to_string()
    }
}

fn entity_encode(url: &str) -> String {
    url.replace('&', "&amp;")
}

fn percent_encode(url: &str) -> String {
    urlencoding::encode(url).into_owned()
}

/// Replace every old variant in a text. Returns the rewritten text and the
/// number of replacements made.
pub fn rewrite_text(text: &str, pairs: &[(String, String)]) -> (String, usize) {
    let mut result = text.to_string();
    let mut replaced = 0;

    for (old, new) in pairs {
        let count = result.matches(old.as_str()).count();
        if count > 0 {
            result = result.replace(old.as_str(), new);
            replaced += count;
        }
    }

    (result, replaced)
}

/// Recursive visitor over a metadata value: rewrites string leaves only,
/// leaving numbers, booleans and container shapes untouched. Returns the
/// number of replacements made.
pub fn rewrite_meta_value(value: &mut MetaValue, pairs: &[(String, String)]) -> usize {
    match value {
        MetaValue::Str(s) => {
            let (rewritten, replaced) = rewrite_text(s, pairs);
            if replaced > 0 {
                *s = rewritten;
            }
            replaced
        }
        MetaValue::List(items) => items
            .iter_mut()
            .map(|item| rewrite_meta_value(item, pairs))
            .sum(),
        MetaValue::Map(entries) => entries
            .values_mut()
            .map(|entry| rewrite_meta_value(entry, pairs))
            .sum(),
        _ => 0,
    }
}

/// URLs trivially equal after trailing-slash normalization.
fn urls_equivalent(a: &str, b: &str) -> bool {
    a.trim_end_matches('/') == b.trim_end_matches('/')
}

/// Rewrite every reference to an attachment's old location.
///
/// Builds replacement pairs for the primary file and each sibling file
/// (variants keep their filename, only the directory changes), rewrites the
/// owning post's content, then walks every metadata record in the system.
/// The post save carries [`UpdateOrigin::Reorganizer`] so save-side triggers
/// do not re-enter reorganization.
pub fn rewrite_references<S: ContentStore>(
    store: &mut S,
    layout: &UploadsLayout,
    owner_post_id: Option<u64>,
    attachment: &MediaAttachment,
    old_relative: &str,
    new_relative: &str,
) -> Result<usize> {
    if urls_equivalent(old_relative, new_relative) {
        return Ok(0);
    }

    let old_dir = dir_of(old_relative);
    let new_dir = dir_of(new_relative);

    let mut pairs = variant_pairs(
        &layout.url_for(old_relative),
        &layout.url_for(new_relative),
    );
    for name in attachment.sibling_files() {
        pairs.extend(variant_pairs(
            &layout.url_for(&join(old_dir, name)),
            &layout.url_for(&join(new_dir, name)),
        ));
    }

    let mut total = 0;

    if let Some(post_id) = owner_post_id {
        if let Some(post) = store.post(post_id) {
            let (content, replaced) = rewrite_text(&post.content, &pairs);
            if replaced > 0 {
                store.update_post_content(post_id, content, UpdateOrigin::Reorganizer)?;
                total += replaced;
            }
        }
    }

    for record in store.meta_records() {
        let touches_old = pairs.iter().any(|(old, _)| record.value.contains_str(old));
        if !touches_old {
            continue;
        }
        let mut value = record.value.clone();
        let replaced = rewrite_meta_value(&mut value, &pairs);
        if replaced > 0 {
            store.set_meta(record.owner, &record.key, value)?;
            total += replaced;
        }
    }

    if total > 0 {
        tracing::info!(
            "Rewrote {} reference(s): {} -> {}",
            total,
            old_relative,
            new_relative
        );
    }
    Ok(total)
}

fn dir_of(relative: &str) -> &str {
    match relative.rfind('/') {
        Some(idx) => &relative[..idx],
        None => "",
    }
}

fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", dir, name)
    }
}
