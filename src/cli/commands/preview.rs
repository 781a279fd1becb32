//! Preview command implementation.
//!
//! Resolver-only dry view of where a post's media would land, optionally
//! against a candidate slug or term that is not saved yet.

use crate::core::orchestrator::{PreviewStatus, Reorganizer};
use crate::store::Library;
use crate::Result;
use colored::Colorize;

/// Preview target paths for one post.
pub fn run(
    library: &mut Library,
    post_id: u64,
    slug: Option<&str>,
    term: Option<&str>,
) -> Result<()> {
    println!("{}", "[PREVIEW] Resolving target paths...".bold().cyan());
    println!();

    let settings = library.typed_settings()?;
    let layout = library.layout.clone();
    let reorganizer = Reorganizer::new(library, settings, layout);
    let items = reorganizer.preview(post_id, slug, term)?;

    if items.is_empty() {
        println!("{}", "No media found for this post.".yellow());
        return Ok(());
    }

    for item in &items {
        match item.status {
            PreviewStatus::WillMove => println!(
                "  {} #{} {} -> {}",
                "move".green().bold(),
                item.attachment_id,
                item.current_path,
                item.target_path
            ),
            PreviewStatus::AlreadyOrganized => println!(
                "  {} #{} {}",
                "ok  ".bold(),
                item.attachment_id,
                item.current_path
            ),
            PreviewStatus::Skipped => println!(
                "  {} #{} {}",
                "skip".yellow().bold(),
                item.attachment_id,
                item.current_path
            ),
        }
    }

    let moves = items
        .iter()
        .filter(|i| i.status == PreviewStatus::WillMove)
        .count();
    println!();
    println!("  {} {} of {} file(s) would move", "Total:".bold(), moves, items.len());

    Ok(())
}
