//! Reorganize command implementation.
//!
//! Runs the full pipeline over the selected posts, saves the library,
//! parks the summary in the transient store and prints it.

use crate::core::orchestrator::Reorganizer;
use crate::models::config::Config;
use crate::models::result::{MoveOutcome, ReorganizationSummary};
use crate::store::{ContentStore, Library, TransientStore};
use crate::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Reorganize the media of the given posts (or every post).
pub fn run(
    library: &mut Library,
    library_path: &Path,
    config: &Config,
    post_ids: &[u64],
    all: bool,
) -> Result<()> {
    println!("{}", "[REORG] Reorganizing uploads...".bold().cyan());
    println!();

    let post_ids: Vec<u64> = if all {
        library.post_ids()
    } else {
        post_ids.to_vec()
    };
    if post_ids.is_empty() {
        println!("{}", "Nothing to do: no posts selected.".yellow());
        return Ok(());
    }

    let settings = library.typed_settings()?;
    let layout = library.layout.clone();

    let pb = ProgressBar::new(post_ids.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut summary = ReorganizationSummary::new();
    {
        let mut reorganizer = Reorganizer::new(library, settings, layout);
        for &post_id in &post_ids {
            pb.set_message(format!("post {}", post_id));
            summary.posts.push(reorganizer.reorganize_post(post_id));
            pb.inc(1);
        }
    }
    pb.finish_with_message("Done!");
    println!();

    library.save(library_path)?;

    let transients = TransientStore::new(&config.transient_dir);
    if let Err(e) = transients.set(&summary.run_id, &summary) {
        tracing::warn!("Could not store run summary: {}", e);
    }

    print_summary(&summary);
    Ok(())
}

/// Print a run summary as categorized per-item lines.
pub fn print_summary(summary: &ReorganizationSummary) {
    println!("{}", "[Reorganization Summary]".bold().green());
    println!("  {} {}", "Moved:".bold(), summary.moved());
    println!("  {} {}", "Already organized:".bold(), summary.already_organized());
    println!("  {} {}", "Skipped:".bold(), summary.skipped());
    println!("  {} {}", "Failed:".bold(), summary.failed());
    println!();

    for post in &summary.posts {
        if post.results.is_empty() && post.error.is_none() {
            continue;
        }
        println!("{} {} ({})", "Post".bold(), post.post_id, post.post_title);
        if let Some(ref error) = post.error {
            println!("  {} {}", "failed:".red(), error);
        }
        for result in &post.results {
            let line = result.display_line();
            match result.outcome {
                MoveOutcome::Moved => println!("  {}", line.green()),
                MoveOutcome::AlreadyOrganized => println!("  {}", line),
                MoveOutcome::Skipped => println!("  {}", line.yellow()),
                MoveOutcome::Failed => println!("  {}", line.red()),
            }
        }
    }
}
