//! Results command implementation.
//!
//! Shows the summary parked by a previous reorganization run and clears it.

use super::reorganize::print_summary;
use crate::models::config::Config;
use crate::store::TransientStore;
use crate::Result;
use colored::Colorize;

/// Show and consume a stored run summary.
pub fn run(config: &Config, run_id: Option<&str>) -> Result<()> {
    let transients = TransientStore::new(&config.transient_dir);

    let summary = match run_id {
        Some(key) => transients.take(key)?,
        None => transients.take_latest()?,
    };

    match summary {
        Some(summary) => {
            println!("{} {}", "Run:".bold(), summary.run_id);
            println!();
            print_summary(&summary);
        }
        None => {
            println!("{}", "No stored results (they expire after 30 seconds).".yellow());
        }
    }

    Ok(())
}
