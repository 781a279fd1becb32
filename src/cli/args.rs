//! Command line argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Uploads Organizer - move media uploads into post-derived directories
#[derive(Parser, Debug)]
#[command(name = "uploads-organizer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the library file (default from config.toml)
    #[arg(short, long, global = true, value_name = "LIBRARY")]
    pub library: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reorganize the media of one or more posts
    Reorganize {
        /// Post IDs to reorganize
        #[arg(value_name = "POST_ID")]
        post_ids: Vec<u64>,

        /// Reorganize every post in the library
        #[arg(long, conflicts_with = "post_ids")]
        all: bool,
    },

    /// Preview target paths without touching anything
    Preview {
        /// Post ID to preview
        #[arg(value_name = "POST_ID")]
        post_id: u64,

        /// Resolve as if the post had this slug
        #[arg(long, value_name = "SLUG")]
        slug: Option<String>,

        /// Resolve as if the post's first term had this slug
        #[arg(long, value_name = "TERM")]
        term: Option<String>,
    },

    /// Show the summary stored by the last reorganization run
    Results {
        /// Run ID (defaults to the most recent run)
        #[arg(value_name = "RUN_ID")]
        run_id: Option<String>,
    },

    /// Check the uploads tree against the library
    Scan,

    /// Manage reorganization settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Show the current settings
    Show,

    /// Set a settings key
    Set {
        /// Setting key, e.g. use_post_type
        #[arg(value_name = "KEY")]
        key: String,

        /// New value, e.g. "1"
        #[arg(value_name = "VALUE")]
        value: String,
    },
}
