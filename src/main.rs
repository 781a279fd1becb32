//! Uploads Organizer CLI
//!
//! A command-line tool for relocating a content library's media uploads
//! into directory structures derived from the owning post's metadata.

use clap::Parser;
use uploads_organizer::cli::{
    args::{Cli, Commands, SettingsAction},
    commands::{preview, reorganize, results, scan, settings},
};
use uploads_organizer::logging::{self, FileLogLayer};
use uploads_organizer::models::config;
use uploads_organizer::store::Library;

fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    let config = config::load_config();
    let library_path = cli
        .library
        .clone()
        .unwrap_or_else(|| config.library_path.clone());

    let mut library = Library::load(&library_path)?;
    let typed_settings = library.typed_settings()?;

    // Initialize logging: console layer plus the settings-gated file sink.
    let file_layer = match FileLogLayer::new(&config.log_file, &typed_settings.log_levels) {
        Ok(layer) => Some(layer),
        Err(e) => {
            eprintln!("warning: log file unavailable: {}", e);
            None
        }
    };
    logging::init(cli.verbose, file_layer);

    // Run the appropriate command
    match cli.command {
        Commands::Reorganize { post_ids, all } => {
            reorganize::run(&mut library, &library_path, &config, &post_ids, all)?;
        }

        Commands::Preview {
            post_id,
            slug,
            term,
        } => {
            preview::run(&mut library, post_id, slug.as_deref(), term.as_deref())?;
        }

        Commands::Results { run_id } => {
            results::run(&config, run_id.as_deref())?;
        }

        Commands::Scan => {
            scan::run(&library)?;
        }

        Commands::Settings { action } => match action {
            SettingsAction::Show => {
                settings::show(&library)?;
            }
            SettingsAction::Set { key, value } => {
                settings::set(&mut library, &library_path, &key, &value)?;
            }
        },
    }

    Ok(())
}
