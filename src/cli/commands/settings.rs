//! Settings command implementation.
//!
//! Shows and edits the library's settings map. Writes are validated by
//! parsing the updated map before saving.

use crate::models::settings::Settings;
use crate::store::Library;
use crate::{Error, Result};
use colored::Colorize;
use std::path::Path;

const KNOWN_KEYS: &[&str] = &[
    "use_post_type",
    "taxonomy_name",
    "post_identifier",
    "strip_dedup_suffix",
    "log_levels",
];

/// Show the current settings.
pub fn show(library: &Library) -> Result<()> {
    let settings = library.typed_settings()?;

    println!("{}", "[Settings]".bold());
    println!("  {} {}", "use_post_type:".bold(), settings.use_post_type);
    println!(
        "  {} {}",
        "taxonomy_name:".bold(),
        if settings.taxonomy_name.is_empty() {
            "(disabled)".to_string()
        } else {
            settings.taxonomy_name.clone()
        }
    );
    println!("  {} {:?}", "post_identifier:".bold(), settings.post_identifier);
    println!("  {} {}", "strip_dedup_suffix:".bold(), settings.strip_dedup_suffix);
    println!("  {} {}", "log_levels:".bold(), settings.log_levels.join(","));
    println!();
    println!("  {} {}", "date_folders (site-wide):".bold(), library.layout.date_folders);

    Ok(())
}

/// Set one settings key and save the library.
pub fn set(library: &mut Library, library_path: &Path, key: &str, value: &str) -> Result<()> {
    if !KNOWN_KEYS.contains(&key) {
        return Err(Error::InvalidSetting(format!(
            "unknown key {:?}, expected one of: {}",
            key,
            KNOWN_KEYS.join(", ")
        )));
    }

    let mut updated = library.settings.clone();
    updated.insert(key.to_string(), value.to_string());

    // Reject bad values before anything is persisted.
    Settings::from_map(&updated)?;

    library.settings = updated;
    library.save(library_path)?;

    println!("{} {} = {}", "[OK] Set".green(), key.bold(), value);
    Ok(())
}
