//! Scan command implementation.
//!
//! Read-only check of the uploads tree against the library: reports
//! attachment files missing on disk and on-disk files no attachment claims.

use crate::store::Library;
use crate::utils::fs as fsutil;
use crate::Result;
use colored::Colorize;
use std::collections::HashSet;
use std::path::Path;
use walkdir::WalkDir;

/// Compare the uploads tree with the library's attachment records.
pub fn run(library: &Library) -> Result<()> {
    println!("{}", "[SCAN] Checking uploads tree...".bold().cyan());
    println!();

    let root = &library.layout.root;
    fsutil::ensure_directory(root)?;

    // Every path the library claims, relative to the uploads root.
    let mut claimed: HashSet<String> = HashSet::new();
    let mut missing: Vec<String> = Vec::new();

    for attachment in &library.attachments {
        let mut paths = vec![attachment.file.clone()];
        let dir = attachment.dir();
        for name in attachment.sibling_files() {
            if dir.is_empty() {
                paths.push(name.to_string());
            } else {
                paths.push(format!("{}/{}", dir, name));
            }
        }

        for relative in paths {
            if !library.layout.absolute(&relative).is_file() {
                missing.push(format!("#{} {}", attachment.id, relative));
            }
            claimed.insert(relative);
        }
    }

    // Walk the tree for files nothing claims.
    let mut orphans: Vec<String> = Vec::new();
    let mut total_files = 0usize;
    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        total_files += 1;
        if let Some(relative) = relative_to(root, entry.path()) {
            if !claimed.contains(&relative) {
                orphans.push(relative);
            }
        }
    }
    orphans.sort();
    missing.sort();

    println!("  {} {}", "Files on disk:".bold(), total_files);
    println!("  {} {}", "Attachment files:".bold(), claimed.len());
    println!();

    if missing.is_empty() && orphans.is_empty() {
        println!("{}", "[OK] Library and uploads tree agree".green());
        return Ok(());
    }

    if !missing.is_empty() {
        println!("{}", "[MISSING] Recorded but not on disk:".bold().red());
        for line in &missing {
            println!("  - {}", line);
        }
        println!();
    }

    if !orphans.is_empty() {
        println!("{}", "[ORPHAN] On disk but not recorded:".bold().yellow());
        for line in &orphans {
            println!("  - {}", line);
        }
    }

    Ok(())
}

/// Uploads-relative forward-slash path for an absolute path under root.
fn relative_to(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    Some(parts.join("/"))
}
