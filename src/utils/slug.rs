//! Slug utilities.

/// Slugify a title for use as a path segment.
///
/// Lowercases, maps whitespace and separators to hyphens, drops everything
/// that is not alphanumeric or a hyphen, and collapses hyphen runs.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_hyphen = true;

    for c in title.chars() {
        let mapped = match c {
            c if c.is_alphanumeric() => Some(c.to_lowercase().next().unwrap_or(c)),
            ' ' | '\t' | '\n' | '-' | '_' | '.' | '/' => None,
            _ => continue,
        };
        match mapped {
            Some(c) => {
                slug.push(c);
                last_hyphen = false;
            }
            None => {
                if !last_hyphen {
                    slug.push('-');
                    last_hyphen = true;
                }
            }
        }
    }

    slug.trim_end_matches('-').to_string()
}

/// Strip a trailing ` -N` deduplication suffix from a filename stem,
/// e.g. `photo-1.jpg` -> `photo.jpg`. Files without the suffix pass through.
pub fn strip_dedup_suffix(file_name: &str) -> String {
    let (stem, ext) = match file_name.rfind('.') {
        Some(idx) if idx > 0 => (&file_name[..idx], &file_name[idx..]),
        _ => (file_name, ""),
    };

    let stripped = match stem.rfind('-') {
        Some(idx) if idx > 0 && stem[idx + 1..].chars().all(|c| c.is_ascii_digit()) => {
            // Only a pure numeric tail counts; "photo-2x" keeps its name.
            if stem[idx + 1..].is_empty() {
                stem
            } else {
                &stem[..idx]
            }
        }
        _ => stem,
    };

    format!("{}{}", stripped, ext)
}
