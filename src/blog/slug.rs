//! Slug derivation for new entries.

use chrono::{DateTime, FixedOffset};

/// Pick a slug for a new entry.
///
/// In order, the first non-empty of: the client `Slug` header, the lowercase
/// ASCII alphanumeric runs of the title joined by `-`, the published time as `HHMM`.
pub fn derive_slug(
    header: Option<&str>,
    title: &str,
    published: &DateTime<FixedOffset>,
) -> String {
    if let Some(slug) = header.map(str::trim).filter(|s| !s.is_empty()) {
        return slug.to_string();
    }

    let from_title = slugify(title);
    if !from_title.is_empty() {
        return from_title;
    }

    published.format("%H%M").to_string()
}

/// `"Hello, World!"` → `"hello-world"`.
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .split(|c: char| !(c.is_ascii_lowercase() || c.is_ascii_digit()))
        .filter(|run| !run.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
