//! Entry identifiers derived from file paths.
//!
//! Slugging follows GitHub's heading-anchor rules: lower-case, drop
//! punctuation and symbols, spaces become hyphens. No de-duplication
//! suffixes are added, so two paths can collide; the synchronizer reports
//! such collisions as duplicate ids.

use std::path::{Component, Path};

/// Slugify one path segment.
pub fn slugify(segment: &str) -> String {
    segment
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            '-' | '_' => Some(c),
            c if c.is_alphanumeric() || is_combining_mark(c) => Some(c),
            _ => None,
        })
        .collect()
}

fn is_combining_mark(c: char) -> bool {
    matches!(c as u32, 0x0300..=0x036F | 0x1AB0..=0x1AFF | 0x1DC0..=0x1DFF | 0x20D0..=0x20FF)
}

/// Convert a relative path to forward-slash form.
pub fn posix_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Identifier for an entry at `relative` (relative to its collection base):
/// extension removed, each segment slugified, a trailing `/index` dropped.
pub fn entry_slug(relative: &Path) -> String {
    let without_ext = relative.with_extension("");
    let posix = posix_path(&without_ext);
    let slug = posix.split('/').map(slugify).collect::<Vec<_>>().join("/");
    match slug.strip_suffix("/index") {
        Some(stripped) => stripped.to_string(),
        None => slug,
    }
}
