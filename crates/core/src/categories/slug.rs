//! URL slug helpers.

use crate::constants::{FALLBACK_SLUG_PREFIX, MAX_SLUG_LENGTH};

/// Turns a display name into a lower-case ASCII slug.
///
/// Whitespace becomes `-`, anything other than ASCII alphanumerics, `-` and
/// `_` is dropped, and dash runs collapse. Returns an empty string when the
/// name has no usable characters.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());

    for ch in name.chars() {
        let mapped = if ch.is_whitespace() || ch == '-' {
            '-'
        } else if ch.is_ascii_alphanumeric() || ch == '_' {
            ch.to_ascii_lowercase()
        } else {
            continue;
        };
        if mapped == '-' && (slug.is_empty() || slug.ends_with('-')) {
            continue;
        }
        slug.push(mapped);
        if slug.len() >= MAX_SLUG_LENGTH {
            break;
        }
    }

    slug.trim_end_matches('-').to_string()
}

/// Slug for `name`, or a generated fallback when nothing usable remains.
pub fn slug_for_name(name: &str) -> String {
    let slug = slugify(name);
    if slug.is_empty() {
        let id = uuid::Uuid::new_v4().simple().to_string();
        format!("{}-{}", FALLBACK_SLUG_PREFIX, &id[..8])
    } else {
        slug
    }
}

/// `base` with a numeric suffix, shortened so the result stays within bounds.
pub fn with_suffix(base: &str, n: u32) -> String {
    append_suffix(base, &n.to_string())
}

/// Appends eight random hex digits, for when numbered suffixes keep colliding.
pub fn with_random_suffix(base: &str) -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    append_suffix(base, &id[..8])
}

fn append_suffix(base: &str, suffix: &str) -> String {
    let keep = MAX_SLUG_LENGTH
        .saturating_sub(suffix.len() + 1)
        .min(base.len());
    format!("{}-{}", base[..keep].trim_end_matches('-'), suffix)
}

/// True when `slug` only contains characters that are safe in a URL path
/// segment without escaping.
pub fn is_url_safe(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= MAX_SLUG_LENGTH
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}
