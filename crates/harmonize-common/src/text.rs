//! Text normalization shared by lookups, blobs, and merges.

/// Collapses every whitespace run to a single space and trims both ends.
///
/// ```
/// use harmonize_common::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("  ER =\tpositive \n"), "ER = positive");
/// ```
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical key form used by every case-insensitive lookup.
pub fn normalize_key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Returns true for empty or whitespace-only cells.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
