//! Per-record text blobs.

use harmonize_common::collapse_whitespace;

/// Joins a record's biomarker-source cells into one searchable string.
///
/// Missing cells and literal `nan` cells contribute nothing. The result is
/// lowercase with whitespace collapsed.
///
/// ```
/// use harmonize_transform::build_blob;
///
/// let blob = build_blob([Some("ER = Positive"), None, Some("nan"), Some("  PR=neg ")]);
/// assert_eq!(blob, "er = positive pr=neg");
/// ```
pub fn build_blob<'a, I>(cells: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let joined = cells
        .into_iter()
        .map(|cell| match cell {
            Some(text) if text.trim() != "nan" => text,
            _ => "",
        })
        .collect::<Vec<_>>()
        .join(" ");
    collapse_whitespace(&joined).to_lowercase()
}

/// Search form of a blob: `=` padded with spaces, whitespace collapsed,
/// lowercase.
pub fn normalize_blob(text: &str) -> String {
    collapse_whitespace(&text.replace('=', " = ")).to_lowercase()
}
