//! Left merge of the raw sheet with a shipping manifest.
//!
//! Every raw row is kept, in order, and picks up the manifest columns of the
//! first manifest row with the same key (trimmed text comparison). Unmatched
//! rows get empty manifest cells. Column names present on both sides are
//! suffixed `_x` (raw) and `_y` (manifest); when both key columns share a name
//! only the raw one is kept.

use std::collections::{HashMap, HashSet};

use harmonize_model::JoinKeys;
use tracing::warn;

use crate::frame::SourceFrame;

/// Merged frame plus how many raw rows found a manifest match.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub frame: SourceFrame,
    pub matched_rows: usize,
}

pub fn left_merge(raw: SourceFrame, shipping: &SourceFrame, keys: &JoinKeys) -> MergeOutcome {
    if !raw.has_column(&keys.raw_column) || !shipping.has_column(&keys.shipping_column) {
        warn!(
            raw_key = %keys.raw_column,
            shipping_key = %keys.shipping_column,
            "join key column missing, skipping shipping merge"
        );
        return MergeOutcome {
            frame: raw,
            matched_rows: 0,
        };
    }
    let raw_keys = raw.column(&keys.raw_column).unwrap_or_default();
    let shipping_keys = shipping.column(&keys.shipping_column).unwrap_or_default();

    let mut index: HashMap<&str, usize> = HashMap::new();
    for (row, key) in shipping_keys.iter().enumerate() {
        if let Some(key) = key.as_deref() {
            index.entry(key.trim()).or_insert(row);
        }
    }

    let matches: Vec<Option<usize>> = raw_keys
        .iter()
        .map(|key| key.as_deref().and_then(|key| index.get(key.trim()).copied()))
        .collect();
    let matched_rows = matches.iter().filter(|m| m.is_some()).count();

    let shared_key = keys.raw_column == keys.shipping_column;
    let manifest_columns: Vec<&String> = shipping
        .column_names()
        .iter()
        .filter(|name| !(shared_key && **name == keys.shipping_column))
        .collect();
    let raw_names: HashSet<&str> = raw.column_names().iter().map(String::as_str).collect();
    let overlapping: HashSet<&str> = manifest_columns
        .iter()
        .map(|name| name.as_str())
        .filter(|name| raw_names.contains(name))
        .collect();

    let mut frame = SourceFrame::with_height(raw.height());
    for name in raw.column_names() {
        let values = raw.column(name).map(<[_]>::to_vec).unwrap_or_default();
        let merged_name = if overlapping.contains(name.as_str()) {
            format!("{name}_x")
        } else {
            name.clone()
        };
        frame.push_column(merged_name, values);
    }
    for name in manifest_columns {
        let Some(source) = shipping.column(name) else {
            continue;
        };
        let values = matches
            .iter()
            .map(|m| m.and_then(|row| source[row].clone()))
            .collect();
        let merged_name = if overlapping.contains(name.as_str()) {
            format!("{name}_y")
        } else {
            name.clone()
        };
        frame.push_column(merged_name, values);
    }

    MergeOutcome {
        frame,
        matched_rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(columns: &[(&str, Vec<Option<&str>>)]) -> SourceFrame {
        let height = columns.first().map_or(0, |(_, values)| values.len());
        let mut frame = SourceFrame::with_height(height);
        for (name, values) in columns {
            frame.push_column(
                (*name).to_string(),
                values.iter().map(|v| v.map(str::to_string)).collect(),
            );
        }
        frame
    }

    #[test]
    fn keeps_unmatched_rows_in_order() {
        let raw = frame(&[("Subject", vec![Some("S1"), Some("S2"), None])]);
        let shipping = frame(&[
            ("Subject ID", vec![Some("S2"), Some("S1")]),
            ("Tube Barcode", vec![Some("B-2"), Some("B-1")]),
        ]);
        let keys = JoinKeys::new("Subject", "Subject ID").unwrap();
        let outcome = left_merge(raw, &shipping, &keys);

        assert_eq!(outcome.matched_rows, 2);
        assert_eq!(outcome.frame.height(), 3);
        assert_eq!(outcome.frame.value("Tube Barcode", 0), Some("B-1"));
        assert_eq!(outcome.frame.value("Tube Barcode", 1), Some("B-2"));
        assert_eq!(outcome.frame.value("Tube Barcode", 2), None);
        assert_eq!(outcome.frame.value("Subject ID", 0), Some("S1"));
    }

    #[test]
    fn first_manifest_match_wins() {
        let raw = frame(&[("ID", vec![Some("A")])]);
        let shipping = frame(&[
            ("Ship ID", vec![Some(" A "), Some("A")]),
            ("Box", vec![Some("1"), Some("2")]),
        ]);
        let keys = JoinKeys::new("ID", "Ship ID").unwrap();
        let outcome = left_merge(raw, &shipping, &keys);
        assert_eq!(outcome.frame.value("Box", 0), Some("1"));
    }

    #[test]
    fn overlapping_columns_get_suffixes() {
        let raw = frame(&[("ID", vec![Some("A")]), ("Notes", vec![Some("raw")])]);
        let shipping = frame(&[("ID", vec![Some("A")]), ("Notes", vec![Some("manifest")])]);
        let keys = JoinKeys::new("ID", "ID").unwrap();
        let outcome = left_merge(raw, &shipping, &keys);
        assert_eq!(outcome.frame.column_names(), ["ID", "Notes_x", "Notes_y"]);
        assert_eq!(outcome.frame.value("Notes_y", 0), Some("manifest"));
    }

    #[test]
    fn missing_key_column_leaves_raw_untouched() {
        let raw = frame(&[("ID", vec![Some("A")])]);
        let shipping = frame(&[("Other", vec![Some("A")])]);
        let keys = JoinKeys::new("ID", "Ship ID").unwrap();
        let outcome = left_merge(raw.clone(), &shipping, &keys);
        assert_eq!(outcome.matched_rows, 0);
        assert_eq!(outcome.frame, raw);
    }
}
