//! Biomarker extraction from free-text blobs.
//!
//! A blob such as `her2 = 2+ fish = positive er = positive` is searched for
//! every marker variant followed by `=`. The captured value runs until the
//! next `<whitespace><known variant> =` or the end of the blob, so values
//! may contain spaces ("strong positive", "not detected").
//!
//! ## HER2
//!
//! HER2 values are scored by the first IHC token (`0`, `1+`, `2+`, `3+`) they
//! contain. `0`/`1+` are negative, `3+` is positive. An equivocal `2+` is
//! settled by the blob's `fish = <token>` result, and without one it is
//! flagged as [`HER2_FISH_MISSING`]. A scored value also fills
//! [`HER2_IHC_FIELD`].

use std::sync::LazyLock;

use harmonize_model::{HER2_FISH_MISSING, SynonymTable};
use regex::Regex;

use crate::error::{Result, TransformError};
use crate::extraction::blob::normalize_blob;

/// Canonical marker name that gets IHC scoring.
pub const HER2_MARKER: &str = "HER2";

/// Output field for the HER2 IHC category.
pub const HER2_IHC_FIELD: &str = "HER2 IHC";

const POSITIVE_LABEL: &str = "positive";
const NEGATIVE_LABEL: &str = "negative";

static FISH_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bfish\b\s*=\s*([^\s=]+)").expect("Invalid FISH regex"));

/// IHC score anywhere in the HER2 value. Unanchored on purpose: lab notes
/// write scores glued to other text (`2+(equivocal)`), so `10%` also reads
/// as `0`.
static IHC_SCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(0|1\+|2\+|3\+)").expect("Invalid IHC score regex"));

/// Normalized biomarker call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BiomarkerCall {
    /// A label from the positive/negative table.
    Label(String),
    /// Raw value with no matching label.
    Passthrough(String),
    /// HER2 2+ with no usable FISH/ISH result.
    FishMissing,
}

impl BiomarkerCall {
    pub fn as_str(&self) -> &str {
        match self {
            BiomarkerCall::Label(value) | BiomarkerCall::Passthrough(value) => value,
            BiomarkerCall::FishMissing => HER2_FISH_MISSING,
        }
    }
}

/// One marker found in a blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BiomarkerResult {
    /// Canonical marker name, also the output field for [`Self::call`].
    pub marker: String,
    /// Trimmed text captured after `=`.
    pub raw_value: String,
    pub call: BiomarkerCall,
    /// HER2 IHC category, only for scored HER2 values.
    pub her2_ihc: Option<String>,
}

impl BiomarkerResult {
    /// Output field holding the raw captured value.
    pub fn value_field(&self) -> String {
        format!("{} Value", self.marker)
    }
}

/// All markers found in one blob, in marker declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BiomarkerPanel {
    pub results: Vec<BiomarkerResult>,
}

impl BiomarkerPanel {
    pub fn get(&self, marker: &str) -> Option<&BiomarkerResult> {
        self.results.iter().find(|result| result.marker == marker)
    }

    /// `(output field, value)` pairs to write for this record.
    pub fn cells(&self) -> Vec<(String, String)> {
        let mut cells = Vec::with_capacity(self.results.len() * 2 + 1);
        for result in &self.results {
            if let Some(ihc) = &result.her2_ihc {
                cells.push((HER2_IHC_FIELD.to_string(), ihc.clone()));
            }
            cells.push((result.value_field(), result.raw_value.clone()));
            cells.push((result.marker.clone(), result.call.as_str().to_string()));
        }
        cells
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[derive(Debug, Clone)]
struct MarkerPatterns {
    marker: String,
    variants: Vec<Regex>,
}

/// Patterns and lookups for biomarker extraction, compiled once per batch.
#[derive(Debug, Clone)]
pub struct BiomarkerExtractor {
    markers: Vec<MarkerPatterns>,
    /// Anchored `^\s+\b(?:variants)\b\s*=`; `None` when no variants exist.
    boundary: Option<Regex>,
    labels: SynonymTable,
    her2_ihc: SynonymTable,
}

impl BiomarkerExtractor {
    /// Compiles the search patterns.
    ///
    /// `markers` maps canonical marker names to their spellings, `labels` is
    /// the positive/negative table, and `her2_ihc` maps HER2 values to IHC
    /// categories.
    pub fn new(markers: &SynonymTable, labels: &SynonymTable, her2_ihc: &SynonymTable) -> Result<Self> {
        let mut compiled = Vec::with_capacity(markers.len());
        let mut keys = Vec::new();
        for entry in markers.entries() {
            let mut variants = Vec::with_capacity(entry.variants.len());
            for variant in &entry.variants {
                let escaped = regex::escape(variant);
                let pattern = format!(r"\b{escaped}\b\s*=\s*");
                let regex = Regex::new(&pattern).map_err(|source| TransformError::InvalidPattern {
                    marker: entry.canonical.clone(),
                    source,
                })?;
                variants.push(regex);
                keys.push(escaped);
            }
            compiled.push(MarkerPatterns {
                marker: entry.canonical.clone(),
                variants,
            });
        }

        let boundary = if keys.is_empty() {
            None
        } else {
            keys.sort_by_key(|key| std::cmp::Reverse(key.len()));
            let pattern = format!(r"^\s+\b(?:{})\b\s*=", keys.join("|"));
            Some(Regex::new(&pattern).map_err(|source| TransformError::InvalidPattern {
                marker: "<boundary>".to_string(),
                source,
            })?)
        };

        Ok(Self {
            markers: compiled,
            boundary,
            labels: labels.clone(),
            her2_ihc: her2_ihc.clone(),
        })
    }

    /// Number of markers searched for.
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Extracts every marker present in `blob`.
    ///
    /// Each marker takes the first of its variants (in declared order) that
    /// occurs; the leftmost occurrence of that variant wins. A marker with
    /// nothing after its `=` yields no result.
    pub fn extract(&self, blob: &str) -> BiomarkerPanel {
        let text = normalize_blob(blob);
        if text.is_empty() {
            return BiomarkerPanel::default();
        }

        let fish = FISH_PATTERN
            .captures(&text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string());

        let mut results = Vec::new();
        for marker in &self.markers {
            let Some(found) = marker.variants.iter().find_map(|re| re.find(&text)) else {
                continue;
            };
            let raw_value = self.capture_value(&text, found.end()).trim().to_string();
            if raw_value.is_empty() {
                continue;
            }
            results.push(self.resolve(&marker.marker, raw_value, fish.as_deref()));
        }

        BiomarkerPanel { results }
    }

    /// Text from `start` up to the next marker boundary or the end.
    fn capture_value<'t>(&self, text: &'t str, start: usize) -> &'t str {
        let rest = &text[start..];
        let end = rest
            .char_indices()
            .map(|(idx, _)| idx)
            .find(|&idx| self.is_boundary(&rest[idx..]))
            .unwrap_or(rest.len());
        &rest[..end]
    }

    fn is_boundary(&self, tail: &str) -> bool {
        match &self.boundary {
            Some(boundary) => tail.starts_with(char::is_whitespace) && boundary.is_match(tail),
            None => false,
        }
    }

    fn resolve(&self, marker: &str, raw_value: String, fish: Option<&str>) -> BiomarkerResult {
        if marker == HER2_MARKER {
            return self.resolve_her2(marker, raw_value, fish);
        }
        let call = match self.labels.first_label_for(&raw_value) {
            Some(label) => BiomarkerCall::Label(label.to_string()),
            None => BiomarkerCall::Passthrough(raw_value.clone()),
        };
        BiomarkerResult {
            marker: marker.to_string(),
            raw_value,
            call,
            her2_ihc: None,
        }
    }

    fn resolve_her2(&self, marker: &str, raw_value: String, fish: Option<&str>) -> BiomarkerResult {
        let Some(score) = IHC_SCORE.find(&raw_value) else {
            return BiomarkerResult {
                marker: marker.to_string(),
                call: BiomarkerCall::Passthrough(raw_value.clone()),
                raw_value,
                her2_ihc: None,
            };
        };

        let call = match score.as_str() {
            "0" | "1+" => BiomarkerCall::Label(NEGATIVE_LABEL.to_string()),
            "3+" => BiomarkerCall::Label(POSITIVE_LABEL.to_string()),
            _ => self.resolve_equivocal(fish),
        };
        let ihc = self
            .her2_ihc
            .first_label_for(&raw_value)
            .unwrap_or(&raw_value)
            .to_string();

        BiomarkerResult {
            marker: marker.to_string(),
            raw_value,
            call,
            her2_ihc: Some(ihc),
        }
    }

    fn resolve_equivocal(&self, fish: Option<&str>) -> BiomarkerCall {
        match fish {
            Some(token) if self.labels.has_variant(POSITIVE_LABEL, token) => {
                BiomarkerCall::Label(POSITIVE_LABEL.to_string())
            }
            Some(token) if self.labels.has_variant(NEGATIVE_LABEL, token) => {
                BiomarkerCall::Label(NEGATIVE_LABEL.to_string())
            }
            _ => BiomarkerCall::FishMissing,
        }
    }
}
