//! Synonym tables: canonical labels and the raw spellings that map to them.
//!
//! A table is an ordered list of entries. Each entry pairs one canonical label
//! with its variants. Lookups are case-insensitive and ignore surrounding
//! whitespace; variants are stored in that normalized form.
//!
//! ## Duplicate variants
//!
//! A variant listed under two labels resolves to the label declared **last**
//! when used through [`SynonymTable::lookup`]. Scans that walk the table in
//! declared order ([`SynonymTable::first_label_for`]) return the label declared
//! **first**. Biomarker calls use the ordered scan; field cleaners use the
//! index.

use std::collections::HashMap;

use harmonize_common::normalize_key;
use serde::Serialize;

use crate::unresolved::{Resolution, Unresolved};

/// One canonical label and the normalized variants that resolve to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SynonymEntry {
    /// Value written to the output table.
    pub canonical: String,
    /// Lowercase, trimmed spellings, in declared order.
    pub variants: Vec<String>,
}

/// Ordered synonym table with a variant index for O(1) lookups.
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    entries: Vec<SynonymEntry>,
    /// normalized variant -> entry position
    index: HashMap<String, usize>,
}

impl SynonymTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from `(canonical, variants)` pairs in declared order.
    ///
    /// Repeated canonical labels extend the existing entry.
    pub fn build<I, C, V, S>(mapping: I) -> Self
    where
        I: IntoIterator<Item = (C, V)>,
        C: Into<String>,
        V: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        for (canonical, variants) in mapping {
            let position = table.entry_position(canonical.into());
            for variant in variants {
                table.push_variant(position, variant.as_ref());
            }
        }
        table
    }

    /// Adds one variant under `canonical`, creating the entry if needed.
    pub fn insert(&mut self, canonical: impl Into<String>, variant: &str) {
        let position = self.entry_position(canonical.into());
        self.push_variant(position, variant);
    }

    fn entry_position(&mut self, canonical: String) -> usize {
        if let Some(position) = self.entries.iter().position(|e| e.canonical == canonical) {
            return position;
        }
        self.entries.push(SynonymEntry {
            canonical,
            variants: Vec::new(),
        });
        self.entries.len() - 1
    }

    fn push_variant(&mut self, position: usize, variant: &str) {
        let key = normalize_key(variant);
        if key.is_empty() {
            return;
        }
        let entry = &mut self.entries[position];
        if !entry.variants.contains(&key) {
            entry.variants.push(key.clone());
        }
        self.index.insert(key, position);
    }

    /// Resolves a raw value to its canonical label.
    pub fn lookup(&self, value: &str) -> Resolution<&str> {
        self.index
            .get(&normalize_key(value))
            .map(|&position| self.entries[position].canonical.as_str())
            .ok_or(Unresolved)
    }

    /// First label, in declared order, whose variants contain `value`.
    pub fn first_label_for(&self, value: &str) -> Option<&str> {
        let key = normalize_key(value);
        self.entries
            .iter()
            .find(|entry| entry.variants.contains(&key))
            .map(|entry| entry.canonical.as_str())
    }

    /// Whether the entry named `canonical` lists `value` as a variant.
    pub fn has_variant(&self, canonical: &str, value: &str) -> bool {
        let key = normalize_key(value);
        self.entries
            .iter()
            .filter(|entry| entry.canonical == canonical)
            .any(|entry| entry.variants.contains(&key))
    }

    pub fn entries(&self) -> &[SynonymEntry] {
        &self.entries
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.canonical.as_str())
    }

    /// Number of distinct variants across all entries.
    pub fn variant_count(&self) -> usize {
        self.index.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
