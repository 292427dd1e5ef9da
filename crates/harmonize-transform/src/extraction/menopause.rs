//! Menopausal status from free text.

use harmonize_model::{Resolution, SynonymEntry, SynonymTable, Unresolved};

/// Substring keyword search over the menopause synonym table.
///
/// Statuses are tried in declared order and keywords within a status in
/// declared order; the first keyword found anywhere in the text wins.
#[derive(Debug, Clone)]
pub struct MenopauseExtractor {
    statuses: Vec<SynonymEntry>,
}

impl MenopauseExtractor {
    pub fn new(table: &SynonymTable) -> Self {
        Self {
            statuses: table.entries().to_vec(),
        }
    }

    pub fn extract(&self, text: &str) -> Resolution<&str> {
        let text = text.to_lowercase();
        self.statuses
            .iter()
            .find(|status| status.variants.iter().any(|kw| text.contains(kw.as_str())))
            .map(|status| status.canonical.as_str())
            .ok_or(Unresolved)
    }
}
