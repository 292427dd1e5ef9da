//! What a harmonization run did.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::pipeline::PipelineStage;

/// Counters collected while the pipeline runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HarmonizationReport {
    /// Records processed (raw rows).
    pub rows: usize,
    pub template_fields: usize,
    /// Template fields with a directive.
    pub mapped_fields: usize,
    /// Directive counts by kind (`direct`, `fixed`, `computed`, `not_received`).
    pub directives: BTreeMap<String, usize>,
    /// Raw rows that found a manifest row; `None` when no merge ran.
    pub merged_rows: Option<usize>,
    /// Records in which each marker was found.
    pub biomarker_hits: BTreeMap<String, usize>,
    pub menopause_hits: usize,
    /// Mapped source columns absent from the merged data.
    pub missing_columns: BTreeSet<String>,
    /// Result keys dropped because the template lacks the column.
    pub dropped_fields: BTreeSet<String>,
    /// Non-empty inputs that resolved to nothing, per output field.
    pub unresolved_cells: BTreeMap<String, usize>,
    /// Cells set to the backfill sentinel.
    pub backfilled_cells: usize,
    pub skipped_steps: Vec<String>,
    pub stages: Vec<PipelineStage>,
}

impl HarmonizationReport {
    /// Share of template fields with a directive, in `[0, 1]`.
    pub fn coverage(&self) -> f64 {
        if self.template_fields == 0 {
            return 0.0;
        }
        self.mapped_fields as f64 / self.template_fields as f64
    }

    pub fn unresolved_total(&self) -> usize {
        self.unresolved_cells.values().sum()
    }

    pub fn final_stage(&self) -> Option<PipelineStage> {
        self.stages.last().copied()
    }

    pub(crate) fn record_unresolved(&mut self, field: &str, count: usize) {
        if count > 0 {
            *self.unresolved_cells.entry(field.to_string()).or_default() += count;
        }
    }
}
