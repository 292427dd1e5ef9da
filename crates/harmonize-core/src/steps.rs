//! Standard harmonization steps, in execution order.

use harmonize_common::{format_numeric, is_blank, redact_value};
use harmonize_model::Resolution;
use harmonize_transform::{bmi, build_blob, elapsed_days, infer_age, round2};
use tracing::{debug, trace};

use crate::error::Result;
use crate::frame::{OutputTable, SourceFrame};
use crate::merge::left_merge;
use crate::pipeline::{HarmonizationBatch, HarmonizationContext, HarmonizationStep, PipelineStage};
use crate::report::HarmonizationReport;

pub(crate) fn standard_steps() -> Vec<Box<dyn HarmonizationStep>> {
    vec![
        Box::new(BuildBlobsStep),
        Box::new(MergeShippingStep),
        Box::new(ExtractBiomarkersStep),
        Box::new(ComputeFieldsStep),
        Box::new(ApplyMappingsStep),
        Box::new(BackfillRequiredStep),
    ]
}

// ============================================================================
// Standard Harmonization Steps
// ============================================================================

/// Step 1: join the biomarker-source columns of each record into a blob.
pub(crate) struct BuildBlobsStep;

impl HarmonizationStep for BuildBlobsStep {
    fn execute(&self, batch: &mut HarmonizationBatch, ctx: &HarmonizationContext<'_>) -> Result<()> {
        let mut columns = Vec::new();
        for column in ctx.plan.biomarker_columns() {
            match batch.source.column(column) {
                Some(values) => columns.push(values),
                None => {
                    debug!(column = %column, "biomarker column missing from raw data");
                    batch.report.missing_columns.insert(column.clone());
                }
            }
        }
        batch.blobs = (0..batch.source.height())
            .map(|row| {
                build_blob(
                    columns
                        .iter()
                        .map(|values| values.get(row).and_then(Option::as_deref)),
                )
            })
            .collect();
        Ok(())
    }

    fn step_name(&self) -> &str {
        "build_blobs"
    }

    fn completes(&self) -> PipelineStage {
        PipelineStage::BlobsBuilt
    }

    fn should_skip(&self, ctx: &HarmonizationContext<'_>) -> bool {
        ctx.plan.biomarker_columns().is_empty()
    }
}

/// Step 2: left-merge the shipping manifest onto the raw records.
pub(crate) struct MergeShippingStep;

impl HarmonizationStep for MergeShippingStep {
    fn execute(&self, batch: &mut HarmonizationBatch, ctx: &HarmonizationContext<'_>) -> Result<()> {
        let (Some(shipping), Some(keys)) = (ctx.shipping, ctx.plan.join_keys()) else {
            return Ok(());
        };
        let raw = std::mem::take(&mut batch.source);
        let outcome = left_merge(raw, shipping, keys);
        debug!(
            matched = outcome.matched_rows,
            columns = outcome.frame.column_names().len(),
            "shipping manifest merged"
        );
        batch.source = outcome.frame;
        batch.report.merged_rows = Some(outcome.matched_rows);
        Ok(())
    }

    fn step_name(&self) -> &str {
        "merge_shipping"
    }

    fn completes(&self) -> PipelineStage {
        PipelineStage::Merged
    }

    fn should_skip(&self, ctx: &HarmonizationContext<'_>) -> bool {
        ctx.shipping.is_none() || ctx.plan.join_keys().is_none()
    }
}

/// Step 3: biomarker calls and menopausal status from each blob.
///
/// Only resolved values are written; other cells stay as they are.
pub(crate) struct ExtractBiomarkersStep;

impl HarmonizationStep for ExtractBiomarkersStep {
    fn execute(&self, batch: &mut HarmonizationBatch, ctx: &HarmonizationContext<'_>) -> Result<()> {
        let HarmonizationBatch {
            blobs,
            output,
            report,
            ..
        } = batch;
        let menopause_field = ctx.options.special_fields.menopause.as_str();

        for (row, blob) in blobs.iter().enumerate() {
            if blob.is_empty() {
                continue;
            }
            let panel = ctx.biomarkers.extract(blob);
            for result in &panel.results {
                *report.biomarker_hits.entry(result.marker.clone()).or_default() += 1;
            }
            for (field, value) in panel.cells() {
                trace!(row, field = %field, value = %redact_value(&value), "biomarker cell");
                write_cell(output, report, &field, row, value);
            }

            if ctx.options.extract_menopause
                && let Ok(status) = ctx.menopause.extract(blob)
            {
                report.menopause_hits += 1;
                write_cell(output, report, menopause_field, row, status.to_string());
            }
        }
        Ok(())
    }

    fn step_name(&self) -> &str {
        "extract_biomarkers"
    }

    fn completes(&self) -> PipelineStage {
        PipelineStage::BiomarkersExtracted
    }
}

/// Step 4: elapsed days, age at collection, height, weight and BMI.
pub(crate) struct ComputeFieldsStep;

impl ComputeFieldsStep {
    fn calculations(batch: &mut HarmonizationBatch, ctx: &HarmonizationContext<'_>) {
        for calc in ctx.plan.calculations() {
            let (Some(start), Some(end)) = (
                batch.source.column(&calc.start_column),
                batch.source.column(&calc.end_column),
            ) else {
                debug!(
                    target_field = %calc.target,
                    start = %calc.start_column,
                    end = %calc.end_column,
                    "calculation column missing, skipping"
                );
                for column in [&calc.start_column, &calc.end_column] {
                    if !batch.source.has_column(column) {
                        batch.report.missing_columns.insert(column.clone());
                    }
                }
                continue;
            };

            let mut unresolved = 0;
            let values = start
                .iter()
                .zip(end)
                .map(|(start, end)| match (start, end) {
                    (Some(start), Some(end)) => match elapsed_days(start, end) {
                        Ok(days) => Some(days.to_string()),
                        Err(_) => {
                            unresolved += 1;
                            None
                        }
                    },
                    _ => None,
                })
                .collect();
            batch.report.record_unresolved(&calc.target, unresolved);
            fill_column(&mut batch.output, &mut batch.report, &calc.target, values);
        }
    }

    fn age(batch: &mut HarmonizationBatch, ctx: &HarmonizationContext<'_>) {
        let special = &ctx.options.special_fields;
        let Some(age_column) = ctx.plan.direct_source(&special.age) else {
            return;
        };
        if !batch.source.has_column(age_column) {
            debug!(column = %age_column, "age column missing from merged data");
            batch.report.missing_columns.insert(age_column.to_string());
            return;
        }
        let collection_column = ctx.plan.direct_source(&special.collection_date);

        let mut unresolved = 0;
        let values = (0..batch.source.height())
            .map(|row| {
                let raw = batch.source.value(age_column, row)?;
                let reference = collection_column
                    .and_then(|column| batch.source.value(column, row))
                    .unwrap_or_default();
                match infer_age(raw, reference) {
                    Ok(age) => Some(age.to_string()),
                    Err(_) => {
                        trace!(row, raw = %redact_value(raw), "age unresolved");
                        unresolved += 1;
                        None
                    }
                }
            })
            .collect();
        batch.report.record_unresolved(&special.age, unresolved);
        fill_column(&mut batch.output, &mut batch.report, &special.age, values);
    }

    /// Converts a source measurement column in place and returns the unrounded
    /// values for BMI.
    fn convert_column(
        source: &mut SourceFrame,
        report: &mut HarmonizationReport,
        column: &str,
        field: &str,
        convert: impl Fn(&str) -> Resolution<f64>,
    ) -> Option<Vec<Option<f64>>> {
        let cells = source.column_mut(column)?;
        let mut unresolved = 0;
        let mut converted = Vec::with_capacity(cells.len());
        for cell in cells.iter_mut() {
            let value = match cell.as_deref().map(&convert) {
                Some(Ok(value)) => Some(value),
                Some(Err(_)) => {
                    unresolved += 1;
                    None
                }
                None => None,
            };
            *cell = value.map(|v| format_numeric(round2(v)));
            converted.push(value);
        }
        report.record_unresolved(field, unresolved);
        Some(converted)
    }

    fn body_measurements(batch: &mut HarmonizationBatch, ctx: &HarmonizationContext<'_>) {
        let special = &ctx.options.special_fields;
        let mut measure = |field: &str, convert: &dyn Fn(&str) -> Resolution<f64>| {
            let column = ctx.plan.direct_source(field)?;
            let values = Self::convert_column(
                &mut batch.source,
                &mut batch.report,
                column,
                field,
                convert,
            );
            match values {
                Some(values) => {
                    let rendered = batch.source.column(column).map(<[_]>::to_vec).unwrap_or_default();
                    fill_column(&mut batch.output, &mut batch.report, field, rendered);
                    Some(values)
                }
                None => {
                    debug!(column = %column, field = %field, "measurement column missing");
                    batch.report.missing_columns.insert(column.to_string());
                    None
                }
            }
        };

        let heights = measure(&special.height, &|raw| ctx.units.height_cm(raw));
        let weights = measure(&special.weight, &|raw| ctx.units.weight_kg(raw));

        let (Some(heights), Some(weights)) = (heights, weights) else {
            return;
        };
        let mut unresolved = 0;
        let values = heights
            .iter()
            .zip(&weights)
            .map(|(height, weight)| match (height, weight) {
                (Some(height), Some(weight)) => match bmi(*weight, *height) {
                    Ok(value) => Some(format_numeric(value)),
                    Err(_) => {
                        unresolved += 1;
                        None
                    }
                },
                _ => None,
            })
            .collect();
        batch.report.record_unresolved(&special.bmi, unresolved);
        fill_column(&mut batch.output, &mut batch.report, &special.bmi, values);
    }
}

impl HarmonizationStep for ComputeFieldsStep {
    fn execute(&self, batch: &mut HarmonizationBatch, ctx: &HarmonizationContext<'_>) -> Result<()> {
        Self::calculations(batch, ctx);
        Self::age(batch, ctx);
        Self::body_measurements(batch, ctx);
        Ok(())
    }

    fn step_name(&self) -> &str {
        "compute_fields"
    }

    fn completes(&self) -> PipelineStage {
        PipelineStage::ComputedFieldsFilled
    }
}

/// Step 5: fixed values, then direct copies through the transform registry.
///
/// The age field is owned by [`ComputeFieldsStep`] and never copied.
pub(crate) struct ApplyMappingsStep;

impl HarmonizationStep for ApplyMappingsStep {
    fn execute(&self, batch: &mut HarmonizationBatch, ctx: &HarmonizationContext<'_>) -> Result<()> {
        let height = batch.source.height();
        for (field, value) in ctx.plan.fixed_values() {
            if is_blank(value) {
                debug!(field = %field, "blank fixed value, leaving field empty");
                continue;
            }
            fill_column(
                &mut batch.output,
                &mut batch.report,
                field,
                vec![Some(value.to_string()); height],
            );
        }

        for (field, column) in ctx.plan.direct_mappings() {
            if field == ctx.options.special_fields.age {
                continue;
            }
            let Some(cells) = batch.source.column(column) else {
                debug!(field = %field, column = %column, "mapped column missing, skipping");
                batch.report.missing_columns.insert(column.to_string());
                continue;
            };

            let transform = ctx.registry.get(field);
            let mut unresolved = 0;
            let values = cells
                .iter()
                .map(|cell| {
                    let raw = cell.as_deref()?;
                    let Some(transform) = transform else {
                        return Some(raw.to_string());
                    };
                    match transform.apply(raw) {
                        Ok(value) => Some(value),
                        Err(_) => {
                            trace!(
                                field = %field,
                                transform = transform.kind(),
                                raw = %redact_value(raw),
                                "value unresolved"
                            );
                            unresolved += 1;
                            None
                        }
                    }
                })
                .collect();
            batch.report.record_unresolved(field, unresolved);
            fill_column(&mut batch.output, &mut batch.report, field, values);
        }
        Ok(())
    }

    fn step_name(&self) -> &str {
        "apply_mappings"
    }

    fn completes(&self) -> PipelineStage {
        PipelineStage::DirectMappingsApplied
    }
}

/// Step 6: the backfill sentinel for required or "not received" fields that
/// are still empty or blank.
pub(crate) struct BackfillRequiredStep;

impl HarmonizationStep for BackfillRequiredStep {
    fn execute(&self, batch: &mut HarmonizationBatch, ctx: &HarmonizationContext<'_>) -> Result<()> {
        let sentinel = ctx.options.backfill_value.as_str();
        let fields: Vec<String> = batch
            .output
            .fields()
            .iter()
            .filter(|field| ctx.options.is_required(field) || ctx.plan.is_not_received(field))
            .cloned()
            .collect();

        let mut filled = 0;
        for field in &fields {
            let Some(cells) = batch.output.column_mut(field) else {
                continue;
            };
            for cell in cells
                .iter_mut()
                .filter(|cell| cell.as_deref().is_none_or(is_blank))
            {
                *cell = Some(sentinel.to_string());
                filled += 1;
            }
        }
        batch.report.backfilled_cells += filled;
        Ok(())
    }

    fn step_name(&self) -> &str {
        "backfill_required"
    }

    fn completes(&self) -> PipelineStage {
        PipelineStage::RequiredFieldsBackfilled
    }
}

fn write_cell(
    output: &mut OutputTable,
    report: &mut HarmonizationReport,
    field: &str,
    row: usize,
    value: String,
) {
    if is_blank(&value) {
        return;
    }
    if !output.set(field, row, Some(value)) {
        note_dropped(report, field);
    }
}

fn fill_column(
    output: &mut OutputTable,
    report: &mut HarmonizationReport,
    field: &str,
    mut values: Vec<Option<String>>,
) {
    for value in &mut values {
        if value.as_deref().is_some_and(is_blank) {
            *value = None;
        }
    }
    if !output.fill(field, values) {
        note_dropped(report, field);
    }
}

fn note_dropped(report: &mut HarmonizationReport, field: &str) {
    if report.dropped_fields.insert(field.to_string()) {
        debug!(field = %field, "field not in template, dropping values");
    }
}
