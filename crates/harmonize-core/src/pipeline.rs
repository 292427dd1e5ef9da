//! Harmonization pipeline with ordered step execution.
//!
//! A batch moves through a fixed sequence of stages. Each step implements
//! [`HarmonizationStep`], runs once over every record, and leaves the batch in
//! the stage it names:
//!
//! 1. **BuildBlobsStep** → `BlobsBuilt`: join biomarker columns per record
//! 2. **MergeShippingStep** → `Merged`: left-merge the shipping manifest
//! 3. **ExtractBiomarkersStep** → `BiomarkersExtracted`: biomarker and
//!    menopause calls from the blobs
//! 4. **ComputeFieldsStep** → `ComputedFieldsFilled`: elapsed days, age,
//!    height/weight conversion, BMI
//! 5. **ApplyMappingsStep** → `DirectMappingsApplied`: fixed values, then
//!    direct copies through the transform registry
//! 6. **BackfillRequiredStep** → `RequiredFieldsBackfilled`: "not received"
//!    for required fields still empty
//!
//! Cell-level failures never stop the batch; they leave the cell empty and
//! are counted in the [`HarmonizationReport`].

use std::time::Instant;

use harmonize_model::{ControlledField, HarmonizeOptions, MappingPlan, SynonymCatalog, Template};
use harmonize_transform::{BiomarkerExtractor, MenopauseExtractor, TransformRegistry, UnitConverter};
use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::{debug, info, info_span};

use crate::error::Result;
use crate::frame::{OutputTable, SourceFrame};
use crate::report::HarmonizationReport;
use crate::steps::standard_steps;

/// Where a batch is in its single pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum PipelineStage {
    Initialized,
    BlobsBuilt,
    Merged,
    BiomarkersExtracted,
    ComputedFieldsFilled,
    DirectMappingsApplied,
    RequiredFieldsBackfilled,
    Done,
}

/// A single step of the harmonization pipeline.
pub trait HarmonizationStep: Send + Sync {
    /// Execute this step over the whole batch.
    fn execute(&self, batch: &mut HarmonizationBatch, ctx: &HarmonizationContext<'_>) -> Result<()>;

    /// Human-readable name for this step (for logging/debugging).
    fn step_name(&self) -> &str;

    /// Stage the batch is in once this step has run (or been skipped).
    fn completes(&self) -> PipelineStage;

    /// Whether this step should be skipped based on context.
    fn should_skip(&self, _ctx: &HarmonizationContext<'_>) -> bool {
        false
    }
}

/// Inputs for one run.
#[derive(Debug, Clone, Copy)]
pub struct HarmonizationInput<'a> {
    pub template: &'a Template,
    pub raw: &'a DataFrame,
    pub shipping: Option<&'a DataFrame>,
    pub plan: &'a MappingPlan,
}

impl<'a> HarmonizationInput<'a> {
    pub fn new(template: &'a Template, raw: &'a DataFrame, plan: &'a MappingPlan) -> Self {
        Self {
            template,
            raw,
            shipping: None,
            plan,
        }
    }

    pub fn with_shipping(mut self, shipping: &'a DataFrame) -> Self {
        self.shipping = Some(shipping);
        self
    }
}

/// Read-only collaborators shared by every step of a run.
pub struct HarmonizationContext<'a> {
    pub plan: &'a MappingPlan,
    pub options: &'a HarmonizeOptions,
    pub shipping: Option<&'a SourceFrame>,
    pub biomarkers: &'a BiomarkerExtractor,
    pub menopause: &'a MenopauseExtractor,
    pub registry: &'a TransformRegistry,
    pub units: UnitConverter,
}

/// Mutable state of a batch as it moves through the stages.
#[derive(Debug, Clone)]
pub struct HarmonizationBatch {
    pub stage: PipelineStage,
    /// Raw records, replaced by the merged records once merged.
    pub source: SourceFrame,
    /// One lowercase blob per record.
    pub blobs: Vec<String>,
    pub output: OutputTable,
    pub report: HarmonizationReport,
}

impl HarmonizationBatch {
    pub fn new(source: SourceFrame, template: &Template) -> Self {
        let rows = source.height();
        let report = HarmonizationReport {
            rows,
            template_fields: template.len(),
            stages: vec![PipelineStage::Initialized],
            ..HarmonizationReport::default()
        };
        Self {
            stage: PipelineStage::Initialized,
            output: OutputTable::new(template, rows),
            blobs: vec![String::new(); rows],
            source,
            report,
        }
    }

    fn advance(&mut self, stage: PipelineStage) {
        self.stage = stage;
        self.report.stages.push(stage);
    }
}

/// Result of a run: the output frame and what happened along the way.
#[derive(Debug, Clone)]
pub struct HarmonizedTable {
    pub data: DataFrame,
    pub report: HarmonizationReport,
}

/// Lookups, patterns, and steps built once and reused for any number of
/// batches.
pub struct HarmonizationPipeline {
    options: HarmonizeOptions,
    biomarkers: BiomarkerExtractor,
    menopause: MenopauseExtractor,
    registry: TransformRegistry,
    steps: Vec<Box<dyn HarmonizationStep>>,
}

impl HarmonizationPipeline {
    /// Compiles extraction patterns and the standard transform registry from
    /// `catalog`.
    pub fn new(catalog: &SynonymCatalog, options: HarmonizeOptions) -> Result<Self> {
        let biomarkers = BiomarkerExtractor::new(
            catalog.table(ControlledField::Biomarker),
            catalog.table(ControlledField::PositiveNegative),
            catalog.table(ControlledField::Her2Ihc),
        )?;
        let menopause = MenopauseExtractor::new(catalog.table(ControlledField::Menopause));
        Ok(Self {
            options,
            biomarkers,
            menopause,
            registry: TransformRegistry::from_catalog(catalog),
            steps: standard_steps(),
        })
    }

    /// Replaces the field transform registry.
    pub fn with_registry(mut self, registry: TransformRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn options(&self) -> &HarmonizeOptions {
        &self.options
    }

    pub fn registry(&self) -> &TransformRegistry {
        &self.registry
    }

    /// List step names in execution order.
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|step| step.step_name()).collect()
    }

    /// Runs every step over one batch.
    pub fn run(&self, input: &HarmonizationInput<'_>) -> Result<HarmonizedTable> {
        let span = info_span!(
            "harmonize",
            rows = input.raw.height(),
            fields = input.template.len()
        );
        let _guard = span.enter();
        let started = Instant::now();

        let source = SourceFrame::from_dataframe(input.raw)?;
        let shipping = input
            .shipping
            .map(SourceFrame::from_dataframe)
            .transpose()?;

        let ctx = HarmonizationContext {
            plan: input.plan,
            options: &self.options,
            shipping: shipping.as_ref(),
            biomarkers: &self.biomarkers,
            menopause: &self.menopause,
            registry: &self.registry,
            units: UnitConverter::new(&self.options.height_unit, &self.options.weight_unit),
        };

        let mut batch = HarmonizationBatch::new(source, input.template);
        for (field, mapping) in input.plan.directives() {
            if input.template.contains(field) {
                batch.report.mapped_fields += 1;
            }
            *batch
                .report
                .directives
                .entry(mapping.kind().to_string())
                .or_default() += 1;
        }

        for step in &self.steps {
            let step_start = Instant::now();
            if step.should_skip(&ctx) {
                debug!(step = step.step_name(), "step skipped");
                batch.report.skipped_steps.push(step.step_name().to_string());
            } else {
                step.execute(&mut batch, &ctx)?;
            }
            batch.advance(step.completes());
            info!(
                step = step.step_name(),
                stage = ?batch.stage,
                rows = batch.source.height(),
                duration_ms = step_start.elapsed().as_millis(),
                "step complete"
            );
        }
        batch.advance(PipelineStage::Done);

        let HarmonizationBatch { output, report, .. } = batch;
        let data = output.into_dataframe()?;
        info!(
            rows = report.rows,
            unresolved = report.unresolved_total(),
            backfilled = report.backfilled_cells,
            duration_ms = started.elapsed().as_millis(),
            "harmonization complete"
        );
        Ok(HarmonizedTable { data, report })
    }
}
