//! One harmonization run driven by a job file.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use harmonize_core::{HarmonizationInput, HarmonizationPipeline, HarmonizationReport};
use harmonize_ingest::{
    JobConfig, builtin_catalog, load_synonym_catalog, read_table, read_template, write_table,
};
use harmonize_model::{SynonymCatalog, Template};
use tracing::{info, info_span};

/// What a run produced.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub dataset: String,
    pub output: PathBuf,
    pub report_path: Option<PathBuf>,
    pub report: HarmonizationReport,
}

/// Synonyms from the job's directory, or the built-in tables.
pub fn load_catalog(job: &JobConfig) -> Result<SynonymCatalog> {
    match &job.synonyms_dir {
        Some(dir) => load_synonym_catalog(dir)
            .with_context(|| format!("load synonyms from {}", dir.display())),
        None => Ok(builtin_catalog()),
    }
}

/// The job's template header, or the standard template.
pub fn load_template(job: &JobConfig) -> Result<Template> {
    match &job.inputs.template {
        Some(path) => read_template(path, job.header_rows.template)
            .with_context(|| format!("read template {}", path.display())),
        None => Ok(Template::standard()),
    }
}

/// Path of the JSON run report written next to the output table.
pub fn report_path(job: &JobConfig) -> PathBuf {
    job.output_dir
        .join(format!("{}_harmonization_report.json", job.dataset))
}

/// Reads the job's inputs, runs the pipeline, and writes the results.
pub fn run_job(job: &JobConfig, write_report: bool) -> Result<RunResult> {
    let span = info_span!("run", dataset = %job.dataset);
    let _guard = span.enter();
    let start = Instant::now();

    let catalog = load_catalog(job)?;
    let template = load_template(job)?;
    let raw = read_table(&job.inputs.raw, job.header_rows.raw)
        .with_context(|| format!("read raw data {}", job.inputs.raw.display()))?;
    let shipping = match &job.inputs.shipping {
        Some(path) => Some(
            read_table(path, job.header_rows.shipping)
                .with_context(|| format!("read shipping manifest {}", path.display()))?,
        ),
        None => None,
    };
    let plan = job.mapping_plan().context("build mapping plan")?;

    let pipeline =
        HarmonizationPipeline::new(&catalog, job.options()).context("build pipeline")?;
    let mut input = HarmonizationInput::new(&template, &raw, &plan);
    if let Some(shipping) = &shipping {
        input = input.with_shipping(shipping);
    }
    let mut table = pipeline.run(&input).context("harmonize")?;

    let output = job.output_path();
    write_table(&mut table.data, &output)
        .with_context(|| format!("write {}", output.display()))?;

    let report_path = if write_report {
        let path = report_path(job);
        write_report_json(&table.report, &path)?;
        Some(path)
    } else {
        None
    };

    info!(
        output = %output.display(),
        rows = table.report.rows,
        duration_ms = start.elapsed().as_millis(),
        "run complete"
    );
    Ok(RunResult {
        dataset: job.dataset.clone(),
        output,
        report_path,
        report: table.report,
    })
}

fn write_report_json(report: &HarmonizationReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("serialize report")?;
    std::fs::write(path, json).with_context(|| format!("write {}", path.display()))
}
