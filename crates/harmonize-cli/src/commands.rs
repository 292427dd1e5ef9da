use anyhow::{Context, Result, anyhow};
use comfy_table::{Cell, CellAlignment, Table};
use tracing::debug;

use harmonize_cli::run::{RunResult, run_job};
use harmonize_ingest::{builtin_catalog, load_job, load_synonym_catalog};
use harmonize_model::{ControlledField, DEFAULT_REQUIRED_FIELDS, SynonymCatalog, TEMPLATE_FIELDS};

use crate::cli::{RunArgs, SynonymsArgs};
use crate::summary::{align_column, apply_table_style, dim_cell, header_cell};

pub fn run_harmonize(args: &RunArgs) -> Result<RunResult> {
    let mut job = load_job(&args.job)
        .with_context(|| format!("load job {}", args.job.display()))?;
    if let Some(dir) = &args.output_dir {
        debug!(output_dir = %dir.display(), "output directory overridden");
        job.output_dir = dir.clone();
    }
    if let Some(dataset) = &args.dataset {
        job.dataset = dataset.clone();
    }
    run_job(&job, !args.no_report)
}

pub fn run_fields() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Allowed values"),
        header_cell("Required"),
        header_cell("Computed"),
        header_cell("Definition"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    align_column(&mut table, 3, CellAlignment::Center);
    for spec in TEMPLATE_FIELDS {
        let allowed = if spec.allowed.is_empty() {
            dim_cell("free text")
        } else {
            Cell::new(spec.allowed.join(", "))
        };
        table.add_row(vec![
            Cell::new(spec.name),
            allowed,
            flag_cell(DEFAULT_REQUIRED_FIELDS.contains(&spec.name)),
            flag_cell(spec.computable),
            Cell::new(spec.definition),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_synonyms(args: &SynonymsArgs) -> Result<()> {
    let catalog = match &args.dir {
        Some(dir) => load_synonym_catalog(dir)
            .with_context(|| format!("load synonyms from {}", dir.display()))?,
        None => builtin_catalog(),
    };
    match &args.table {
        Some(name) => print_table_entries(&catalog, name),
        None => {
            print_catalog(&catalog);
            Ok(())
        }
    }
}

fn print_catalog(catalog: &SynonymCatalog) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Labels"),
        header_cell("Variants"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for field in ControlledField::ALL {
        match catalog.get(field) {
            Some(synonyms) => table.add_row(vec![
                Cell::new(field.table_name()),
                Cell::new(synonyms.len()),
                Cell::new(synonyms.variant_count()),
            ]),
            None => table.add_row(vec![
                Cell::new(field.table_name()),
                dim_cell("-"),
                dim_cell("-"),
            ]),
        };
    }
    println!("{table}");
}

fn print_table_entries(catalog: &SynonymCatalog, name: &str) -> Result<()> {
    let field = ControlledField::from_table_name(name)
        .ok_or_else(|| anyhow!("unknown synonym table: {name}"))?;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell(field.standard_column()),
        header_cell("Synonyms"),
    ]);
    apply_table_style(&mut table);
    for entry in catalog.table(field).entries() {
        table.add_row(vec![
            Cell::new(&entry.canonical),
            Cell::new(entry.variants.join(", ")),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn flag_cell(value: bool) -> Cell {
    if value {
        Cell::new("✓")
    } else {
        dim_cell("-")
    }
}
