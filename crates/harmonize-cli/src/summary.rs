use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use harmonize_cli::run::RunResult;
use harmonize_core::HarmonizationReport;

pub fn print_summary(result: &RunResult) {
    let report = &result.report;
    println!("Dataset: {}", result.dataset);
    println!("Output: {}", result.output.display());
    if let Some(path) = &result.report_path {
        println!("Run report: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Records"), Cell::new(report.rows)]);
    table.add_row(vec![
        Cell::new("Mapped fields"),
        Cell::new(format!(
            "{}/{} ({:.0}%)",
            report.mapped_fields,
            report.template_fields,
            report.coverage() * 100.0
        )),
    ]);
    table.add_row(vec![
        Cell::new("Manifest matches"),
        match report.merged_rows {
            Some(count) => Cell::new(count),
            None => dim_cell("-"),
        },
    ]);
    for (kind, count) in &report.directives {
        table.add_row(vec![Cell::new(format!("Directives: {kind}")), Cell::new(count)]);
    }
    for (marker, count) in &report.biomarker_hits {
        table.add_row(vec![Cell::new(format!("Biomarker: {marker}")), Cell::new(count)]);
    }
    table.add_row(vec![Cell::new("Menopause hits"), Cell::new(report.menopause_hits)]);
    table.add_row(vec![
        Cell::new("Unresolved cells"),
        count_cell(report.unresolved_total(), Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Backfilled cells"),
        Cell::new(report.backfilled_cells),
    ]);
    println!("{table}");

    print_unresolved_table(report);
    if !report.missing_columns.is_empty() {
        eprintln!("Missing source columns:");
        for column in &report.missing_columns {
            eprintln!("- {column}");
        }
    }
    if !report.skipped_steps.is_empty() {
        println!("Skipped steps: {}", report.skipped_steps.join(", "));
    }
}

fn print_unresolved_table(report: &HarmonizationReport) {
    if report.unresolved_cells.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Unresolved")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (field, count) in &report.unresolved_cells {
        table.add_row(vec![Cell::new(field), count_cell(*count, Color::Yellow)]);
    }
    println!();
    println!("Unresolved values:");
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

pub fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

pub fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
