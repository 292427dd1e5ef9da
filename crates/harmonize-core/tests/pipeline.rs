//! End-to-end tests for the harmonization pipeline.

use harmonize_core::{HarmonizationInput, HarmonizationPipeline, HarmonizedTable, PipelineStage};
use harmonize_model::{
    ControlledField, FieldMapping, HarmonizeOptions, HeightUnit, JoinKeys, MappingPlan,
    SynonymCatalog, SynonymTable, Template, WeightUnit,
};
use harmonize_transform::TransformRegistry;
use polars::df;
use polars::prelude::DataFrame;

fn catalog() -> SynonymCatalog {
    SynonymCatalog::new()
        .with_table(
            ControlledField::Biomarker,
            SynonymTable::build([
                ("HER2", vec!["her2"]),
                ("ER", vec!["er"]),
                ("PR", vec!["pr"]),
                ("HER2 FISH", vec!["fish"]),
            ]),
        )
        .with_table(
            ControlledField::PositiveNegative,
            SynonymTable::build([
                ("positive", vec!["positive", "pos"]),
                ("negative", vec!["negative", "neg"]),
            ]),
        )
        .with_table(
            ControlledField::Her2Ihc,
            SynonymTable::build([("3+", vec!["3+"]), ("0", vec!["0"])]),
        )
        .with_table(
            ControlledField::Menopause,
            SynonymTable::build([
                ("premenopause", vec!["pre menopause"]),
                ("postmenopause", vec!["post menopause"]),
            ]),
        )
        .with_table(
            ControlledField::Gender,
            SynonymTable::build([("Female", vec!["f", "female"]), ("Male", vec!["m", "male"])]),
        )
}

fn template() -> Template {
    Template::new([
        "Subject",
        "Gender",
        "ER",
        "ER Value",
        "PR",
        "HER2",
        "HER2 IHC",
        "HER2 Value",
        "Menopausal Status",
        "AgeAtCollection",
        "Date of Blood Draw/Cell Collection",
        "Height",
        "Weight",
        "BMI",
        "Country",
        "Tube Barcode",
        "Days to Surgery",
    ])
}

fn raw() -> DataFrame {
    df!(
        "Subject ID" => ["S1", "S2", "S3"],
        "Sex" => ["F", "m", "x"],
        "Notes" => [
            "ER = Positive PR = neg",
            "HER2 = 2+ FISH = positive",
            "HER2 = 2+ post menopause",
        ],
        "Age" => [Some("1970"), Some("45"), None],
        "Draw Date" => ["2020-01-01", "03/04/2021", "bad"],
        "Surgery" => [Some("2020-01-11"), Some("2021-03-01"), None],
        "Height" => [Some("70"), None, Some("65")],
        "Weight" => [Some("154"), None, Some("130")],
    )
    .unwrap()
}

fn shipping() -> DataFrame {
    df!(
        "Subject" => ["S3", "S1"],
        "Tube Barcode" => ["TB-3", "TB-1"],
    )
    .unwrap()
}

fn plan() -> MappingPlan {
    MappingPlan::new()
        .with_mapping("Subject", FieldMapping::Direct("Subject ID".into()))
        .unwrap()
        .with_mapping("Gender", FieldMapping::Direct("Sex".into()))
        .unwrap()
        .with_mapping("AgeAtCollection", FieldMapping::Direct("Age".into()))
        .unwrap()
        .with_mapping(
            "Date of Blood Draw/Cell Collection",
            FieldMapping::Direct("Draw Date".into()),
        )
        .unwrap()
        .with_mapping("Height", FieldMapping::Direct("Height".into()))
        .unwrap()
        .with_mapping("Weight", FieldMapping::Direct("Weight".into()))
        .unwrap()
        .with_mapping("Country", FieldMapping::Fixed("USA".into()))
        .unwrap()
        .with_mapping("Tube Barcode", FieldMapping::Direct("Tube Barcode".into()))
        .unwrap()
        .with_mapping(
            "Days to Surgery",
            FieldMapping::Computed {
                start: "Draw Date".into(),
                end: "Surgery".into(),
            },
        )
        .unwrap()
        .with_biomarker_columns(["Notes"])
        .with_join_keys(JoinKeys::new("Subject ID", "Subject").unwrap())
}

fn options() -> HarmonizeOptions {
    HarmonizeOptions::new()
        .with_units(HeightUnit::Inches, WeightUnit::Pounds)
        .with_required_fields(["HER2", "Tube Barcode", "Gender", "Menopausal Status"])
}

fn run_full() -> HarmonizedTable {
    let pipeline = HarmonizationPipeline::new(&catalog(), options()).unwrap();
    let template = template();
    let raw = raw();
    let shipping = shipping();
    let plan = plan();
    pipeline
        .run(&HarmonizationInput::new(&template, &raw, &plan).with_shipping(&shipping))
        .unwrap()
}

fn cell(table: &HarmonizedTable, field: &str, row: usize) -> Option<String> {
    table
        .data
        .column(field)
        .unwrap()
        .str()
        .unwrap()
        .get(row)
        .map(str::to_string)
}

#[test]
fn output_columns_are_the_template_fields() {
    let table = run_full();
    let names: Vec<String> = table
        .data
        .get_column_names()
        .iter()
        .map(|name| name.as_str().to_string())
        .collect();
    assert_eq!(names, template().fields());
    assert_eq!(table.data.height(), 3);
}

#[test]
fn biomarker_values_stop_at_next_marker() {
    let table = run_full();
    assert_eq!(cell(&table, "ER", 0).as_deref(), Some("positive"));
    assert_eq!(cell(&table, "ER Value", 0).as_deref(), Some("positive"));
    assert_eq!(cell(&table, "PR", 0).as_deref(), Some("negative"));
}

#[test]
fn her2_equivocal_uses_fish_or_flags_it() {
    let table = run_full();
    assert_eq!(cell(&table, "HER2", 1).as_deref(), Some("positive"));
    assert_eq!(cell(&table, "HER2 Value", 1).as_deref(), Some("2+"));
    assert_eq!(cell(&table, "HER2 IHC", 1).as_deref(), Some("2+"));
    assert_eq!(
        cell(&table, "HER2", 2).as_deref(),
        Some("HER2 2+ (FISH/ISH missing)")
    );
}

#[test]
fn menopause_comes_from_the_blob() {
    let table = run_full();
    assert_eq!(cell(&table, "Menopausal Status", 2).as_deref(), Some("postmenopause"));
    assert_eq!(cell(&table, "Menopausal Status", 0).as_deref(), Some("not received"));
    assert_eq!(table.report.menopause_hits, 1);
}

#[test]
fn merge_keeps_unmatched_rows() {
    let table = run_full();
    assert_eq!(table.report.merged_rows, Some(2));
    assert_eq!(cell(&table, "Tube Barcode", 0).as_deref(), Some("TB-1"));
    assert_eq!(cell(&table, "Tube Barcode", 1).as_deref(), Some("not received"));
    assert_eq!(cell(&table, "Tube Barcode", 2).as_deref(), Some("TB-3"));
    assert_eq!(cell(&table, "Subject", 1).as_deref(), Some("S2"));
}

#[test]
fn fixed_direct_and_cleaned_values() {
    let table = run_full();
    for row in 0..3 {
        assert_eq!(cell(&table, "Country", row).as_deref(), Some("USA"));
    }
    assert_eq!(cell(&table, "Gender", 0).as_deref(), Some("Female"));
    assert_eq!(cell(&table, "Gender", 1).as_deref(), Some("Male"));
    assert_eq!(cell(&table, "Gender", 2).as_deref(), Some("not received"));
    assert_eq!(
        cell(&table, "Date of Blood Draw/Cell Collection", 1).as_deref(),
        Some("2021-March-04")
    );
    assert_eq!(cell(&table, "Date of Blood Draw/Cell Collection", 2), None);
    assert_eq!(table.report.unresolved_cells.get("Gender"), Some(&1));
}

#[test]
fn computed_fields() {
    let table = run_full();
    assert_eq!(cell(&table, "AgeAtCollection", 0).as_deref(), Some("50"));
    assert_eq!(cell(&table, "AgeAtCollection", 1).as_deref(), Some("45"));
    assert_eq!(cell(&table, "AgeAtCollection", 2), None);

    assert_eq!(cell(&table, "Days to Surgery", 0).as_deref(), Some("10"));
    assert_eq!(cell(&table, "Days to Surgery", 1), None);
    assert_eq!(table.report.unresolved_cells.get("Days to Surgery"), Some(&1));

    assert_eq!(cell(&table, "Height", 0).as_deref(), Some("177.8"));
    assert_eq!(cell(&table, "Weight", 0).as_deref(), Some("69.85"));
    assert_eq!(cell(&table, "BMI", 0).as_deref(), Some("22.1"));
    assert_eq!(cell(&table, "Height", 2).as_deref(), Some("165.1"));
    assert_eq!(cell(&table, "BMI", 2).as_deref(), Some("21.63"));
    assert_eq!(cell(&table, "BMI", 1), None);
}

#[test]
fn required_fields_are_never_empty() {
    let table = run_full();
    for field in ["HER2", "Tube Barcode", "Gender", "Menopausal Status"] {
        for row in 0..table.data.height() {
            let value = cell(&table, field, row);
            assert!(value.is_some_and(|v| !v.trim().is_empty()), "{field} row {row}");
        }
    }
    assert_eq!(cell(&table, "HER2", 0).as_deref(), Some("not received"));
    assert!(table.report.backfilled_cells >= 4);
}

#[test]
fn blank_extractions_and_fixed_values_are_backfilled() {
    let template = Template::new(["ER", "ER Value", "PR", "HER2", "Country"]);
    let raw = df!("Notes" => ["pr = negative er =", "her2 ="]).unwrap();
    let plan = MappingPlan::new()
        .with_mapping("Country", FieldMapping::Fixed("  ".into()))
        .unwrap()
        .with_biomarker_columns(["Notes"]);
    let options = HarmonizeOptions::new().with_required_fields(["ER", "HER2", "Country"]);
    let pipeline = HarmonizationPipeline::new(&catalog(), options).unwrap();
    let table = pipeline
        .run(&HarmonizationInput::new(&template, &raw, &plan))
        .unwrap();

    for field in ["ER", "HER2", "Country"] {
        for row in 0..2 {
            assert_eq!(
                cell(&table, field, row).as_deref(),
                Some("not received"),
                "{field} row {row}"
            );
        }
    }
    assert_eq!(cell(&table, "PR", 0).as_deref(), Some("negative"));
    assert_eq!(cell(&table, "ER Value", 0), None);
    assert_eq!(table.report.backfilled_cells, 6);
    assert!(!table.report.biomarker_hits.contains_key("ER"));
}

#[test]
fn keys_outside_the_template_are_dropped() {
    let table = run_full();
    assert!(table.data.column("HER2 FISH").is_err());
    assert!(table.report.dropped_fields.contains("HER2 FISH"));
    assert!(table.report.dropped_fields.contains("PR Value"));
}

#[test]
fn stages_run_in_order() {
    let table = run_full();
    assert_eq!(
        table.report.stages,
        [
            PipelineStage::Initialized,
            PipelineStage::BlobsBuilt,
            PipelineStage::Merged,
            PipelineStage::BiomarkersExtracted,
            PipelineStage::ComputedFieldsFilled,
            PipelineStage::DirectMappingsApplied,
            PipelineStage::RequiredFieldsBackfilled,
            PipelineStage::Done,
        ]
    );
    assert_eq!(table.report.final_stage(), Some(PipelineStage::Done));
    assert!(table.report.skipped_steps.is_empty());
}

#[test]
fn merge_is_skipped_without_manifest() {
    let pipeline = HarmonizationPipeline::new(&catalog(), options()).unwrap();
    let template = template();
    let raw = raw();
    let plan = plan();
    let table = pipeline
        .run(&HarmonizationInput::new(&template, &raw, &plan))
        .unwrap();

    assert_eq!(table.report.merged_rows, None);
    assert_eq!(table.report.skipped_steps, ["merge_shipping"]);
    assert!(table.report.missing_columns.contains("Tube Barcode"));
    assert!(table.report.stages.contains(&PipelineStage::Merged));
    assert_eq!(cell(&table, "Tube Barcode", 0).as_deref(), Some("not received"));
}

#[test]
fn not_received_directive_backfills_only_empty_cells() {
    let template = Template::new(["Donor Notes", "Country"]);
    let raw = df!("Notes" => [Some("seen"), None]).unwrap();
    let plan = MappingPlan::new()
        .with_mapping("Donor Notes", FieldMapping::NotReceived)
        .unwrap()
        .with_mapping("Country", FieldMapping::Fixed("USA".into()))
        .unwrap();
    let options = HarmonizeOptions::new().with_required_fields(Vec::<String>::new());
    let pipeline = HarmonizationPipeline::new(&catalog(), options).unwrap();
    let table = pipeline
        .run(&HarmonizationInput::new(&template, &raw, &plan))
        .unwrap();

    assert_eq!(cell(&table, "Donor Notes", 0).as_deref(), Some("not received"));
    assert_eq!(cell(&table, "Donor Notes", 1).as_deref(), Some("not received"));
    assert_eq!(cell(&table, "Country", 1).as_deref(), Some("USA"));
    assert_eq!(table.report.backfilled_cells, 2);
    assert_eq!(table.report.skipped_steps, ["build_blobs", "merge_shipping"]);
}

#[test]
fn menopause_extraction_can_be_disabled() {
    let options = options()
        .with_menopause_extraction(false)
        .with_required_fields(["HER2"]);
    let pipeline = HarmonizationPipeline::new(&catalog(), options).unwrap();
    let template = template();
    let raw = raw();
    let plan = plan();
    let table = pipeline
        .run(&HarmonizationInput::new(&template, &raw, &plan))
        .unwrap();
    assert_eq!(cell(&table, "Menopausal Status", 2), None);
    assert_eq!(table.report.menopause_hits, 0);
}

#[test]
fn custom_registry_replaces_cleaners() {
    let pipeline = HarmonizationPipeline::new(&catalog(), options())
        .unwrap()
        .with_registry(TransformRegistry::new());
    let template = template();
    let raw = raw();
    let plan = plan();
    let table = pipeline
        .run(&HarmonizationInput::new(&template, &raw, &plan))
        .unwrap();
    assert_eq!(cell(&table, "Gender", 2).as_deref(), Some("x"));
    assert_eq!(
        cell(&table, "Date of Blood Draw/Cell Collection", 0).as_deref(),
        Some("2020-01-01")
    );
}

#[test]
fn report_summarizes_the_run() {
    let table = run_full();
    let report = &table.report;
    assert_eq!(report.rows, 3);
    assert_eq!(report.template_fields, 17);
    assert_eq!(report.mapped_fields, 9);
    assert_eq!(report.directives.get("direct"), Some(&7));
    assert_eq!(report.directives.get("fixed"), Some(&1));
    assert_eq!(report.directives.get("computed"), Some(&1));
    assert_eq!(report.biomarker_hits.get("HER2"), Some(&2));
    assert_eq!(report.biomarker_hits.get("ER"), Some(&1));

    let json = serde_json::to_value(report).unwrap();
    assert_eq!(json["rows"], 3);
    assert_eq!(json["stages"][0], "Initialized");
}

#[test]
fn step_names_follow_execution_order() {
    let pipeline = HarmonizationPipeline::new(&catalog(), HarmonizeOptions::default()).unwrap();
    assert_eq!(
        pipeline.step_names(),
        [
            "build_blobs",
            "merge_shipping",
            "extract_biomarkers",
            "compute_fields",
            "apply_mappings",
            "backfill_required",
        ]
    );
}
