//! End-to-end runs of job files.

use std::fs;
use std::path::Path;

use harmonize_cli::run::{load_catalog, load_template, run_job};
use harmonize_ingest::load_job;
use harmonize_model::{ControlledField, Template};
use tempfile::TempDir;

const JOB: &str = r#"
dataset = "BRC"
output_dir = "out"
height_unit = "inches"
biomarker_columns = ["Notes"]
required_fields = ["Tube Barcode"]

[inputs]
template = "template.csv"
raw = "raw.csv"
shipping = "manifest.csv"

[header_rows]
raw = 0
template = 0
shipping = 0

[join]
raw_key = "Subject ID"
shipping_key = "Subject"

[fields]
Subject = { column = "Subject ID" }
Gender = { column = "Sex" }
Country = { fixed = "USA" }
"Tube Barcode" = { column = "Barcode" }
Height = { column = "Height" }
"#;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "template.csv",
        "Subject,Gender,Country,ER,Tube Barcode,Height\n",
    );
    write(
        dir.path(),
        "raw.csv",
        "Subject ID,Sex,Notes,Height\nS1,F,ER = positive,70\nS2,m,,\n",
    );
    write(dir.path(), "manifest.csv", "Subject,Barcode\nS1,TB-001\n");
    write(dir.path(), "job.toml", JOB);
    dir
}

#[test]
fn job_writes_harmonized_table() {
    let dir = workspace();
    let job = load_job(&dir.path().join("job.toml")).unwrap();
    let result = run_job(&job, false).unwrap();

    assert_eq!(result.output, dir.path().join("out").join("BRC_formatted_auto.csv"));
    assert!(result.report_path.is_none());
    let written = fs::read_to_string(&result.output).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines[0], "Subject,Gender,Country,ER,Tube Barcode,Height");
    assert_eq!(lines[1], "S1,Female,USA,positive,TB-001,177.8");
    assert_eq!(lines[2], "S2,Male,USA,,not received,");
    assert_eq!(lines.len(), 3);
}

#[test]
fn report_is_written_next_to_output() {
    let dir = workspace();
    let job = load_job(&dir.path().join("job.toml")).unwrap();
    let result = run_job(&job, true).unwrap();

    let path = result.report_path.unwrap();
    assert_eq!(path, dir.path().join("out").join("BRC_harmonization_report.json"));
    let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(report["rows"], 2);
    assert_eq!(report["merged_rows"], 1);
    assert_eq!(report["template_fields"], 6);
    assert_eq!(report["mapped_fields"], 5);
    assert_eq!(report["backfilled_cells"], 1);
    assert_eq!(result.report.biomarker_hits.get("ER"), Some(&1));
}

#[test]
fn missing_raw_sheet_names_the_file() {
    let dir = workspace();
    fs::remove_file(dir.path().join("raw.csv")).unwrap();
    let job = load_job(&dir.path().join("job.toml")).unwrap();

    let error = run_job(&job, false).unwrap_err();
    assert!(format!("{error:#}").contains("raw.csv"));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn defaults_without_template_or_synonym_dir() {
    let dir = workspace();
    let mut job = load_job(&dir.path().join("job.toml")).unwrap();
    job.inputs.template = None;

    assert_eq!(load_template(&job).unwrap(), Template::standard());
    let catalog = load_catalog(&job).unwrap();
    assert_eq!(
        catalog.table(ControlledField::Gender).lookup("female"),
        Ok("Female")
    );
}

#[test]
fn synonym_dir_replaces_builtin_table() {
    let dir = workspace();
    fs::create_dir(dir.path().join("synonyms")).unwrap();
    write(
        &dir.path().join("synonyms"),
        "gender_mappings.csv",
        "standard_value,synonym\nF,f\nM,m\n",
    );
    fs::write(
        dir.path().join("job.toml"),
        format!("synonyms_dir = \"synonyms\"\n{JOB}"),
    )
    .unwrap();
    let job = load_job(&dir.path().join("job.toml")).unwrap();
    let result = run_job(&job, false).unwrap();

    let written = fs::read_to_string(&result.output).unwrap();
    assert!(written.lines().nth(1).unwrap().starts_with("S1,F,USA,"));
}
