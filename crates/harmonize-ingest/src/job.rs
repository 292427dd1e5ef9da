//! Job files: one TOML document per harmonization run.
//!
//! ```toml
//! dataset = "BRC-2024-07"
//! output_dir = "out"
//! height_unit = "inches"
//! weight_unit = "lbs"
//! biomarker_columns = ["Pathology Notes", "IHC Results"]
//!
//! [inputs]
//! template = "template.csv"
//! raw = "raw.csv"
//! shipping = "manifest.csv"
//!
//! [header_rows]
//! shipping = 10
//!
//! [join]
//! raw_key = "Subject ID"
//! shipping_key = "Subject"
//!
//! [fields]
//! "Tube Barcode" = { column = "Barcode" }
//! Country = { fixed = "USA" }
//! "Duration between Diagnosis and Sample Collection (days)" = { start = "Diagnosis Date", end = "Draw Date" }
//! "Donor Notes" = "not_received"
//! ```
//!
//! Relative paths are resolved against the job file's directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use harmonize_model::{FieldMapping, HarmonizeOptions, HeightUnit, JoinKeys, MappingPlan, WeightUnit};
use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};

/// How one template field is filled, as written in a job file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldDirective {
    Column { column: String },
    Fixed { fixed: String },
    Computed { start: String, end: String },
    Marker(DirectiveMarker),
}

/// Bare-string directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectiveMarker {
    NotReceived,
}

impl From<FieldDirective> for FieldMapping {
    fn from(directive: FieldDirective) -> Self {
        match directive {
            FieldDirective::Column { column } => FieldMapping::Direct(column),
            FieldDirective::Fixed { fixed } => FieldMapping::Fixed(fixed),
            FieldDirective::Computed { start, end } => FieldMapping::Computed { start, end },
            FieldDirective::Marker(DirectiveMarker::NotReceived) => FieldMapping::NotReceived,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputPaths {
    pub template: Option<PathBuf>,
    pub raw: PathBuf,
    pub shipping: Option<PathBuf>,
}

/// Rows to skip before each sheet's header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderRows {
    pub raw: usize,
    pub template: usize,
    pub shipping: usize,
}

impl Default for HeaderRows {
    fn default() -> Self {
        Self {
            raw: 1,
            template: 1,
            shipping: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinConfig {
    pub raw_key: String,
    pub shipping_key: String,
}

fn default_extract_menopause() -> bool {
    true
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// A parsed job file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    pub dataset: String,
    pub inputs: InputPaths,
    #[serde(default)]
    pub header_rows: HeaderRows,
    #[serde(default)]
    pub join: Option<JoinConfig>,
    #[serde(default)]
    pub height_unit: HeightUnit,
    #[serde(default)]
    pub weight_unit: WeightUnit,
    #[serde(default)]
    pub biomarker_columns: Vec<String>,
    #[serde(default = "default_extract_menopause")]
    pub extract_menopause: bool,
    /// Replaces the default required-field set when present.
    #[serde(default)]
    pub required_fields: Option<Vec<String>>,
    #[serde(default)]
    pub synonyms_dir: Option<PathBuf>,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldDirective>,
}

impl JobConfig {
    pub fn from_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| IngestError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Mapping directives, biomarker columns, and join keys for the run.
    pub fn mapping_plan(&self) -> Result<MappingPlan> {
        let mut plan = MappingPlan::new().with_biomarker_columns(self.biomarker_columns.iter().cloned());
        for (field, directive) in &self.fields {
            plan.map(field.clone(), directive.clone().into())?;
        }
        if let Some(join) = &self.join {
            plan = plan.with_join_keys(JoinKeys::new(join.raw_key.clone(), join.shipping_key.clone())?);
        }
        Ok(plan)
    }

    pub fn options(&self) -> HarmonizeOptions {
        let options = HarmonizeOptions::new()
            .with_units(self.height_unit.clone(), self.weight_unit.clone())
            .with_menopause_extraction(self.extract_menopause);
        match &self.required_fields {
            Some(fields) => options.with_required_fields(fields.iter().cloned()),
            None => options,
        }
    }

    /// Output file for the harmonized table.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}_formatted_auto.csv", self.dataset))
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        resolve(&mut self.inputs.raw);
        if let Some(path) = self.inputs.template.as_mut() {
            resolve(path);
        }
        if let Some(path) = self.inputs.shipping.as_mut() {
            resolve(path);
        }
        if let Some(path) = self.synonyms_dir.as_mut() {
            resolve(path);
        }
        resolve(&mut self.output_dir);
    }
}

/// Reads a job file and resolves its relative paths.
pub fn load_job(path: &Path) -> Result<JobConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| IngestError::read(path, e))?;
    let mut job = JobConfig::from_toml(&content, path)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    job.resolve_paths(base);
    Ok(job)
}

#[cfg(test)]
mod tests {
    use super::*;

    const JOB: &str = r#"
dataset = "BRC"
height_unit = "inches"
biomarker_columns = ["Notes"]

[inputs]
raw = "raw.csv"

[join]
raw_key = "Subject ID"
shipping_key = "Subject"

[fields]
Gender = { column = "Sex" }
Country = { fixed = "USA" }
"Days to Surgery" = { start = "Draw Date", end = "Surgery" }
"Donor Notes" = "not_received"
"#;

    #[test]
    fn parses_every_directive_form() {
        let job = JobConfig::from_toml(JOB, Path::new("job.toml")).unwrap();
        assert_eq!(job.header_rows, HeaderRows::default());
        assert_eq!(job.height_unit, HeightUnit::Inches);
        assert_eq!(job.weight_unit, WeightUnit::Kilograms);
        assert!(job.extract_menopause);

        let plan = job.mapping_plan().unwrap();
        assert_eq!(plan.len(), 4);
        assert_eq!(plan.direct_source("Gender"), Some("Sex"));
        assert_eq!(plan.directive("Country"), Some(&FieldMapping::Fixed("USA".into())));
        assert!(plan.is_not_received("Donor Notes"));
        assert_eq!(plan.calculations().len(), 1);
        assert_eq!(plan.join_keys().unwrap().shipping_column, "Subject");
        assert_eq!(plan.biomarker_columns(), ["Notes"]);
    }

    #[test]
    fn output_file_is_named_after_dataset() {
        let job = JobConfig::from_toml(JOB, Path::new("job.toml")).unwrap();
        assert_eq!(job.output_path(), PathBuf::from("./BRC_formatted_auto.csv"));
    }

    #[test]
    fn unknown_directive_is_rejected() {
        let toml = "dataset = \"x\"\n[inputs]\nraw = \"r.csv\"\n[fields]\nGender = 5\n";
        let result = JobConfig::from_toml(toml, Path::new("job.toml"));
        assert!(matches!(result, Err(IngestError::Toml { .. })));
    }

    #[test]
    fn empty_join_key_is_a_model_error() {
        let toml = "dataset = \"x\"\n[inputs]\nraw = \"r.csv\"\n[join]\nraw_key = \" \"\nshipping_key = \"S\"\n";
        let job = JobConfig::from_toml(toml, Path::new("job.toml")).unwrap();
        assert!(matches!(job.mapping_plan(), Err(IngestError::Model(_))));
    }
}
