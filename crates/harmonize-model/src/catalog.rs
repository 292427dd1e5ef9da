//! The set of synonym tables a harmonization run consults.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::synonym::SynonymTable;

static EMPTY_TABLE: LazyLock<SynonymTable> = LazyLock::new(SynonymTable::new);

/// Every controlled vocabulary the harmonizer knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlledField {
    /// Marker names searched for in the free-text blob.
    Biomarker,
    /// Positive/negative/mutated calls for biomarker values.
    PositiveNegative,
    /// HER2 immunohistochemistry scores.
    Her2Ihc,
    /// Menopausal status keywords.
    Menopause,
    Stabilizer,
    Gender,
    SingleDoubleSpun,
    SampleTimepoint,
    Stage,
    Hemolysis,
    Race,
    SmokingHistory,
}

impl ControlledField {
    pub const ALL: [ControlledField; 12] = [
        ControlledField::Biomarker,
        ControlledField::PositiveNegative,
        ControlledField::Her2Ihc,
        ControlledField::Menopause,
        ControlledField::Stabilizer,
        ControlledField::Gender,
        ControlledField::SingleDoubleSpun,
        ControlledField::SampleTimepoint,
        ControlledField::Stage,
        ControlledField::Hemolysis,
        ControlledField::Race,
        ControlledField::SmokingHistory,
    ];

    /// Table name used for synonym files (`<table_name>.csv`).
    pub fn table_name(self) -> &'static str {
        match self {
            ControlledField::Biomarker => "biomarker_mappings",
            ControlledField::PositiveNegative => "pos_neg_mappings",
            ControlledField::Her2Ihc => "her2_ihc_mappings",
            ControlledField::Menopause => "menopause_mappings",
            ControlledField::Stabilizer => "stabilizer_mappings",
            ControlledField::Gender => "gender_mappings",
            ControlledField::SingleDoubleSpun => "single_double_mappings",
            ControlledField::SampleTimepoint => "sample_timepoint_mappings",
            ControlledField::Stage => "stage_mappings",
            ControlledField::Hemolysis => "hemolysis_mappings",
            ControlledField::Race => "race_mappings",
            ControlledField::SmokingHistory => "smoking_history_mappings",
        }
    }

    /// Column holding the canonical label in a synonym file.
    pub fn standard_column(self) -> &'static str {
        match self {
            ControlledField::Biomarker => "standard_name",
            ControlledField::Menopause => "standard_term",
            _ => "standard_value",
        }
    }

    pub fn from_table_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.table_name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for ControlledField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ControlledField::Biomarker => "Biomarker",
            ControlledField::PositiveNegative => "Positive/Negative",
            ControlledField::Her2Ihc => "HER2 IHC",
            ControlledField::Menopause => "Menopause",
            ControlledField::Stabilizer => "Stabilizer",
            ControlledField::Gender => "Gender",
            ControlledField::SingleDoubleSpun => "Single or Double Spun",
            ControlledField::SampleTimepoint => "Sample Timepoint",
            ControlledField::Stage => "Stage",
            ControlledField::Hemolysis => "Hemolysis",
            ControlledField::Race => "Race",
            ControlledField::SmokingHistory => "Smoking History",
        };
        f.write_str(label)
    }
}

/// Synonym tables keyed by the vocabulary they serve.
#[derive(Debug, Clone, Default)]
pub struct SynonymCatalog {
    tables: BTreeMap<ControlledField, SynonymTable>,
}

impl SynonymCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, field: ControlledField, table: SynonymTable) -> Self {
        self.insert(field, table);
        self
    }

    /// Replaces the table for `field`.
    pub fn insert(&mut self, field: ControlledField, table: SynonymTable) {
        self.tables.insert(field, table);
    }

    pub fn get(&self, field: ControlledField) -> Option<&SynonymTable> {
        self.tables.get(&field)
    }

    /// Table for `field`, or an empty table when none is loaded.
    pub fn table(&self, field: ControlledField) -> &SynonymTable {
        self.tables.get(&field).unwrap_or(&EMPTY_TABLE)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ControlledField, &SynonymTable)> {
        self.tables.iter().map(|(field, table)| (*field, table))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
