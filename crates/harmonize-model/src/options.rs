//! Run options for a harmonization batch.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::template::{DEFAULT_REQUIRED_FIELDS, field_names};
use crate::units::{HeightUnit, WeightUnit};
use crate::unresolved::NOT_RECEIVED;

/// Template fields that the pipeline fills with dedicated logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialFields {
    pub age: String,
    pub collection_date: String,
    pub height: String,
    pub weight: String,
    pub bmi: String,
    pub menopause: String,
}

impl Default for SpecialFields {
    fn default() -> Self {
        Self {
            age: field_names::AGE_AT_COLLECTION.to_string(),
            collection_date: field_names::COLLECTION_DATE.to_string(),
            height: field_names::HEIGHT.to_string(),
            weight: field_names::WEIGHT.to_string(),
            bmi: field_names::BMI.to_string(),
            menopause: field_names::MENOPAUSAL_STATUS.to_string(),
        }
    }
}

/// Options that shape a single run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarmonizeOptions {
    pub height_unit: HeightUnit,
    pub weight_unit: WeightUnit,
    /// Derive menopausal status from the free-text blob.
    pub extract_menopause: bool,
    /// Fields backfilled when still empty at the end of the run.
    pub required_fields: BTreeSet<String>,
    pub special_fields: SpecialFields,
    pub backfill_value: String,
}

impl Default for HarmonizeOptions {
    fn default() -> Self {
        Self {
            height_unit: HeightUnit::default(),
            weight_unit: WeightUnit::default(),
            extract_menopause: true,
            required_fields: DEFAULT_REQUIRED_FIELDS
                .iter()
                .map(|name| (*name).to_string())
                .collect(),
            special_fields: SpecialFields::default(),
            backfill_value: NOT_RECEIVED.to_string(),
        }
    }
}

impl HarmonizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_units(mut self, height: HeightUnit, weight: WeightUnit) -> Self {
        self.height_unit = height;
        self.weight_unit = weight;
        self
    }

    pub fn with_menopause_extraction(mut self, enabled: bool) -> Self {
        self.extract_menopause = enabled;
        self
    }

    pub fn with_required_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_required(&self, field: &str) -> bool {
        self.required_fields.contains(field)
    }
}
