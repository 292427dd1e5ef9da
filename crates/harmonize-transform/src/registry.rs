//! Field-level transform registry.
//!
//! Direct mappings copy a source column into a template field; when the field
//! has a registered transform every non-empty cell goes through it first.

use std::collections::BTreeMap;

use harmonize_model::template::field_names;
use harmonize_model::{ControlledField, Resolution, SynonymCatalog};

use crate::normalization::{Cleaner, normalize_date, normalize_time};

/// A normalizer bound to a template field.
#[derive(Debug, Clone)]
pub enum FieldTransform {
    Date,
    Time,
    Clean(Cleaner),
}

impl FieldTransform {
    pub fn apply(&self, value: &str) -> Resolution<String> {
        match self {
            FieldTransform::Date => normalize_date(value),
            FieldTransform::Time => normalize_time(value),
            FieldTransform::Clean(cleaner) => cleaner.clean(value),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FieldTransform::Date => "date",
            FieldTransform::Time => "time",
            FieldTransform::Clean(_) => "synonym",
        }
    }
}

/// Template field name to transform.
#[derive(Debug, Clone, Default)]
pub struct TransformRegistry {
    transforms: BTreeMap<String, FieldTransform>,
}

impl TransformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard registrations: collection date, draw time, and one synonym
    /// cleaner per controlled output field.
    pub fn from_catalog(catalog: &SynonymCatalog) -> Self {
        let cleaned = [
            (field_names::STABILIZER, ControlledField::Stabilizer),
            (field_names::GENDER, ControlledField::Gender),
            (field_names::SINGLE_DOUBLE_SPUN, ControlledField::SingleDoubleSpun),
            (field_names::SAMPLE_TIMEPOINT, ControlledField::SampleTimepoint),
            (field_names::STAGE, ControlledField::Stage),
            (field_names::HEMOLYSIS, ControlledField::Hemolysis),
            (field_names::RACE, ControlledField::Race),
            (field_names::SMOKING_HISTORY, ControlledField::SmokingHistory),
        ];

        let mut registry = Self::new()
            .with_transform(field_names::COLLECTION_DATE, FieldTransform::Date)
            .with_transform(field_names::TIME_OF_DRAW, FieldTransform::Time);
        for (field, vocabulary) in cleaned {
            // An absent table would null every value in the field.
            if let Some(table) = catalog.get(vocabulary) {
                registry.register(field, FieldTransform::Clean(Cleaner::from(table)));
            }
        }
        registry
    }

    pub fn register(&mut self, field: impl Into<String>, transform: FieldTransform) {
        self.transforms.insert(field.into(), transform);
    }

    pub fn with_transform(mut self, field: impl Into<String>, transform: FieldTransform) -> Self {
        self.register(field, transform);
        self
    }

    pub fn get(&self, field: &str) -> Option<&FieldTransform> {
        self.transforms.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldTransform)> {
        self.transforms
            .iter()
            .map(|(field, transform)| (field.as_str(), transform))
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}
