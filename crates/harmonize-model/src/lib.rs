//! Data model for clinical sample harmonization.
//!
//! Templates, synonym tables, field mapping directives, and run options. The
//! types here carry no I/O; loaders live in `harmonize-ingest`.

pub mod catalog;
pub mod error;
pub mod mapping;
pub mod options;
pub mod synonym;
pub mod template;
pub mod units;
pub mod unresolved;

pub use catalog::{ControlledField, SynonymCatalog};
pub use error::{ModelError, Result};
pub use mapping::{CalculationSpec, FieldMapping, JoinKeys, MappingPlan};
pub use options::{HarmonizeOptions, SpecialFields};
pub use synonym::{SynonymEntry, SynonymTable};
pub use template::{DEFAULT_REQUIRED_FIELDS, TEMPLATE_FIELDS, Template, TemplateFieldSpec};
pub use units::{HeightUnit, WeightUnit};
pub use unresolved::{HER2_FISH_MISSING, NOT_RECEIVED, Resolution, Unresolved};
