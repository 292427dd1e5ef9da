//! Sample harmonization transforms.
//!
//! - **normalization**: synonym cleaners, date/time/age parsing, unit conversion
//! - **extraction**: free-text blob assembly, biomarker and menopause extraction
//! - **registry**: which normalizer applies to which template field

pub mod error;
pub mod extraction;
pub mod normalization;
pub mod registry;

pub use error::{Result, TransformError};
pub use extraction::{
    BiomarkerCall, BiomarkerExtractor, BiomarkerPanel, BiomarkerResult, MenopauseExtractor,
    build_blob,
};
pub use normalization::{
    Cleaner, UnitConverter, bmi, elapsed_days, infer_age, normalize_date, normalize_time,
    parse_instant, round2,
};
pub use registry::{FieldTransform, TransformRegistry};
