//! Free-text extraction.
//!
//! Biomarker and menopause details often arrive scattered across note
//! columns ("ER=Positive PR = neg HER2 = 2+ FISH=amplified"). The selected
//! columns are joined into one lowercase blob per record and searched with
//! patterns compiled once per batch.

pub mod biomarker;
pub mod blob;
pub mod menopause;

pub use biomarker::{
    BiomarkerCall, BiomarkerExtractor, BiomarkerPanel, BiomarkerResult, HER2_IHC_FIELD,
    HER2_MARKER,
};
pub use blob::{build_blob, normalize_blob};
pub use menopause::MenopauseExtractor;
