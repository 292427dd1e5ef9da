//! Harmonization pipeline for clinical sample spreadsheets.
//!
//! Turns a raw lab sheet (plus an optional shipping manifest) into a table
//! with exactly the template's columns, following the user's mapping plan.
//!
//! ```ignore
//! use harmonize_core::{HarmonizationInput, HarmonizationPipeline};
//!
//! let pipeline = HarmonizationPipeline::new(&catalog, options)?;
//! let table = pipeline.run(&HarmonizationInput::new(&template, &raw, &plan))?;
//! ```

pub mod error;
pub mod frame;
pub mod merge;
pub mod pipeline;
pub mod report;
mod steps;

pub use error::{PipelineError, Result};
pub use frame::{OutputTable, SourceFrame};
pub use merge::{MergeOutcome, left_merge};
pub use pipeline::{
    HarmonizationBatch, HarmonizationContext, HarmonizationInput, HarmonizationPipeline,
    HarmonizationStep, HarmonizedTable, PipelineStage,
};
pub use report::HarmonizationReport;
