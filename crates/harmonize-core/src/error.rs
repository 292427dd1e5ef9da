use polars::prelude::PolarsError;
use thiserror::Error;

use harmonize_transform::TransformError;

/// Failures that stop a whole batch.
///
/// Bad cells and missing columns never end up here; they resolve to empty
/// cells and are counted in the report.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to build pipeline: {0}")]
    Transform(#[from] TransformError),

    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
