use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("invalid search pattern for biomarker '{marker}': {source}")]
    InvalidPattern {
        marker: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, TransformError>;
