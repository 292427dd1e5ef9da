use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("field '{field}' already has a {existing} directive")]
    DuplicateDirective {
        field: String,
        existing: &'static str,
    },

    #[error("calculation for '{field}' is missing its {side} column")]
    EmptyCalculationColumn { field: String, side: &'static str },

    #[error("join key pair is missing the {side} column")]
    EmptyJoinKey { side: &'static str },
}

pub type Result<T> = std::result::Result<T, ModelError>;
