//! Shared utilities for the sample harmonization crates.
//!
//! Polars cell helpers, log redaction, and the small text routines every
//! stage of the harmonizer agrees on.

pub mod redact;
pub mod text;
pub mod values;

pub use redact::{REDACTED_VALUE, redact_value, set_log_data_enabled};
pub use text::{collapse_whitespace, is_blank, normalize_key};
pub use values::{
    any_to_string, any_to_string_non_empty, format_numeric, parse_f64, string_column,
};
