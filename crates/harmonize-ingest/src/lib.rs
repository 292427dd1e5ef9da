//! Input and output adapters for the harmonization pipeline.
//!
//! # Features
//!
//! - **Sheets**: read CSV exports with banner rows into string frames, read
//!   template headers, write the harmonized table
//! - **Synonyms**: load controlled vocabularies from a directory of CSV files,
//!   falling back to the built-in tables
//! - **Jobs**: TOML job files describing inputs, units, and field directives
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use harmonize_ingest::{load_job, load_synonym_catalog, read_table};
//!
//! let job = load_job(Path::new("jobs/brc.toml"))?;
//! let raw = read_table(&job.inputs.raw, job.header_rows.raw)?;
//! let plan = job.mapping_plan()?;
//! ```

mod builtin;
mod error;
mod job;
mod synonyms;
mod table;

// === Error Types ===
pub use error::{IngestError, Result};

// === Sheets ===
pub use table::{read_table, read_template, write_table};

// === Synonyms ===
pub use builtin::{builtin_catalog, builtin_table};
pub use synonyms::{load_synonym_catalog, load_synonym_table};

// === Job Files ===
pub use job::{DirectiveMarker, FieldDirective, HeaderRows, InputPaths, JobConfig, JoinConfig, load_job};
