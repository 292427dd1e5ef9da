//! Synonym tables from a directory of CSV files.
//!
//! Each vocabulary lives in `<table name>.csv` (`gender_mappings.csv`,
//! `biomarker_mappings.csv`, ...) with two columns: the standard column
//! (`standard_value`, or `standard_name` for biomarkers and `standard_term`
//! for menopause) and `synonym`. Rows are kept in file order.

use std::path::Path;

use harmonize_model::{ControlledField, SynonymCatalog, SynonymTable};
use tracing::{debug, info, warn};

use crate::builtin::builtin_table;
use crate::error::{IngestError, Result};

const SYNONYM_COLUMN: &str = "synonym";

/// Loads one synonym file.
///
/// Rows with a blank standard value or synonym are skipped.
pub fn load_synonym_table(path: &Path, standard_column: &str) -> Result<SynonymTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| match e.into_kind() {
            csv::ErrorKind::Io(source) => IngestError::read(path, source),
            kind => IngestError::CsvParse {
                path: path.to_path_buf(),
                message: format!("{kind:?}"),
            },
        })?;

    let headers = reader
        .headers()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .clone();
    let position = |name: &str| {
        headers
            .iter()
            .position(|header| {
                header
                    .trim_start_matches('\u{feff}')
                    .trim()
                    .eq_ignore_ascii_case(name)
            })
            .ok_or_else(|| IngestError::MissingColumn {
                column: name.to_string(),
                path: path.to_path_buf(),
            })
    };
    let standard_idx = position(standard_column)?;
    let synonym_idx = position(SYNONYM_COLUMN)?;

    let mut table = SynonymTable::new();
    let mut skipped = 0usize;
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let standard = record.get(standard_idx).map(str::trim).unwrap_or_default();
        let synonym = record.get(synonym_idx).unwrap_or_default();
        if standard.is_empty() || synonym.trim().is_empty() {
            skipped += 1;
            continue;
        }
        table.insert(standard, synonym);
    }
    if skipped > 0 {
        warn!(path = %path.display(), skipped, "skipped synonym rows with blank values");
    }
    debug!(
        path = %path.display(),
        labels = table.len(),
        variants = table.variant_count(),
        "synonym table loaded"
    );
    Ok(table)
}

/// Loads every vocabulary from `dir`.
///
/// A missing file falls back to the built-in table for that vocabulary;
/// race and smoking history are only present when their files exist.
pub fn load_synonym_catalog(dir: &Path) -> Result<SynonymCatalog> {
    if !dir.is_dir() {
        return Err(IngestError::FileNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut catalog = SynonymCatalog::new();
    let mut from_files = 0usize;
    for field in ControlledField::ALL {
        let path = dir.join(format!("{}.csv", field.table_name()));
        if path.is_file() {
            catalog.insert(field, load_synonym_table(&path, field.standard_column())?);
            from_files += 1;
        } else if let Some(table) = builtin_table(field) {
            debug!(table = field.table_name(), "no synonym file, using built-in table");
            catalog.insert(field, table);
        }
    }
    info!(
        dir = %dir.display(),
        from_files,
        tables = catalog.len(),
        "synonym catalog loaded"
    );
    Ok(catalog)
}
