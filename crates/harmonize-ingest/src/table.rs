//! Sheet reading and writing.
//!
//! Exported lab sheets often carry banner rows above the real header, so
//! every reader takes a header row offset: the number of rows to skip before
//! the header line.

use std::fs::File;
use std::path::Path;

use harmonize_model::Template;
use polars::prelude::{CsvReadOptions, CsvWriter, DataFrame, SerReader, SerWriter};
use tracing::debug;

use crate::error::{IngestError, Result};

fn ensure_exists(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        })
    }
}

/// Reads a sheet into a frame of string columns.
///
/// No type inference is done; every cell stays as written so identifiers
/// such as `00123` keep their leading zeros.
pub fn read_table(path: &Path, header_row: usize) -> Result<DataFrame> {
    ensure_exists(path)?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_skip_rows(header_row)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if df.width() == 0 {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "sheet loaded"
    );
    Ok(df)
}

/// Reads only the header line of a template sheet.
pub fn read_template(path: &Path, header_row: usize) -> Result<Template> {
    ensure_exists(path)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let Some(record) = reader.records().nth(header_row) else {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    };
    let record = record.map_err(|e| IngestError::CsvParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let template = Template::new(
        record
            .iter()
            .map(|name| name.trim_start_matches('\u{feff}').trim()),
    );
    if template.is_empty() {
        return Err(IngestError::NoHeaderDetected {
            path: path.to_path_buf(),
            row: header_row,
        });
    }
    Ok(template)
}

/// Writes a frame as CSV with a header line, creating parent directories.
pub fn write_table(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| IngestError::FileWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    let mut file = File::create(path).map_err(|e| IngestError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    debug!(path = %path.display(), rows = df.height(), "sheet written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn test_read_table_skips_banner_rows() {
        let file = create_temp_csv("Lab export,,\nSubject,Age,Sex\n00123,45,F\nS2,,M\n");
        let df = read_table(file.path(), 1).unwrap();

        assert_eq!(df.height(), 2);
        let subject = df.column("Subject").unwrap().str().unwrap();
        assert_eq!(subject.get(0), Some("00123"));
        let age = df.column("Age").unwrap().str().unwrap();
        assert_eq!(age.get(1), None);
    }

    #[test]
    fn test_read_table_missing_file() {
        let result = read_table(Path::new("/definitely/not/here.csv"), 0);
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }

    #[test]
    fn test_read_template_header_only() {
        let file = create_temp_csv("\u{feff}Tube Barcode,Gender,,Gender\nexample,F,,\n");
        let template = read_template(file.path(), 0).unwrap();
        assert_eq!(template.fields(), ["Tube Barcode", "Gender"]);
    }

    #[test]
    fn test_read_template_past_end() {
        let file = create_temp_csv("A,B\n");
        let result = read_template(file.path(), 3);
        assert!(matches!(result, Err(IngestError::EmptyCsv { .. })));
    }
}
