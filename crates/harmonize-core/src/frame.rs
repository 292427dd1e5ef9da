//! String-typed working frames.
//!
//! Every harmonization rule reads cells as text, so input frames are read into
//! a [`SourceFrame`] once and results accumulate in an [`OutputTable`] that
//! becomes a polars frame only at the end.

use std::collections::HashMap;

use harmonize_common::{any_to_string_non_empty, string_column};
use harmonize_model::Template;
use polars::prelude::{DataFrame, PolarsResult};

/// Column-oriented text copy of an input table.
///
/// Blank cells are stored as `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceFrame {
    names: Vec<String>,
    columns: HashMap<String, Vec<Option<String>>>,
    height: usize,
}

impl SourceFrame {
    /// An empty frame with `height` rows and no columns.
    pub fn with_height(height: usize) -> Self {
        Self {
            height,
            ..Self::default()
        }
    }

    pub fn from_dataframe(df: &DataFrame) -> PolarsResult<Self> {
        let height = df.height();
        let mut frame = Self::with_height(height);
        for column in df.get_columns() {
            let mut values = Vec::with_capacity(height);
            for idx in 0..height {
                values.push(any_to_string_non_empty(column.get(idx)?));
            }
            frame.push_column(column.name().to_string(), values);
        }
        Ok(frame)
    }

    /// Appends a column; a repeated name replaces the earlier values.
    ///
    /// Short columns are padded with `None` and long ones truncated to the
    /// frame height.
    pub fn push_column(&mut self, name: String, mut values: Vec<Option<String>>) {
        values.resize(self.height, None);
        if !self.columns.contains_key(&name) {
            self.names.push(name.clone());
        }
        self.columns.insert(name, values);
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&[Option<String>]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Vec<Option<String>>> {
        self.columns.get_mut(name)
    }

    pub fn value(&self, name: &str, row: usize) -> Option<&str> {
        self.columns
            .get(name)
            .and_then(|values| values.get(row))
            .and_then(Option::as_deref)
    }
}

/// Output cells keyed by template field, in template order.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputTable {
    fields: Vec<String>,
    columns: HashMap<String, Vec<Option<String>>>,
    height: usize,
}

impl OutputTable {
    /// A table of empty cells with the template's columns.
    pub fn new(template: &Template, height: usize) -> Self {
        let columns = template
            .fields()
            .iter()
            .map(|field| (field.clone(), vec![None; height]))
            .collect();
        Self {
            fields: template.fields().to_vec(),
            columns,
            height,
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn contains(&self, field: &str) -> bool {
        self.columns.contains_key(field)
    }

    /// Writes one cell. Returns `false` when `field` is not a template column.
    pub fn set(&mut self, field: &str, row: usize, value: Option<String>) -> bool {
        match self.columns.get_mut(field).and_then(|values| values.get_mut(row)) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// Replaces a whole column. Returns `false` when `field` is not a
    /// template column.
    pub fn fill(&mut self, field: &str, mut values: Vec<Option<String>>) -> bool {
        let height = self.height;
        match self.columns.get_mut(field) {
            Some(column) => {
                values.resize(height, None);
                *column = values;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, field: &str, row: usize) -> Option<&str> {
        self.columns
            .get(field)
            .and_then(|values| values.get(row))
            .and_then(Option::as_deref)
    }

    pub fn column(&self, field: &str) -> Option<&[Option<String>]> {
        self.columns.get(field).map(Vec::as_slice)
    }

    pub fn column_mut(&mut self, field: &str) -> Option<&mut Vec<Option<String>>> {
        self.columns.get_mut(field)
    }

    /// Materializes the table as a frame of nullable string columns.
    pub fn into_dataframe(mut self) -> PolarsResult<DataFrame> {
        let columns = self
            .fields
            .iter()
            .map(|field| {
                let values = self.columns.remove(field).unwrap_or_default();
                string_column(field, values)
            })
            .collect();
        DataFrame::new(columns)
    }
}

#[cfg(test)]
mod tests {
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    use super::*;

    #[test]
    fn source_frame_reads_blank_cells_as_missing() {
        let df = DataFrame::new(vec![
            Series::new("Sex".into(), &["F", "", "M"]).into_column(),
            Series::new("Weight".into(), &[Some(70.0), None, Some(82.5)]).into_column(),
        ])
        .unwrap();
        let frame = SourceFrame::from_dataframe(&df).unwrap();
        assert_eq!(frame.height(), 3);
        assert_eq!(frame.column_names(), ["Sex", "Weight"]);
        assert_eq!(frame.value("Sex", 1), None);
        assert_eq!(frame.value("Weight", 0), Some("70"));
        assert_eq!(frame.value("Weight", 2), Some("82.5"));
        assert_eq!(frame.value("Missing", 0), None);
    }

    #[test]
    fn output_table_only_accepts_template_fields() {
        let template = Template::new(["Gender", "Stage"]);
        let mut table = OutputTable::new(&template, 2);
        assert!(table.set("Gender", 1, Some("Female".into())));
        assert!(!table.set("Notes", 0, Some("x".into())));
        assert!(!table.set("Gender", 5, Some("Male".into())));
        assert_eq!(table.get("Gender", 1), Some("Female"));
        assert_eq!(table.get("Gender", 0), None);
    }

    #[test]
    fn output_table_keeps_template_order() {
        let template = Template::new(["Stage", "Gender", "Country"]);
        let mut table = OutputTable::new(&template, 1);
        table.fill("Country", vec![Some("USA".into())]);
        let df = table.into_dataframe().unwrap();
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.as_str().to_string())
            .collect();
        assert_eq!(names, ["Stage", "Gender", "Country"]);
        assert_eq!(df.height(), 1);
        assert_eq!(df.column("Country").unwrap().str().unwrap().get(0), Some("USA"));
    }
}
