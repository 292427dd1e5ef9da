//! Per-field mapping directives.
//!
//! Every template field is populated by at most one directive: a direct copy
//! from a source column, a fixed value, an elapsed-days calculation, or an
//! explicit "not received" marker. Fields without a directive are only
//! reachable through extraction or the special computed fields.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// How one template field gets its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldMapping {
    /// Copy (and clean, when a transform is registered) a source column.
    Direct(String),
    /// Write the same literal into every row.
    Fixed(String),
    /// Whole days between two source date columns.
    Computed { start: String, end: String },
    /// Backfill with the "not received" sentinel.
    NotReceived,
}

impl FieldMapping {
    pub fn kind(&self) -> &'static str {
        match self {
            FieldMapping::Direct(_) => "direct",
            FieldMapping::Fixed(_) => "fixed",
            FieldMapping::Computed { .. } => "computed",
            FieldMapping::NotReceived => "not_received",
        }
    }
}

/// Elapsed-days calculation targeting one output field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationSpec {
    pub target: String,
    pub start_column: String,
    pub end_column: String,
}

/// Raw-table and shipping-manifest columns used for the left merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinKeys {
    pub raw_column: String,
    pub shipping_column: String,
}

impl JoinKeys {
    pub fn new(raw_column: impl Into<String>, shipping_column: impl Into<String>) -> Result<Self> {
        let raw_column = raw_column.into();
        let shipping_column = shipping_column.into();
        if raw_column.trim().is_empty() {
            return Err(ModelError::EmptyJoinKey { side: "raw" });
        }
        if shipping_column.trim().is_empty() {
            return Err(ModelError::EmptyJoinKey { side: "shipping" });
        }
        Ok(Self {
            raw_column,
            shipping_column,
        })
    }
}

/// Everything the user decided about how source columns feed the template.
#[derive(Debug, Clone, Default)]
pub struct MappingPlan {
    directives: Vec<(String, FieldMapping)>,
    biomarker_columns: Vec<String>,
    join_keys: Option<JoinKeys>,
}

impl MappingPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the directive for `field`.
    ///
    /// A direct mapping to a blank column name means "unmapped" and is not
    /// recorded.
    pub fn map(&mut self, field: impl Into<String>, mapping: FieldMapping) -> Result<()> {
        let field = field.into();
        if let Some(existing) = self.directive(&field) {
            return Err(ModelError::DuplicateDirective {
                field,
                existing: existing.kind(),
            });
        }
        match &mapping {
            FieldMapping::Direct(column) if column.trim().is_empty() => return Ok(()),
            FieldMapping::Computed { start, .. } if start.trim().is_empty() => {
                return Err(ModelError::EmptyCalculationColumn {
                    field,
                    side: "start",
                });
            }
            FieldMapping::Computed { end, .. } if end.trim().is_empty() => {
                return Err(ModelError::EmptyCalculationColumn { field, side: "end" });
            }
            _ => {}
        }
        self.directives.push((field, mapping));
        Ok(())
    }

    pub fn with_mapping(mut self, field: impl Into<String>, mapping: FieldMapping) -> Result<Self> {
        self.map(field, mapping)?;
        Ok(self)
    }

    pub fn with_biomarker_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.biomarker_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_join_keys(mut self, keys: JoinKeys) -> Self {
        self.join_keys = Some(keys);
        self
    }

    pub fn directive(&self, field: &str) -> Option<&FieldMapping> {
        self.directives
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, mapping)| mapping)
    }

    pub fn directives(&self) -> impl Iterator<Item = (&str, &FieldMapping)> {
        self.directives
            .iter()
            .map(|(field, mapping)| (field.as_str(), mapping))
    }

    /// Source column of a direct mapping.
    pub fn direct_source(&self, field: &str) -> Option<&str> {
        match self.directive(field) {
            Some(FieldMapping::Direct(column)) => Some(column.as_str()),
            _ => None,
        }
    }

    pub fn direct_mappings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.directives().filter_map(|(field, mapping)| match mapping {
            FieldMapping::Direct(column) => Some((field, column.as_str())),
            _ => None,
        })
    }

    pub fn fixed_values(&self) -> impl Iterator<Item = (&str, &str)> {
        self.directives().filter_map(|(field, mapping)| match mapping {
            FieldMapping::Fixed(value) => Some((field, value.as_str())),
            _ => None,
        })
    }

    pub fn calculations(&self) -> Vec<CalculationSpec> {
        self.directives()
            .filter_map(|(field, mapping)| match mapping {
                FieldMapping::Computed { start, end } => Some(CalculationSpec {
                    target: field.to_string(),
                    start_column: start.clone(),
                    end_column: end.clone(),
                }),
                _ => None,
            })
            .collect()
    }

    pub fn is_not_received(&self, field: &str) -> bool {
        matches!(self.directive(field), Some(FieldMapping::NotReceived))
    }

    pub fn biomarker_columns(&self) -> &[String] {
        &self.biomarker_columns
    }

    pub fn join_keys(&self) -> Option<&JoinKeys> {
        self.join_keys.as_ref()
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_directive_per_field() {
        let mut plan = MappingPlan::new();
        plan.map("Gender", FieldMapping::Direct("Sex".into())).unwrap();
        let err = plan
            .map("Gender", FieldMapping::Fixed("Female".into()))
            .unwrap_err();
        assert!(matches!(
            err,
            ModelError::DuplicateDirective { existing: "direct", .. }
        ));
    }

    #[test]
    fn blank_direct_column_is_unmapped() {
        let plan = MappingPlan::new()
            .with_mapping("Race", FieldMapping::Direct("  ".into()))
            .unwrap();
        assert!(plan.is_empty());
        assert_eq!(plan.direct_source("Race"), None);
    }

    #[test]
    fn calculations_need_both_columns() {
        let err = MappingPlan::new()
            .with_mapping(
                "Duration between collection and diagnosis (days)",
                FieldMapping::Computed {
                    start: "Diagnosis Date".into(),
                    end: String::new(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, ModelError::EmptyCalculationColumn { side: "end", .. }));
    }

    #[test]
    fn derives_calculation_specs() {
        let plan = MappingPlan::new()
            .with_mapping(
                "Duration between collection and diagnosis (days)",
                FieldMapping::Computed {
                    start: "Dx Date".into(),
                    end: "Draw Date".into(),
                },
            )
            .unwrap()
            .with_mapping("Country", FieldMapping::Fixed("USA".into()))
            .unwrap();
        let specs = plan.calculations();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].start_column, "Dx Date");
        assert_eq!(plan.fixed_values().collect::<Vec<_>>(), vec![("Country", "USA")]);
    }

    #[test]
    fn join_keys_reject_blank_columns() {
        assert!(JoinKeys::new("Subject", "Subject ID").is_ok());
        assert!(matches!(
            JoinKeys::new("", "Subject ID"),
            Err(ModelError::EmptyJoinKey { side: "raw" })
        ));
    }
}
