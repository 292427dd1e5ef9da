//! Source measurement units for height and weight.
//!
//! Unrecognized unit labels are kept and convert with a factor of 1.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HeightUnit {
    #[default]
    Centimeters,
    Inches,
    Meters,
    Unrecognized(String),
}

impl HeightUnit {
    /// Multiplier converting a value in this unit to centimeters.
    pub fn factor_to_cm(&self) -> f64 {
        match self {
            HeightUnit::Centimeters | HeightUnit::Unrecognized(_) => 1.0,
            HeightUnit::Inches => 2.54,
            HeightUnit::Meters => 100.0,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            HeightUnit::Centimeters => "cm",
            HeightUnit::Inches => "inches",
            HeightUnit::Meters => "meters",
            HeightUnit::Unrecognized(label) => label,
        }
    }
}

impl From<&str> for HeightUnit {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "cm" => HeightUnit::Centimeters,
            "inches" => HeightUnit::Inches,
            "meters" => HeightUnit::Meters,
            _ => HeightUnit::Unrecognized(value.trim().to_string()),
        }
    }
}

impl From<String> for HeightUnit {
    fn from(value: String) -> Self {
        HeightUnit::from(value.as_str())
    }
}

impl From<HeightUnit> for String {
    fn from(unit: HeightUnit) -> Self {
        unit.label().to_string()
    }
}

impl fmt::Display for HeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WeightUnit {
    #[default]
    Kilograms,
    Pounds,
    Unrecognized(String),
}

impl WeightUnit {
    /// Multiplier converting a value in this unit to kilograms.
    pub fn factor_to_kg(&self) -> f64 {
        match self {
            WeightUnit::Kilograms | WeightUnit::Unrecognized(_) => 1.0,
            WeightUnit::Pounds => 0.453592,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            WeightUnit::Kilograms => "kg",
            WeightUnit::Pounds => "lbs",
            WeightUnit::Unrecognized(label) => label,
        }
    }
}

impl From<&str> for WeightUnit {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "kg" => WeightUnit::Kilograms,
            "lbs" => WeightUnit::Pounds,
            _ => WeightUnit::Unrecognized(value.trim().to_string()),
        }
    }
}

impl From<String> for WeightUnit {
    fn from(value: String) -> Self {
        WeightUnit::from(value.as_str())
    }
}

impl From<WeightUnit> for String {
    fn from(unit: WeightUnit) -> Self {
        unit.label().to_string()
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
