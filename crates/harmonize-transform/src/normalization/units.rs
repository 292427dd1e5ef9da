//! Height/weight conversion and BMI.

use harmonize_common::parse_f64;
use harmonize_model::{HeightUnit, Resolution, Unresolved, WeightUnit};

/// Converts source measurements to centimeters and kilograms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitConverter {
    height_factor: f64,
    weight_factor: f64,
}

impl UnitConverter {
    pub fn new(height: &HeightUnit, weight: &WeightUnit) -> Self {
        Self {
            height_factor: height.factor_to_cm(),
            weight_factor: weight.factor_to_kg(),
        }
    }

    pub fn height_cm(&self, raw: &str) -> Resolution<f64> {
        scale(raw, self.height_factor)
    }

    pub fn weight_kg(&self, raw: &str) -> Resolution<f64> {
        scale(raw, self.weight_factor)
    }
}

impl Default for UnitConverter {
    fn default() -> Self {
        Self::new(&HeightUnit::default(), &WeightUnit::default())
    }
}

fn scale(raw: &str, factor: f64) -> Resolution<f64> {
    parse_f64(raw)
        .filter(|value| value.is_finite())
        .map(|value| value * factor)
        .ok_or(Unresolved)
}

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Body-mass index from kilograms and centimeters, rounded to 2 decimals.
///
/// # Examples
///
/// ```
/// use harmonize_transform::bmi;
///
/// assert_eq!(bmi(70.0, 175.0), Ok(22.86));
/// assert!(bmi(70.0, 0.0).is_err());
/// ```
pub fn bmi(weight_kg: f64, height_cm: f64) -> Resolution<f64> {
    if !weight_kg.is_finite() || !height_cm.is_finite() || height_cm <= 0.0 {
        return Err(Unresolved);
    }
    let meters = height_cm / 100.0;
    Ok(round2(weight_kg / (meters * meters)))
}
