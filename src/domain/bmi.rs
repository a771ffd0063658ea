//! Body Mass Index. `bmi = weight_kg / height_m^2`.
//!
//! Pure functions of weight and height; callers recompute whenever either input changes.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Classify a raw (unrounded) BMI value.
    pub fn classify(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computed BMI: value rounded to one decimal, category from the unrounded value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bmi {
    pub value: f64,
    pub category: BmiCategory,
}

impl Bmi {
    /// Returns `None` unless both weight (kg) and height (cm) are positive and finite.
    pub fn compute(weight_kg: f64, height_cm: f64) -> Option<Self> {
        if !(weight_kg.is_finite() && height_cm.is_finite()) || weight_kg <= 0.0 || height_cm <= 0.0
        {
            return None;
        }
        let height_m = height_cm / 100.0;
        let raw = weight_kg / (height_m * height_m);
        Some(Self {
            value: (raw * 10.0).round() / 10.0,
            category: BmiCategory::classify(raw),
        })
    }

    /// Same as [`Bmi::compute`] for optional form inputs.
    pub fn from_inputs(weight_kg: Option<f64>, height_cm: Option<f64>) -> Option<Self> {
        match (weight_kg, height_cm) {
            (Some(w), Some(h)) => Self::compute(w, h),
            _ => None,
        }
    }
}
