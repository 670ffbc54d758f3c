//! BMI engine: value, classification, health risk, ideal weight and
//! indicator position.
//!
//! Every function here is total over validated input. The validator
//! guarantees a positive height, so no division by zero reaches this module.

use crate::units::{height_to_meters, kg_to_lbs};
use crate::{BmiCategory, Gender, UnitSystem, ValidInput};

/// Factor correcting lb/in² to kg/m²
pub const IMPERIAL_BMI_FACTOR: f64 = 703.0;

/// Lower and upper BMI of the normal band, used for the ideal-weight range
pub const NORMAL_BMI_MIN: f64 = 18.5;
pub const NORMAL_BMI_MAX: f64 = 25.0;

/// BMI beyond which the indicator no longer moves
pub const INDICATOR_BMI_CEILING: f64 = 45.0;

/// Everything derived from one measurement
#[derive(Clone, Debug, PartialEq)]
pub struct BmiResult {
    /// BMI rounded to one decimal place
    pub bmi: f64,
    pub category: BmiCategory,
    pub health_risk: String,
    pub ideal_weight: IdealWeightRange,
    /// Marker position on the 0-100 visual scale
    pub indicator_percent: f64,
    pub height_m: f64,
}

/// Weight interval that maps onto the normal BMI band at a given height
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IdealWeightRange {
    pub min: f64,
    pub max: f64,
    /// Unit system the bounds are expressed in (kg or lbs)
    pub unit: UnitSystem,
}

impl IdealWeightRange {
    /// e.g. `59.9 - 81.0 kg`
    pub fn text(&self) -> String {
        format!(
            "{:.1} - {:.1} {}",
            self.min,
            self.max,
            self.unit.weight_label()
        )
    }
}

/// Run the full engine over validated input
///
/// Bands are decided on the unrounded value; only the reported BMI is
/// rounded, so 29.95 shows as 30.0 but is still classed as overweight.
pub fn compute(input: &ValidInput) -> BmiResult {
    let exact = raw_bmi(input.height, input.weight, input.unit);
    let height_m = height_to_meters(input.height, input.unit);

    let result = BmiResult {
        bmi: round1(exact),
        category: classify(exact, input.age),
        health_risk: health_risk(exact, input.age, input.gender),
        ideal_weight: ideal_weight_range(height_m, input.unit),
        indicator_percent: indicator_position(exact),
        height_m,
    };

    tracing::debug!(
        "Computed BMI {} ({}) for {} input",
        result.bmi,
        result.category,
        input.unit
    );
    result
}

/// Unrounded BMI from height and weight in their declared unit
pub fn raw_bmi(height: f64, weight: f64, unit: UnitSystem) -> f64 {
    match unit {
        UnitSystem::Metric => {
            let m = height_to_meters(height, unit);
            weight / (m * m)
        }
        UnitSystem::Imperial => IMPERIAL_BMI_FACTOR * weight / (height * height),
    }
}

/// Round to one decimal place, halves away from zero
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Classify a BMI value
///
/// Ages 2..20 use a simplified youth band (not percentile charts);
/// everyone else uses the WHO adult bands.
pub fn classify(bmi: f64, age: Option<u8>) -> BmiCategory {
    match age {
        Some(a) if (2..20).contains(&a) => {
            if bmi < 14.0 {
                BmiCategory::Underweight
            } else if bmi < 21.0 {
                BmiCategory::Normal
            } else if bmi < 25.0 {
                BmiCategory::Overweight
            } else {
                BmiCategory::Obese
            }
        }
        _ => classify_adult(bmi),
    }
}

/// WHO adult bands; also used for trend colouring
pub fn classify_adult(bmi: f64) -> BmiCategory {
    if bmi < NORMAL_BMI_MIN {
        BmiCategory::Underweight
    } else if bmi < NORMAL_BMI_MAX {
        BmiCategory::Normal
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

/// Health-risk annotation layered on top of the BMI band
///
/// Overrides apply in order: seniors in the overweight band, the youth
/// suffix, then the low-BMI female note, which replaces everything before it.
pub fn health_risk(bmi: f64, age: Option<u8>, gender: Option<Gender>) -> String {
    let mut risk = if bmi < 18.5 {
        "Nutritional deficiency risk".to_string()
    } else if bmi < 25.0 {
        "Low health risk".to_string()
    } else if bmi < 30.0 {
        "Moderate health risk".to_string()
    } else if bmi < 35.0 {
        "High health risk".to_string()
    } else {
        "Very high health risk".to_string()
    };

    if let Some(age) = age {
        if age >= 65 && (25.0..30.0).contains(&bmi) {
            risk = "Acceptable for age".to_string();
        }
        if age < 20 {
            risk.push_str(" (Consult pediatrician)");
        }
    }

    if gender == Some(Gender::Female) && bmi < 18.0 {
        risk = "Hormonal imbalance risk".to_string();
    }

    risk
}

/// Ideal weight bounds for a height in meters, in the unit system's weight unit
pub fn ideal_weight_range(height_m: f64, unit: UnitSystem) -> IdealWeightRange {
    let h2 = height_m * height_m;
    let (min_kg, max_kg) = (NORMAL_BMI_MIN * h2, NORMAL_BMI_MAX * h2);

    match unit {
        UnitSystem::Metric => IdealWeightRange {
            min: min_kg,
            max: max_kg,
            unit,
        },
        UnitSystem::Imperial => IdealWeightRange {
            min: kg_to_lbs(min_kg),
            max: kg_to_lbs(max_kg),
            unit,
        },
    }
}

/// Map a BMI onto the 0-100 scale of four equal-width bands
pub fn indicator_position(bmi: f64) -> f64 {
    let percent = if bmi < NORMAL_BMI_MIN {
        (bmi / NORMAL_BMI_MIN) * 25.0
    } else if bmi < NORMAL_BMI_MAX {
        25.0 + ((bmi - NORMAL_BMI_MIN) / 6.5) * 25.0
    } else if bmi < 30.0 {
        50.0 + ((bmi - NORMAL_BMI_MAX) / 5.0) * 25.0
    } else {
        75.0 + ((bmi.min(INDICATOR_BMI_CEILING) - 30.0) / 15.0) * 25.0
    };

    percent.clamp(0.0, 100.0)
}
