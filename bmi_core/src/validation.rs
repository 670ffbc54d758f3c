//! Input validation for raw form values.
//!
//! Checks run in a fixed order and the first failure wins:
//! height and weight must be positive numbers, height must fall in the
//! unit system's range, and an optional age must be a whole number in
//! [2, 120].

use crate::report::Severity;
use crate::{Gender, UnitSystem};

pub const MIN_AGE: u8 = 2;
pub const MAX_AGE: u8 = 120;

/// Why raw input was rejected
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Please enter a valid height greater than 0.")]
    InvalidHeight,

    #[error("Please enter a valid weight greater than 0.")]
    InvalidWeight,

    #[error("Height must be between 50cm and 250cm.")]
    MetricHeightOutOfRange,

    #[error("Height must be between 20in and 100in.")]
    ImperialHeightOutOfRange,

    #[error("Please enter a valid age.")]
    InvalidAge,

    #[error("Age must be between 2 and 120 years.")]
    AgeOutOfRange,

    #[error("Please select a valid gender.")]
    InvalidGender,
}

impl InputError {
    /// Missing or unparsable values are warnings; range violations are errors
    pub fn severity(&self) -> Severity {
        match self {
            InputError::InvalidHeight
            | InputError::InvalidWeight
            | InputError::InvalidAge
            | InputError::InvalidGender => Severity::Warning,
            InputError::MetricHeightOutOfRange
            | InputError::ImperialHeightOutOfRange
            | InputError::AgeOutOfRange => Severity::Error,
        }
    }
}

/// Form values exactly as the user typed them
#[derive(Clone, Debug, Default)]
pub struct RawInput {
    pub height: String,
    pub weight: String,
    pub age: Option<String>,
    pub gender: Option<String>,
}

/// Input that passed validation, parsed into its numeric form
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValidInput {
    /// Height in cm (metric) or inches (imperial)
    pub height: f64,
    /// Weight in kg (metric) or pounds (imperial)
    pub weight: f64,
    pub unit: UnitSystem,
    pub age: Option<u8>,
    pub gender: Option<Gender>,
}

/// Validate raw input against the active unit system
pub fn validate(raw: &RawInput, unit: UnitSystem) -> Result<ValidInput, InputError> {
    let height = parse_positive(&raw.height).ok_or(InputError::InvalidHeight)?;
    let weight = parse_positive(&raw.weight).ok_or(InputError::InvalidWeight)?;

    let (min, max) = unit.height_range();
    if height < min || height > max {
        return Err(match unit {
            UnitSystem::Metric => InputError::MetricHeightOutOfRange,
            UnitSystem::Imperial => InputError::ImperialHeightOutOfRange,
        });
    }

    let age = parse_age(raw.age.as_deref())?;
    let gender = parse_gender(raw.gender.as_deref())?;

    Ok(ValidInput {
        height,
        weight,
        unit,
        age,
        gender,
    })
}

fn parse_positive(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

fn parse_age(raw: Option<&str>) -> Result<Option<u8>, InputError> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(s) => s,
    };

    let age: i64 = raw.parse().map_err(|_| InputError::InvalidAge)?;
    if age < i64::from(MIN_AGE) || age > i64::from(MAX_AGE) {
        return Err(InputError::AgeOutOfRange);
    }
    u8::try_from(age)
        .map(Some)
        .map_err(|_| InputError::AgeOutOfRange)
}

/// Parse an optional gender selection; empty means "not given"
pub fn parse_gender(raw: Option<&str>) -> Result<Option<Gender>, InputError> {
    match raw.map(|s| s.trim().to_lowercase()).as_deref() {
        None | Some("") => Ok(None),
        Some("male") => Ok(Some(Gender::Male)),
        Some("female") => Ok(Some(Gender::Female)),
        Some("other") => Ok(Some(Gender::Other)),
        Some(_) => Err(InputError::InvalidGender),
    }
}
