//! Core domain types for the BMI tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Unit systems and gender
//! - BMI categories and their display colours
//! - Recorded measurements

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Input Types
// ============================================================================

/// Unit system the raw height and weight are entered in
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Centimetres and kilograms
    #[default]
    Metric,
    /// Inches and pounds
    Imperial,
}

impl UnitSystem {
    pub fn height_label(self) -> &'static str {
        match self {
            UnitSystem::Metric => "cm",
            UnitSystem::Imperial => "in",
        }
    }

    pub fn weight_label(self) -> &'static str {
        match self {
            UnitSystem::Metric => "kg",
            UnitSystem::Imperial => "lbs",
        }
    }

    /// Inclusive range of accepted heights, in this system's height unit
    pub fn height_range(self) -> (f64, f64) {
        match self {
            UnitSystem::Metric => (50.0, 250.0),
            UnitSystem::Imperial => (20.0, 100.0),
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitSystem::Metric => write!(f, "metric"),
            UnitSystem::Imperial => write!(f, "imperial"),
        }
    }
}

impl std::str::FromStr for UnitSystem {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            _ => Err(format!("Unknown unit system: {}", s)),
        }
    }
}

/// Self-reported gender
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
            Gender::Other => write!(f, "other"),
        }
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Four-band BMI classification
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Display colour used for values, labels and chart points
    pub fn color(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "#3498db",
            BmiCategory::Normal => "#4caf50",
            BmiCategory::Overweight => "#ff9800",
            BmiCategory::Obese => "#f44336",
        }
    }

    pub fn label(self) -> &'static str {
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
        f.write_str(self.label())
    }
}

// ============================================================================
// History Types
// ============================================================================

/// One recorded BMI computation
///
/// Field names match the persisted history format.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Measurement {
    /// Creation time in milliseconds since the Unix epoch
    pub id: i64,
    /// BMI rounded to one decimal place
    pub bmi: f64,
    pub category: BmiCategory,
    /// Local date, `%Y-%m-%d`
    pub date: String,
    /// Local time, `HH:MM`
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub age: Option<u8>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub unit: UnitSystem,
}

impl Measurement {
    /// Stamp a computed BMI with its creation time
    pub fn new(
        bmi: f64,
        category: BmiCategory,
        age: Option<u8>,
        gender: Option<Gender>,
        unit: UnitSystem,
        at: DateTime<Local>,
    ) -> Self {
        Self {
            id: at.timestamp_millis(),
            bmi,
            category,
            date: at.format("%Y-%m-%d").to_string(),
            time: at.format("%H:%M").to_string(),
            age,
            gender,
            unit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_measurement_stamps_date_and_time() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 0).unwrap();
        let m = Measurement::new(
            24.2,
            BmiCategory::Normal,
            Some(30),
            Some(Gender::Female),
            UnitSystem::Metric,
            at,
        );

        assert_eq!(m.id, at.timestamp_millis());
        assert_eq!(m.date, "2024-03-09");
        assert_eq!(m.time, "07:05");
    }

    #[test]
    fn test_measurement_json_field_names() {
        let at = Local.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap();
        let m = Measurement::new(
            29.9,
            BmiCategory::Overweight,
            None,
            None,
            UnitSystem::Imperial,
            at,
        );
        let value = serde_json::to_value(&m).unwrap();

        assert_eq!(value["category"], "Overweight");
        assert_eq!(value["unit"], "imperial");
        assert!(value["age"].is_null());
        assert!(value["gender"].is_null());
    }

    #[test]
    fn test_unit_system_parse() {
        assert_eq!("Imperial".parse::<UnitSystem>(), Ok(UnitSystem::Imperial));
        assert_eq!("metric".parse::<UnitSystem>(), Ok(UnitSystem::Metric));
        assert!("furlongs".parse::<UnitSystem>().is_err());
        assert!("si".parse::<UnitSystem>().is_err());
        assert!("us".parse::<UnitSystem>().is_err());
    }
}
