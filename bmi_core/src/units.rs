//! Unit conversion between metric and imperial inputs.
//!
//! Raw input is always interpreted in its declared unit, so only the two
//! conversions the engine needs are provided.

use crate::UnitSystem;

pub const METERS_PER_INCH: f64 = 0.0254;
pub const LBS_PER_KG: f64 = 2.20462;

/// Convert a height in the given unit system to meters
pub fn height_to_meters(value: f64, unit: UnitSystem) -> f64 {
    match unit {
        UnitSystem::Metric => value / 100.0,
        UnitSystem::Imperial => value * METERS_PER_INCH,
    }
}

pub fn kg_to_lbs(kg: f64) -> f64 {
    kg * LBS_PER_KG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_to_meters() {
        assert!((height_to_meters(170.0, UnitSystem::Metric) - 1.7).abs() < 1e-12);
        assert!((height_to_meters(65.0, UnitSystem::Imperial) - 1.651).abs() < 1e-12);
    }

    #[test]
    fn test_kg_to_lbs() {
        assert!((kg_to_lbs(100.0) - 220.462).abs() < 1e-9);
        assert_eq!(kg_to_lbs(0.0), 0.0);
    }
}
