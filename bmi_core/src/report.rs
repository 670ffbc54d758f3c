//! Presentation payloads handed to the front end.

use crate::engine::BmiResult;
use crate::validation::InputError;
use serde::Serialize;
use std::fmt;

/// Severity tag for a user-facing notice
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
    Success,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
            Severity::Success => write!(f, "success"),
        }
    }
}

/// A message for the user with its severity
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Success,
        }
    }
}

impl From<&InputError> for Notice {
    fn from(err: &InputError) -> Self {
        Self {
            message: err.to_string(),
            severity: err.severity(),
        }
    }
}

/// Fields shown for one computed result
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResultReport {
    pub bmi_value: f64,
    pub category: String,
    pub color: String,
    pub ideal_weight_range_text: String,
    pub health_risk_text: String,
    pub indicator_percent: f64,
}

impl From<&BmiResult> for ResultReport {
    fn from(result: &BmiResult) -> Self {
        Self {
            bmi_value: result.bmi,
            category: result.category.label().to_string(),
            color: result.category.color().to_string(),
            ideal_weight_range_text: result.ideal_weight.text(),
            health_risk_text: result.health_risk.clone(),
            indicator_percent: result.indicator_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{engine, UnitSystem, ValidInput};

    #[test]
    fn test_report_from_result() {
        let result = engine::compute(&ValidInput {
            height: 180.0,
            weight: 90.0,
            unit: UnitSystem::Metric,
            age: None,
            gender: None,
        });
        let report = ResultReport::from(&result);

        assert_eq!(report.bmi_value, 27.8);
        assert_eq!(report.category, "Overweight");
        assert_eq!(report.color, "#ff9800");
        assert_eq!(report.ideal_weight_range_text, "59.9 - 81.0 kg");
        assert_eq!(report.health_risk_text, "Moderate health risk");

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("idealWeightRangeText").is_some());
        assert!(json.get("indicatorPercent").is_some());
    }

    #[test]
    fn test_notice_from_input_error() {
        let notice = Notice::from(&InputError::MetricHeightOutOfRange);
        assert_eq!(notice.message, "Height must be between 50cm and 250cm.");
        assert_eq!(notice.severity, Severity::Error);
    }
}
