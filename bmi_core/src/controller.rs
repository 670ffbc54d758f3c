//! Top-level controller for the measurement pipeline.
//!
//! Owns the active unit system and the history store. One `submit` runs
//! validate → compute → record → re-derive trend.

use crate::engine::{self, BmiResult};
use crate::history::HistoryStore;
use crate::report::ResultReport;
use crate::storage::KeyValueStore;
use crate::trend::TrendView;
use crate::validation::{self, InputError, RawInput};
use crate::{Measurement, UnitSystem};
use chrono::Local;

/// Output of one accepted submission
#[derive(Clone, Debug)]
pub struct Submission {
    pub result: BmiResult,
    pub report: ResultReport,
    pub measurement: Measurement,
    /// Whether the measurement reached persistent history
    pub saved: bool,
    pub trend: Option<TrendView>,
}

pub struct Calculator<S> {
    unit: UnitSystem,
    history: HistoryStore<S>,
}

impl<S: KeyValueStore> Calculator<S> {
    pub fn new(store: S, unit: UnitSystem) -> Self {
        Self {
            unit,
            history: HistoryStore::new(store),
        }
    }

    pub fn unit(&self) -> UnitSystem {
        self.unit
    }

    pub fn set_unit(&mut self, unit: UnitSystem) {
        if self.unit != unit {
            tracing::debug!("Switching unit system from {} to {}", self.unit, unit);
            self.unit = unit;
        }
    }

    pub fn history(&self) -> &HistoryStore<S> {
        &self.history
    }

    /// Validate and compute without touching history
    pub fn evaluate(&self, raw: &RawInput) -> Result<BmiResult, InputError> {
        let input = validation::validate(raw, self.unit)?;
        Ok(engine::compute(&input))
    }

    /// Run the full pipeline for one form submission
    ///
    /// Rejected input leaves history untouched. A failed history write is
    /// logged and reported through `saved`; the result is still returned.
    pub fn submit(&mut self, raw: &RawInput) -> Result<Submission, InputError> {
        let input = validation::validate(raw, self.unit)?;
        let result = engine::compute(&input);

        let measurement = Measurement::new(
            result.bmi,
            result.category,
            input.age,
            input.gender,
            input.unit,
            Local::now(),
        );

        let saved = match self.history.record(measurement.clone()) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to save measurement to history: {}", e);
                false
            }
        };

        let trend = TrendView::from_history(&self.history.list());

        Ok(Submission {
            report: ResultReport::from(&result),
            result,
            measurement,
            saved,
            trend,
        })
    }

    pub fn trend(&self) -> Option<TrendView> {
        TrendView::from_history(&self.history.list())
    }

    pub fn clear_history(&mut self) -> crate::Result<()> {
        self.history.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::{BmiCategory, Error, Gender, Result};

    fn raw(height: &str, weight: &str) -> RawInput {
        RawInput {
            height: height.into(),
            weight: weight.into(),
            ..Default::default()
        }
    }

    /// Store whose writes always fail
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::Storage("read-only".into()))
        }

        fn remove(&mut self, _key: &str) -> Result<()> {
            Err(Error::Storage("read-only".into()))
        }
    }

    #[test]
    fn test_submit_records_and_builds_trend() {
        let mut calc = Calculator::new(MemoryStore::new(), UnitSystem::Metric);
        let submission = calc.submit(&raw("170", "70")).unwrap();

        assert_eq!(submission.result.bmi, 24.2);
        assert_eq!(submission.report.category, "Normal");
        assert!(submission.saved);
        assert_eq!(submission.measurement.unit, UnitSystem::Metric);

        let trend = submission.trend.unwrap();
        assert_eq!(trend.values, vec![24.2]);
        assert_eq!(calc.history().list()[0], submission.measurement);
    }

    #[test]
    fn test_invalid_input_mutates_nothing() {
        let mut calc = Calculator::new(MemoryStore::new(), UnitSystem::Metric);
        let err = calc.submit(&raw("170", "")).unwrap_err();

        assert_eq!(err, InputError::InvalidWeight);
        assert!(calc.history().list().is_empty());
        assert!(calc.trend().is_none());
    }

    #[test]
    fn test_unit_switch_changes_interpretation() {
        let mut calc = Calculator::new(MemoryStore::new(), UnitSystem::Metric);
        calc.set_unit(UnitSystem::Imperial);

        let submission = calc.submit(&raw("65", "180")).unwrap();
        assert_eq!(submission.result.category, BmiCategory::Overweight);
        assert_eq!(submission.measurement.unit, UnitSystem::Imperial);
        assert!(submission.report.ideal_weight_range_text.ends_with("lbs"));
    }

    #[test]
    fn test_age_and_gender_flow_into_measurement() {
        let mut calc = Calculator::new(MemoryStore::new(), UnitSystem::Metric);
        let input = RawInput {
            height: "160".into(),
            weight: "44".into(),
            age: Some("30".into()),
            gender: Some("female".into()),
        };

        let submission = calc.submit(&input).unwrap();
        assert_eq!(submission.result.bmi, 17.2);
        assert_eq!(submission.report.health_risk_text, "Hormonal imbalance risk");
        assert_eq!(submission.measurement.age, Some(30));
        assert_eq!(submission.measurement.gender, Some(Gender::Female));
    }

    #[test]
    fn test_storage_failure_does_not_abort_computation() {
        let mut calc = Calculator::new(ReadOnlyStore, UnitSystem::Metric);
        let submission = calc.submit(&raw("170", "70")).unwrap();

        assert!(!submission.saved);
        assert_eq!(submission.result.bmi, 24.2);
        assert!(submission.trend.is_none());
    }

    #[test]
    fn test_clear_history() {
        let mut calc = Calculator::new(MemoryStore::new(), UnitSystem::Metric);
        calc.submit(&raw("170", "70")).unwrap();
        calc.submit(&raw("170", "75")).unwrap();
        assert_eq!(calc.trend().unwrap().len(), 2);

        calc.clear_history().unwrap();
        assert!(calc.history().list().is_empty());
        assert!(calc.trend().is_none());
    }

    #[test]
    fn test_evaluate_does_not_record() {
        let calc = Calculator::new(MemoryStore::new(), UnitSystem::Metric);
        let result = calc.evaluate(&raw("180", "90")).unwrap();
        assert_eq!(result.bmi, 27.8);
        assert!(calc.history().list().is_empty());
    }
}
