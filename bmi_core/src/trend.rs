//! Chart-ready series derived from recent history.

use crate::engine::{classify_adult, NORMAL_BMI_MAX, NORMAL_BMI_MIN};
use crate::Measurement;
use serde::Serialize;

/// How many of the newest measurements the chart shows
pub const TREND_WINDOW: usize = 15;

/// Padding above and below the plotted values
const Y_PADDING: f64 = 5.0;

/// Parallel series for a BMI line chart, oldest point first
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrendView {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub point_colors: Vec<String>,
    pub y_min: f64,
    pub y_max: f64,
    /// Shaded reference zone for the normal band
    pub normal_zone: (f64, f64),
}

impl TrendView {
    /// Build the view from a newest-first log; `None` when the log is empty
    ///
    /// Point colours use the adult bands on the stored, rounded value: the
    /// chart shows a trend, not a re-assessment with age or gender. A value
    /// that rounded up onto a band edge (29.95 stored as 30.0) is coloured
    /// by the upper band even though its recorded category is the lower one.
    pub fn from_history(log: &[Measurement]) -> Option<Self> {
        if log.is_empty() {
            return None;
        }

        let window: Vec<&Measurement> = log.iter().take(TREND_WINDOW).rev().collect();

        let labels = window.iter().map(|m| m.date.clone()).collect();
        let values: Vec<f64> = window.iter().map(|m| m.bmi).collect();
        let point_colors = values
            .iter()
            .map(|&bmi| classify_adult(bmi).color().to_string())
            .collect();

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            labels,
            values,
            point_colors,
            y_min: (min - Y_PADDING).max(0.0),
            y_max: max + Y_PADDING,
            normal_zone: (NORMAL_BMI_MIN, NORMAL_BMI_MAX),
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BmiCategory, UnitSystem};

    fn m(bmi: f64, date: &str) -> Measurement {
        Measurement {
            id: 0,
            bmi,
            category: BmiCategory::Normal,
            date: date.into(),
            time: "12:00".into(),
            age: Some(10),
            gender: None,
            unit: UnitSystem::Metric,
        }
    }

    #[test]
    fn test_empty_history_has_no_trend() {
        assert!(TrendView::from_history(&[]).is_none());
    }

    #[test]
    fn test_chronological_order_and_colors() {
        // Newest first, as the history store returns it
        let log = vec![m(31.0, "d3"), m(22.0, "d2"), m(17.0, "d1")];
        let view = TrendView::from_history(&log).unwrap();

        assert_eq!(view.labels, vec!["d1", "d2", "d3"]);
        assert_eq!(view.values, vec![17.0, 22.0, 31.0]);
        // Adult bands even though the measurements carried a child's age
        assert_eq!(view.point_colors, vec!["#3498db", "#4caf50", "#f44336"]);
        assert_eq!(view.y_min, 12.0);
        assert_eq!(view.y_max, 36.0);
    }

    #[test]
    fn test_window_keeps_newest_fifteen() {
        let log: Vec<Measurement> = (0..20)
            .map(|i| m(40.0 - i as f64, &format!("day{}", 20 - i)))
            .collect();
        let view = TrendView::from_history(&log).unwrap();

        assert_eq!(view.len(), TREND_WINDOW);
        assert_eq!(view.labels.first().unwrap(), "day6");
        assert_eq!(view.labels.last().unwrap(), "day20");
        assert_eq!(view.values.last().copied(), Some(40.0));
    }

    #[test]
    fn test_color_follows_stored_value_at_band_edge() {
        let mut edge = m(30.0, "d1");
        edge.age = None;
        edge.category = BmiCategory::Overweight;

        let view = TrendView::from_history(&[edge]).unwrap();
        assert_eq!(view.point_colors, vec![BmiCategory::Obese.color()]);
    }

    #[test]
    fn test_y_min_clamped_at_zero() {
        let view = TrendView::from_history(&[m(3.0, "d1")]).unwrap();
        assert_eq!(view.y_min, 0.0);
        assert_eq!(view.y_max, 8.0);
    }
}
