//! Metric sample summaries per window.

use serde::{Deserialize, Serialize};

use crate::cost::window::{calculate_for_all_windows, Calculations, Window};

/// Aggregate of a run of metric samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSummary {
    /// Number of samples.
    pub count: usize,
    /// Sum of the samples.
    pub sum: f64,
    /// `sum / count`, 0 without samples.
    pub average: f64,
    /// Mean of the non-zero samples, 0 if there are none.
    pub average_non_zero: f64,
}

/// Summarize `values`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize(values: &[f64]) -> MetricSummary {
    let sum: f64 = values.iter().sum();
    let non_zero = values.iter().filter(|v| **v != 0.0).count();

    MetricSummary {
        count: values.len(),
        sum,
        average: if values.is_empty() { 0.0 } else { sum / values.len() as f64 },
        average_non_zero: if non_zero == 0 { 0.0 } else { sum / non_zero as f64 },
    }
}

/// Summarize a series sampled every `period_secs`, ordered oldest first,
/// over each window.
///
/// [`Window::Last`] is the newest sample alone. Every other window takes
/// the newest `max(1, window / period)` samples.
#[must_use]
pub fn summarize_series(values: &[f64], period_secs: u64) -> Calculations<MetricSummary> {
    let period = period_secs.max(1);
    calculate_for_all_windows(|window, seconds| {
        let wanted = match window {
            Window::Last => 1,
            _ => usize::try_from((seconds / period).max(1)).unwrap_or(usize::MAX),
        };
        let start = values.len().saturating_sub(wanted);
        summarize(&values[start..])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize() {
        let s = summarize(&[0.0, 2.0, 4.0, 0.0]);
        assert_eq!(s.count, 4);
        assert_eq!(s.sum, 6.0);
        assert_eq!(s.average, 1.5);
        assert_eq!(s.average_non_zero, 3.0);

        assert_eq!(summarize(&[]), MetricSummary::default());
    }

    #[test]
    fn test_summarize_series_takes_newest_samples() {
        // 24 hourly samples: 1.0 for the last hour, 0.0 before it.
        let mut values = vec![0.0; 23];
        values.push(1.0);

        let out = summarize_series(&values, 3600);

        assert_eq!(out.last.count, 1);
        assert_eq!(out.last.sum, 1.0);
        assert_eq!(out.avg1h.count, 1);
        assert_eq!(out.avg1d.count, 24);
        assert!((out.avg1d.average - 1.0 / 24.0).abs() < 1e-12);
        assert_eq!(out.avg1d.average_non_zero, 1.0);
        assert_eq!(out.avg1w.count, 24);
    }

    #[test]
    fn test_last_window_is_newest_sample_at_fine_periods() {
        // minute samples: five of them fit in the 5 minute window
        let mut values = vec![2.0; 19];
        values.push(7.0);

        let out = summarize_series(&values, 60);

        assert_eq!(out.last.count, 1);
        assert_eq!(out.last.sum, 7.0);
        assert_eq!(out.avg1h.count, 20);
        assert_eq!(out.avg1h.sum, 45.0);
    }
}
