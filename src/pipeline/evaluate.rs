//! Forecast accuracy against observed months.

use crate::domain::{EvaluationResult, ForecastMonth, ObservedMonth};

/// Mean absolute error between adjusted predictions and observed values over
/// the comparison window.
///
/// Returns `None` when the observed data is empty, when either sequence
/// does not exactly fill the expected window, or when the two are not
/// aligned month-for-month. "No data" must surface as absent, never as a
/// zero MAE.
pub fn evaluate_forecast(
    forecast: &[ForecastMonth],
    observed: &[ObservedMonth],
    expected_window: usize,
) -> Option<EvaluationResult> {
    if expected_window == 0
        || observed.is_empty()
        || observed.len() != expected_window
        || forecast.len() != expected_window
    {
        return None;
    }
    if !forecast
        .iter()
        .zip(observed.iter())
        .all(|(f, o)| f.key == o.key)
    {
        return None;
    }

    let mean_absolute_error_mwh = forecast
        .iter()
        .zip(observed.iter())
        .map(|(f, o)| (f.predicted_adjusted_mwh - o.observed_mwh).abs())
        .sum::<f64>()
        / expected_window as f64;

    Some(EvaluationResult {
        mean_absolute_error_mwh,
        months_compared: expected_window,
    })
}
