//! The load forecasting pipeline: aggregation, merge, model fit, forecast,
//! seasonal adjustment, and evaluation.
//!
//! All stages are pure functions over immutable inputs; each stage's output
//! is fully materialized before the next begins. The orchestrator owns no
//! state beyond its configuration and the read-only seasonal table, so a
//! host may re-run it freely.

pub mod adjust;
pub mod aggregate;
pub mod evaluate;
pub mod features;
pub mod merge;
pub mod model;
pub mod residential;

pub use adjust::SeasonalAdjustments;
pub use aggregate::{aggregate_hour_weekday, aggregate_monthly};
pub use evaluate::evaluate_forecast;
pub use features::encode_month;
pub use merge::{join_income, merge_monthly};
pub use model::{FittedLoadRegression, SplitConfig};
pub use residential::{household_averages_by_zip, residential_income_table};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::{
    EvaluationResult, ForecastMonth, HistoricalTrainingRow, HourlyLoadRecord, MonthKey,
    MonthlyWeatherRecord, ObservedMonth,
};

/// Pipeline failure taxonomy. A zero-row inner join surfaces as
/// `EmptyDataset` for the stage that depends on it; independent branches
/// (forecast vs. residential analysis) fail independently.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PipelineError {
    #[error("empty dataset: {dataset}")]
    EmptyDataset { dataset: &'static str },

    #[error("training set too small: {rows} rows for {parameters} parameters")]
    DegenerateTraining { rows: usize, parameters: usize },

    #[error("feature dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub forecast_year: i32,
    /// Assumed average temperature per forecast month, January first
    pub forecast_temperatures_f: [f64; 12],
    pub split: SplitConfig,
    /// Number of leading forecast months with ground truth available
    pub comparison_window: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            forecast_year: 2024,
            forecast_temperatures_f: [
                57.0, 59.0, 60.0, 62.0, 65.0, 75.0, 78.0, 80.0, 70.0, 68.0, 61.0, 55.0,
            ],
            split: SplitConfig::default(),
            comparison_window: 6,
        }
    }
}

/// Everything a pipeline run exposes to the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineRun {
    pub training_table: Vec<HistoricalTrainingRow>,
    /// Twelve months, ordered January through December
    pub forecast: Vec<ForecastMonth>,
    pub holdout_rmse: Option<f64>,
    /// Absent whenever the comparison window is unsatisfied
    pub evaluation: Option<EvaluationResult>,
}

pub struct LoadForecastPipeline {
    config: PipelineConfig,
    adjustments: SeasonalAdjustments,
}

impl LoadForecastPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            adjustments: SeasonalAdjustments::default(),
        }
    }

    pub fn with_adjustments(mut self, adjustments: SeasonalAdjustments) -> Self {
        self.adjustments = adjustments;
        self
    }

    /// Run the batch end to end.
    ///
    /// `observed` must be sorted by month and restricted to the forecast
    /// year; an unsatisfied comparison window yields `evaluation: None`,
    /// not an error.
    pub fn run(
        &self,
        loads: &[HourlyLoadRecord],
        weather: &[MonthlyWeatherRecord],
        observed: &[ObservedMonth],
    ) -> Result<PipelineRun, PipelineError> {
        if loads.is_empty() {
            return Err(PipelineError::EmptyDataset { dataset: "hourly load" });
        }
        if weather.is_empty() {
            return Err(PipelineError::EmptyDataset { dataset: "monthly weather" });
        }

        let aggregates = aggregate_monthly(loads);
        debug!(months = aggregates.len(), "aggregated hourly load");

        let training_table = merge_monthly(&aggregates, weather);
        if training_table.is_empty() {
            return Err(PipelineError::EmptyDataset { dataset: "training table" });
        }
        info!(rows = training_table.len(), "built historical training table");

        let model = FittedLoadRegression::fit(&training_table, &self.config.split)?;
        if let Some(rmse) = model.holdout_rmse() {
            info!(rmse_mwh = rmse, "held-out RMSE");
        }

        let mut forecast = Vec::with_capacity(12);
        for month in 1..=12u32 {
            let input_temperature_f =
                self.config.forecast_temperatures_f[(month - 1) as usize];
            let (month_sin, month_cos) = encode_month(month);
            let predicted_raw_mwh =
                model.predict(&[input_temperature_f, month_sin, month_cos])?;
            forecast.push(ForecastMonth {
                key: MonthKey::new(self.config.forecast_year, month),
                input_temperature_f,
                predicted_raw_mwh,
                predicted_adjusted_mwh: self.adjustments.apply(month, predicted_raw_mwh),
            });
        }

        let window = self.config.comparison_window.min(forecast.len());
        let evaluation = evaluate_forecast(&forecast[..window], observed, window);

        Ok(PipelineRun {
            training_table,
            forecast,
            holdout_rmse: model.holdout_rmse(),
            evaluation,
        })
    }
}
