//! End-to-end pipeline test: CSV sources through ingestion, training,
//! forecasting, adjustment, and evaluation.

use territory_load_forecast::domain::{MonthKey, ObservedMonth};
use territory_load_forecast::ingest::load::parse_hourly_load;
use territory_load_forecast::ingest::weather::parse_monthly_weather;
use territory_load_forecast::pipeline::{
    aggregate_monthly, LoadForecastPipeline, PipelineConfig, SeasonalAdjustments,
};

fn temp_for(month: u32) -> f64 {
    52.0 + 2.0 * month as f64
}

/// Generating relation for the synthetic history: load responds linearly to
/// temperature.
fn consumption_for(month: u32) -> f64 {
    25.0 * temp_for(month) + 1200.0
}

fn load_csv_for_year(year: i32) -> String {
    let mut csv = String::from("Date,HE,SDGE\n");
    for month in 1..=12u32 {
        for day in 1..=2 {
            for hour in 1..=6 {
                csv.push_str(&format!(
                    "{year}-{month:02}-{day:02},{hour},{}\n",
                    consumption_for(month)
                ));
            }
        }
    }
    csv
}

fn weather_csv() -> String {
    let mut csv = String::from("MONTH,AVTEMP\n");
    for month in 1..=12u32 {
        csv.push_str(&format!("{month},{}\n", temp_for(month)));
    }
    csv
}

fn pipeline_config() -> PipelineConfig {
    let mut config = PipelineConfig::default();
    for month in 1..=12u32 {
        config.forecast_temperatures_f[(month - 1) as usize] = temp_for(month);
    }
    config
}

#[test]
fn csv_sources_to_evaluated_forecast() {
    let mut hourly = Vec::new();
    let mut weather = Vec::new();
    for year in 2019..=2023 {
        let csv = load_csv_for_year(year);
        hourly.extend(parse_hourly_load(csv.as_bytes(), "SDGE", "load").unwrap());
        weather.extend(parse_monthly_weather(weather_csv().as_bytes(), year, "weather").unwrap());
    }

    // Observed first half of 2024, produced the same way the binary does it
    let mut observed = Vec::new();
    for month in 1..=6u32 {
        let csv = format!(
            "Date,HE,SDGE\n2024-{month:02}-01,1,{v}\n2024-{month:02}-01,2,{v}\n",
            v = consumption_for(month)
        );
        let records = parse_hourly_load(csv.as_bytes(), "SDGE", "observed").unwrap();
        for aggregate in aggregate_monthly(&records) {
            observed.push(ObservedMonth {
                key: aggregate.key,
                observed_mwh: aggregate.mean_consumption_mwh,
            });
        }
    }
    observed.sort_by_key(|o| o.key);

    let run = LoadForecastPipeline::new(pipeline_config())
        .run(&hourly, &weather, &observed)
        .unwrap();

    assert_eq!(run.training_table.len(), 60);
    assert_eq!(run.forecast.len(), 12);
    assert!(run.holdout_rmse.is_some());

    let adjustments = SeasonalAdjustments::default();
    for forecast_month in &run.forecast {
        let month = forecast_month.key.month;
        assert_eq!(forecast_month.key.year, 2024);
        // noiseless inputs: the raw forecast recovers the generating relation
        assert!(
            (forecast_month.predicted_raw_mwh - consumption_for(month)).abs() < 1e-6,
            "month {month}: raw {} vs expected {}",
            forecast_month.predicted_raw_mwh,
            consumption_for(month)
        );
        assert!(
            (forecast_month.predicted_adjusted_mwh
                - forecast_month.predicted_raw_mwh * adjustments.factor(month))
            .abs()
                < 1e-9
        );
    }

    // Observed values equal the raw predictions, so the MAE is exactly the
    // seasonal shift averaged over January-June
    let evaluation = run.evaluation.expect("window satisfied");
    assert_eq!(evaluation.months_compared, 6);
    let expected_mae = (1..=6u32)
        .map(|m| (consumption_for(m) * (adjustments.factor(m) - 1.0)).abs())
        .sum::<f64>()
        / 6.0;
    assert!((evaluation.mean_absolute_error_mwh - expected_mae).abs() < 1e-6);
}

#[test]
fn identical_inputs_and_seed_reproduce_the_forecast() {
    let mut hourly = Vec::new();
    let mut weather = Vec::new();
    for year in 2019..=2023 {
        let csv = load_csv_for_year(year);
        hourly.extend(parse_hourly_load(csv.as_bytes(), "SDGE", "load").unwrap());
        weather.extend(parse_monthly_weather(weather_csv().as_bytes(), year, "weather").unwrap());
    }

    let a = LoadForecastPipeline::new(pipeline_config())
        .run(&hourly, &weather, &[])
        .unwrap();
    let b = LoadForecastPipeline::new(pipeline_config())
        .run(&hourly, &weather, &[])
        .unwrap();

    assert_eq!(a.forecast, b.forecast);
    assert_eq!(a.holdout_rmse, b.holdout_rmse);
}

#[test]
fn partially_observed_year_leaves_evaluation_absent() {
    let mut hourly = Vec::new();
    let mut weather = Vec::new();
    for year in 2019..=2023 {
        let csv = load_csv_for_year(year);
        hourly.extend(parse_hourly_load(csv.as_bytes(), "SDGE", "load").unwrap());
        weather.extend(parse_monthly_weather(weather_csv().as_bytes(), year, "weather").unwrap());
    }

    // Only three observed months against a six-month window
    let observed: Vec<ObservedMonth> = (1..=3u32)
        .map(|month| ObservedMonth {
            key: MonthKey::new(2024, month),
            observed_mwh: consumption_for(month),
        })
        .collect();

    let run = LoadForecastPipeline::new(pipeline_config())
        .run(&hourly, &weather, &observed)
        .unwrap();

    assert!(run.evaluation.is_none());
    assert_eq!(run.forecast.len(), 12); // forecast itself is unaffected
}
