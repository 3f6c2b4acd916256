use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use territory_load_forecast::config::Config;
use territory_load_forecast::domain::{MonthlyWeatherRecord, ObservedMonth};
use territory_load_forecast::ingest;
use territory_load_forecast::pipeline::{
    aggregate_hour_weekday, aggregate_monthly, residential_income_table, LoadForecastPipeline,
    PipelineConfig, SplitConfig,
};
use territory_load_forecast::telemetry::init_tracing;
use tracing::{error, info, warn};

fn main() -> Result<()> {
    init_tracing();

    let cfg = Config::load().context("loading configuration")?;
    let temperatures: [f64; 12] = cfg
        .forecast
        .temperatures_f
        .clone()
        .try_into()
        .map_err(|v: Vec<f64>| {
            anyhow::anyhow!("forecast.temperatures_f must have 12 entries, got {}", v.len())
        })?;
    fs::create_dir_all(&cfg.output.dir)
        .with_context(|| format!("creating output dir {}", cfg.output.dir.display()))?;

    // Historical hourly load; a bad file contributes nothing
    let mut hourly = Vec::new();
    for path in &cfg.data.load_files {
        match ingest::read_hourly_load(path, &cfg.data.consumption_column) {
            Ok(mut records) => {
                info!(path = %path.display(), rows = records.len(), "loaded hourly load file");
                hourly.append(&mut records);
            }
            Err(e) => warn!(path = %path.display(), error = %e, "skipping load file"),
        }
    }

    // Monthly weather, one file per calendar year
    let mut weather: Vec<MonthlyWeatherRecord> = Vec::new();
    for path in &cfg.data.weather_files {
        let Some(year) = ingest::year_from_file_name(path) else {
            warn!(path = %path.display(), "skipping weather file without a year tag");
            continue;
        };
        match ingest::read_monthly_weather(path, year) {
            Ok(mut records) => {
                info!(path = %path.display(), year, rows = records.len(), "loaded weather file");
                weather.append(&mut records);
            }
            Err(e) => warn!(path = %path.display(), error = %e, "skipping weather file"),
        }
    }

    // Observed months of the forecast year, for evaluation
    let mut observed: Vec<ObservedMonth> = Vec::new();
    for path in &cfg.data.observed_files {
        match ingest::read_hourly_load(path, &cfg.data.consumption_column) {
            Ok(records) => {
                for aggregate in aggregate_monthly(&records) {
                    if aggregate.key.year == cfg.forecast.year {
                        observed.push(ObservedMonth {
                            key: aggregate.key,
                            observed_mwh: aggregate.mean_consumption_mwh,
                        });
                    } else {
                        warn!(
                            path = %path.display(), key = %aggregate.key,
                            "observed file carries months outside the forecast year"
                        );
                    }
                }
            }
            Err(e) => warn!(path = %path.display(), error = %e, "skipping observed file"),
        }
    }
    observed.sort_by_key(|o| o.key);
    observed.dedup_by_key(|o| o.key);

    // Intra-week load profile over the full historical span
    let profile = aggregate_hour_weekday(&hourly);
    if profile.is_empty() {
        warn!("no hourly records; skipping hour-by-weekday profile");
    } else {
        info!(cells = profile.len(), "computed hour-by-weekday profile");
        write_json(&cfg.output.dir.join("hour_weekday_profile.json"), &profile)?;
    }

    // Forecast branch
    let pipeline = LoadForecastPipeline::new(PipelineConfig {
        forecast_year: cfg.forecast.year,
        forecast_temperatures_f: temperatures,
        split: SplitConfig {
            train_ratio: cfg.model.train_ratio,
            seed: cfg.model.split_seed,
        },
        comparison_window: cfg.evaluation.window_months,
    });
    match pipeline.run(&hourly, &weather, &observed) {
        Ok(run) => {
            write_json(&cfg.output.dir.join("training_table.json"), &run.training_table)?;
            write_json(&cfg.output.dir.join("forecast.json"), &run.forecast)?;
            // "not computed" must stay distinguishable from a computed MAE
            let evaluation = match &run.evaluation {
                Some(result) => serde_json::json!({ "available": true, "result": result }),
                None => serde_json::json!({ "available": false }),
            };
            write_json(&cfg.output.dir.join("evaluation.json"), &evaluation)?;

            match &run.evaluation {
                Some(result) => info!(
                    mae_mwh = result.mean_absolute_error_mwh,
                    months = result.months_compared,
                    "forecast evaluation"
                ),
                None => warn!(
                    observed = observed.len(),
                    window = cfg.evaluation.window_months,
                    "comparison window unsatisfied; MAE not computed"
                ),
            }
        }
        Err(e) => error!(error = %e, "forecast branch failed"),
    }

    // Residential ZIP branch, independent of the forecast branch
    if let (Some(residential_path), Some(income_path)) =
        (&cfg.data.residential_file, &cfg.data.income_file)
    {
        run_residential_branch(residential_path, income_path, &cfg.output.dir)?;
    }

    Ok(())
}

fn run_residential_branch(
    residential_path: &Path,
    income_path: &Path,
    output_dir: &Path,
) -> Result<()> {
    let readings = match ingest::read_residential_readings(residential_path) {
        Ok(readings) => readings,
        Err(e) => {
            warn!(path = %residential_path.display(), error = %e, "skipping residential file");
            Vec::new()
        }
    };
    let income = match ingest::read_zip_income(income_path) {
        Ok(income) => income,
        Err(e) => {
            warn!(path = %income_path.display(), error = %e, "skipping income file");
            Vec::new()
        }
    };

    match residential_income_table(&readings, &income) {
        Ok(table) => {
            write_json(&output_dir.join("zip_income.json"), &table)?;
            info!(zips = table.len(), "residential analysis complete");
        }
        Err(e) => error!(error = %e, "residential branch failed"),
    }
    Ok(())
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let file =
        fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(file, value)
        .with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "wrote output");
    Ok(())
}
