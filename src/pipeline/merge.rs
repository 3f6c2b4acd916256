//! Inner joins: monthly load with weather, ZIP averages with income.

use std::collections::HashMap;

use crate::domain::{
    HistoricalTrainingRow, MonthKey, MonthlyAggregate, MonthlyWeatherRecord, ZipAverage,
    ZipIncome, ZipIncomeRow,
};
use crate::pipeline::features::encode_month;

/// Inner equi-join of monthly load aggregates with weather on (year, month),
/// producing training rows with the cyclical month features attached.
///
/// Aggregates without a weather match are dropped. The load side is already
/// deduplicated by aggregation; duplicate keys on the weather side collapse
/// to the last entry rather than inflating the row count.
pub fn merge_monthly(
    loads: &[MonthlyAggregate],
    weather: &[MonthlyWeatherRecord],
) -> Vec<HistoricalTrainingRow> {
    let temps: HashMap<MonthKey, f64> = weather
        .iter()
        .map(|w| (w.key, w.avg_temperature_f))
        .collect();

    loads
        .iter()
        .filter_map(|aggregate| {
            temps.get(&aggregate.key).map(|&avg_temperature_f| {
                let (month_sin, month_cos) = encode_month(aggregate.key.month);
                HistoricalTrainingRow {
                    key: aggregate.key,
                    mean_consumption_mwh: aggregate.mean_consumption_mwh,
                    avg_temperature_f,
                    month_sin,
                    month_cos,
                }
            })
        })
        .collect()
}

/// Inner join of per-ZIP usage averages with the income table.
///
/// Both sides are coerced to the same trimmed string key before matching; a
/// raw representation mismatch between the sources would otherwise yield
/// zero matches without any error.
pub fn join_income(averages: &[ZipAverage], income: &[ZipIncome]) -> Vec<ZipIncomeRow> {
    let by_zip: HashMap<String, f64> = income
        .iter()
        .map(|i| (normalize_zip(&i.zip_code), i.median_household_income))
        .collect();

    averages
        .iter()
        .filter_map(|avg| {
            let zip_code = normalize_zip(&avg.zip_code);
            by_zip.get(&zip_code).map(|&median_household_income| ZipIncomeRow {
                zip_code,
                avg_kwh_per_household: avg.avg_kwh_per_household,
                median_household_income,
            })
        })
        .collect()
}

pub(crate) fn normalize_zip(raw: &str) -> String {
    raw.trim().to_string()
}
