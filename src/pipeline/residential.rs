//! Residential usage by ZIP code, joined with household income.

use itertools::Itertools;
use std::collections::BTreeMap;

use crate::domain::{ResidentialReading, ZipAverage, ZipIncome, ZipIncomeRow};
use crate::pipeline::merge::{join_income, normalize_zip};
use crate::pipeline::PipelineError;

const RESIDENTIAL_CLASS: &str = "R";

/// Mean household kWh per ZIP code.
///
/// Keeps residential-class readings with positive usage, deduplicates by
/// (zip, month) so a repeated source row cannot skew the mean, then
/// averages each ZIP across its months.
pub fn household_averages_by_zip(readings: &[ResidentialReading]) -> Vec<ZipAverage> {
    let mut sums: BTreeMap<String, (f64, u64)> = BTreeMap::new();

    for reading in readings
        .iter()
        .filter(|r| r.customer_class.trim() == RESIDENTIAL_CLASS && r.average_kwh > 0.0)
        .unique_by(|r| (normalize_zip(&r.zip_code), r.month.trim().to_string()))
    {
        let entry = sums
            .entry(normalize_zip(&reading.zip_code))
            .or_insert((0.0, 0));
        entry.0 += reading.average_kwh;
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(zip_code, (sum, count))| ZipAverage {
            zip_code,
            avg_kwh_per_household: sum / count as f64,
        })
        .collect()
}

/// Full residential branch: per-ZIP averages joined with the income table.
pub fn residential_income_table(
    readings: &[ResidentialReading],
    income: &[ZipIncome],
) -> Result<Vec<ZipIncomeRow>, PipelineError> {
    let averages = household_averages_by_zip(readings);
    if averages.is_empty() {
        return Err(PipelineError::EmptyDataset {
            dataset: "residential zip averages",
        });
    }

    let joined = join_income(&averages, income);
    if joined.is_empty() {
        return Err(PipelineError::EmptyDataset {
            dataset: "zip/income join",
        });
    }
    Ok(joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(zip: &str, month: &str, class: &str, kwh: f64) -> ResidentialReading {
        ResidentialReading {
            zip_code: zip.to_string(),
            month: month.to_string(),
            customer_class: class.to_string(),
            average_kwh: kwh,
        }
    }

    #[test]
    fn test_averages_filter_and_mean() {
        let readings = vec![
            reading("92101", "1", "R", 400.0),
            reading("92101", "2", "R", 500.0),
            reading("92101", "3", "C", 9999.0), // non-residential, dropped
            reading("92101", "4", "R", 0.0),    // non-positive, dropped
            reading("92102", "1", "R", 300.0),
        ];

        let averages = household_averages_by_zip(&readings);

        assert_eq!(averages.len(), 2);
        assert_eq!(averages[0].zip_code, "92101");
        assert_eq!(averages[0].avg_kwh_per_household, 450.0);
        assert_eq!(averages[1].zip_code, "92102");
        assert_eq!(averages[1].avg_kwh_per_household, 300.0);
    }

    #[test]
    fn test_duplicate_zip_month_rows_counted_once() {
        let readings = vec![
            reading("92101", "1", "R", 400.0),
            reading("92101", "1", "R", 800.0), // duplicate key, ignored
            reading("92101", "2", "R", 600.0),
        ];

        let averages = household_averages_by_zip(&readings);
        assert_eq!(averages.len(), 1);
        assert_eq!(averages[0].avg_kwh_per_household, 500.0);
    }

    #[test]
    fn test_income_table_happy_path() {
        let readings = vec![
            reading("92101", "1", "R", 400.0),
            reading("92102", "1", "R", 600.0),
        ];
        let income = vec![
            ZipIncome { zip_code: "92101".to_string(), median_household_income: 80000.0 },
            ZipIncome { zip_code: "92102".to_string(), median_household_income: 95000.0 },
        ];

        let table = residential_income_table(&readings, &income).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_empty_filter_result_is_error() {
        let readings = vec![reading("92101", "1", "C", 400.0)];
        let result = residential_income_table(&readings, &[]);
        assert!(matches!(result, Err(PipelineError::EmptyDataset { .. })));
    }

    #[test]
    fn test_zero_match_join_is_error() {
        let readings = vec![reading("92101", "1", "R", 400.0)];
        let income = vec![ZipIncome {
            zip_code: "10001".to_string(),
            median_household_income: 70000.0,
        }];
        let result = residential_income_table(&readings, &income);
        assert!(matches!(
            result,
            Err(PipelineError::EmptyDataset { dataset: "zip/income join" })
        ));
    }
}
