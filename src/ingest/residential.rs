//! Residential usage and income CSV ingestion for the ZIP analysis.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::warn;

use super::{column_index, IngestError};
use crate::domain::{ResidentialReading, ZipIncome};

/// Residential usage table. Columns: `ZipCode`, `Month`, `CustomerClass`,
/// `AveragekWh`.
pub fn read_residential_readings(path: &Path) -> Result<Vec<ResidentialReading>, IngestError> {
    let display = path.display().to_string();
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: display.clone(),
        source,
    })?;
    parse_residential_readings(file, &display)
}

pub fn parse_residential_readings<R: Read>(
    reader: R,
    source: &str,
) -> Result<Vec<ResidentialReading>, IngestError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr
        .headers()
        .map_err(|e| IngestError::Csv {
            path: source.to_string(),
            source: e,
        })?
        .clone();

    let missing = |column: &str| IngestError::MissingColumn {
        column: column.to_string(),
        path: source.to_string(),
    };
    let zip_idx = column_index(&headers, "ZipCode").ok_or_else(|| missing("ZipCode"))?;
    let month_idx = column_index(&headers, "Month").ok_or_else(|| missing("Month"))?;
    let class_idx =
        column_index(&headers, "CustomerClass").ok_or_else(|| missing("CustomerClass"))?;
    let kwh_idx = column_index(&headers, "AveragekWh").ok_or_else(|| missing("AveragekWh"))?;

    let mut readings = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(%source, row, error = %e, "skipping unreadable CSV row");
                continue;
            }
        };
        let Ok(average_kwh) = record.get(kwh_idx).unwrap_or("").trim().parse::<f64>() else {
            warn!(%source, row, "skipping reading with unparseable kWh");
            continue;
        };
        readings.push(ResidentialReading {
            zip_code: record.get(zip_idx).unwrap_or("").trim().to_string(),
            month: record.get(month_idx).unwrap_or("").trim().to_string(),
            customer_class: record.get(class_idx).unwrap_or("").trim().to_string(),
            average_kwh,
        });
    }
    Ok(readings)
}

/// Income table. Columns: `zipcode`, `income_household_median`.
pub fn read_zip_income(path: &Path) -> Result<Vec<ZipIncome>, IngestError> {
    let display = path.display().to_string();
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: display.clone(),
        source,
    })?;
    parse_zip_income(file, &display)
}

pub fn parse_zip_income<R: Read>(reader: R, source: &str) -> Result<Vec<ZipIncome>, IngestError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr
        .headers()
        .map_err(|e| IngestError::Csv {
            path: source.to_string(),
            source: e,
        })?
        .clone();

    let missing = |column: &str| IngestError::MissingColumn {
        column: column.to_string(),
        path: source.to_string(),
    };
    let zip_idx = column_index(&headers, "zipcode").ok_or_else(|| missing("zipcode"))?;
    let income_idx = column_index(&headers, "income_household_median")
        .ok_or_else(|| missing("income_household_median"))?;

    let mut incomes = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(%source, row, error = %e, "skipping unreadable CSV row");
                continue;
            }
        };
        let Ok(median_household_income) =
            record.get(income_idx).unwrap_or("").trim().parse::<f64>()
        else {
            warn!(%source, row, "skipping zip with unparseable income");
            continue;
        };
        incomes.push(ZipIncome {
            zip_code: record.get(zip_idx).unwrap_or("").trim().to_string(),
            median_household_income,
        });
    }
    Ok(incomes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_residential_readings() {
        let csv = "ZipCode,Month,CustomerClass,AveragekWh\n\
                   92101,1,R,450.2\n\
                   92102,1,C,1200.0\n\
                   92103,1,R,bad\n";
        let readings = parse_residential_readings(csv.as_bytes(), "test").unwrap();

        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].zip_code, "92101");
        assert_eq!(readings[0].customer_class, "R");
        assert_eq!(readings[1].customer_class, "C");
    }

    #[test]
    fn test_parse_zip_income() {
        let csv = "zipcode,income_household_median\n92101,85000\n92102,\n92103,95250.5\n";
        let incomes = parse_zip_income(csv.as_bytes(), "test").unwrap();

        assert_eq!(incomes.len(), 2);
        assert_eq!(incomes[0].median_household_income, 85000.0);
        assert_eq!(incomes[1].zip_code, "92103");
    }

    #[test]
    fn test_missing_zip_column_is_error() {
        let csv = "zip,income_household_median\n92101,85000\n";
        let result = parse_zip_income(csv.as_bytes(), "test");
        assert!(matches!(result, Err(IngestError::MissingColumn { .. })));
    }
}
