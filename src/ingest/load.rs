//! Hourly load CSV ingestion.
//!
//! Expected header columns (by name):
//! - `Date`: calendar date, several formats accepted
//! - `HE` or `HR`: hour of day
//! - the territory consumption column (configurable, historically `SDGE`)

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use tracing::warn;

use super::{column_index, IngestError};
use crate::domain::HourlyLoadRecord;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%Y/%m/%d"];

pub fn read_hourly_load(
    path: &Path,
    consumption_column: &str,
) -> Result<Vec<HourlyLoadRecord>, IngestError> {
    let display = path.display().to_string();
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: display.clone(),
        source,
    })?;
    parse_hourly_load(file, consumption_column, &display)
}

/// Parse hourly records from CSV. Rows whose date, hour, or consumption
/// cannot be parsed are dropped with a diagnostic; only a missing required
/// column fails the whole file.
pub fn parse_hourly_load<R: Read>(
    reader: R,
    consumption_column: &str,
    source: &str,
) -> Result<Vec<HourlyLoadRecord>, IngestError> {
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
    let date_idx = column_index(&headers, "Date").ok_or_else(|| missing("Date"))?;
    let hour_idx = column_index(&headers, "HE")
        .or_else(|| column_index(&headers, "HR"))
        .ok_or_else(|| missing("HE"))?;
    let consumption_idx =
        column_index(&headers, consumption_column).ok_or_else(|| missing(consumption_column))?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for (row, result) in rdr.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(%source, row, error = %e, "skipping unreadable CSV row");
                skipped += 1;
                continue;
            }
        };

        let raw_date = record.get(date_idx).unwrap_or("").trim();
        let Some(date) = parse_date(raw_date) else {
            warn!(%source, row, raw = raw_date, "skipping record with unparseable date");
            skipped += 1;
            continue;
        };
        let Ok(hour) = record.get(hour_idx).unwrap_or("").trim().parse::<u32>() else {
            warn!(%source, row, "skipping record with unparseable hour");
            skipped += 1;
            continue;
        };
        let Ok(consumption_mwh) = record
            .get(consumption_idx)
            .unwrap_or("")
            .trim()
            .parse::<f64>()
        else {
            warn!(%source, row, "skipping record with unparseable consumption");
            skipped += 1;
            continue;
        };

        records.push(HourlyLoadRecord {
            date,
            hour,
            consumption_mwh,
        });
    }

    if skipped > 0 {
        warn!(%source, skipped, kept = records.len(), "dropped malformed hourly records");
    }
    Ok(records)
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    // Timestamp-style values carry the date up front
    let head = raw.split_whitespace().next()?;
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(head, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_file() {
        let csv = "Date,HE,SDGE\n2023-01-01,1,2500.5\n2023-01-01,2,2400.0\n";
        let records = parse_hourly_load(csv.as_bytes(), "SDGE", "test").unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(records[0].hour, 1);
        assert_eq!(records[0].consumption_mwh, 2500.5);
    }

    #[test]
    fn test_hr_column_accepted() {
        let csv = "Date,HR,SDGE\n01/15/2024,3,2100.0\n";
        let records = parse_hourly_load(csv.as_bytes(), "SDGE", "test").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].hour, 3);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_bom_and_padded_headers() {
        let csv = "\u{feff}Date , HE ,SDGE\n2023-06-01,1,1800.0\n";
        let records = parse_hourly_load(csv.as_bytes(), "SDGE", "test").unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_bad_rows_skipped_not_fatal() {
        let csv = "Date,HE,SDGE\n\
                   2023-01-01,1,2500.0\n\
                   not-a-date,2,2400.0\n\
                   2023-01-01,two,2300.0\n\
                   2023-01-01,3,n/a\n\
                   2023-01-02,4,2200.0\n";
        let records = parse_hourly_load(csv.as_bytes(), "SDGE", "test").unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_timestamp_dates_accepted() {
        let csv = "Date,HE,SDGE\n2023-03-05 00:00:00,1,2000.0\n";
        let records = parse_hourly_load(csv.as_bytes(), "SDGE", "test").unwrap();
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2023, 3, 5).unwrap());
    }

    #[test]
    fn test_missing_consumption_column_is_error() {
        let csv = "Date,HE,OTHER\n2023-01-01,1,2500.0\n";
        let result = parse_hourly_load(csv.as_bytes(), "SDGE", "test");
        assert!(matches!(
            result,
            Err(IngestError::MissingColumn { ref column, .. }) if column == "SDGE"
        ));
    }
}
