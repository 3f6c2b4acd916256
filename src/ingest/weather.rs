//! Monthly weather CSV ingestion.
//!
//! Expected header columns (by name): `MONTH` (1-12) and `AVTEMP` (°F).
//! Each file covers exactly one calendar year; the year is carried in the
//! file name rather than the rows.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::warn;

use super::{column_index, IngestError};
use crate::domain::{MonthKey, MonthlyWeatherRecord};

/// Recover the year tag from a weather file name: the first run of exactly
/// four digits in the stem, restricted to a plausible year range.
pub fn year_from_file_name(path: &Path) -> Option<i32> {
    let stem = path.file_stem()?.to_str()?;
    let bytes = stem.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if i - start == 4 {
                if let Ok(year) = stem[start..i].parse::<i32>() {
                    if (1900..=2100).contains(&year) {
                        return Some(year);
                    }
                }
            }
        } else {
            i += 1;
        }
    }
    None
}

pub fn read_monthly_weather(
    path: &Path,
    year: i32,
) -> Result<Vec<MonthlyWeatherRecord>, IngestError> {
    let display = path.display().to_string();
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: display.clone(),
        source,
    })?;
    parse_monthly_weather(file, year, &display)
}

/// No grouping happens here: each row projects directly into a
/// `MonthlyWeatherRecord` under the supplied year tag.
pub fn parse_monthly_weather<R: Read>(
    reader: R,
    year: i32,
    source: &str,
) -> Result<Vec<MonthlyWeatherRecord>, IngestError> {
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
    let month_idx = column_index(&headers, "MONTH").ok_or_else(|| missing("MONTH"))?;
    let temp_idx = column_index(&headers, "AVTEMP").ok_or_else(|| missing("AVTEMP"))?;

    let mut records = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(%source, row, error = %e, "skipping unreadable CSV row");
                continue;
            }
        };

        let month = record
            .get(month_idx)
            .unwrap_or("")
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|m| m.fract() == 0.0 && (1.0..=12.0).contains(m))
            .map(|m| m as u32);
        let Some(month) = month else {
            warn!(%source, row, "skipping record with invalid month");
            continue;
        };
        let Ok(avg_temperature_f) = record.get(temp_idx).unwrap_or("").trim().parse::<f64>()
        else {
            warn!(%source, row, "skipping record with unparseable temperature");
            continue;
        };

        records.push(MonthlyWeatherRecord {
            key: MonthKey::new(year, month),
            avg_temperature_f,
        });
    }
    Ok(records)
}
