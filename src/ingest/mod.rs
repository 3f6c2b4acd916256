//! Tolerant CSV ingestion for the raw data sources.
//!
//! A file that cannot be opened or lacks a required column surfaces as an
//! `IngestError` the caller may skip (that source then contributes
//! nothing). Individual malformed rows are dropped with a logged
//! diagnostic and never fail the batch.

pub mod load;
pub mod residential;
pub mod weather;

pub use load::read_hourly_load;
pub use residential::{read_residential_readings, read_zip_income};
pub use weather::{read_monthly_weather, year_from_file_name};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid CSV in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("missing column '{column}' in {path}")]
    MissingColumn { column: String, path: String },

    #[error("no four-digit year tag in file name '{path}'")]
    MissingYearTag { path: String },
}

/// Header names arrive with stray whitespace and, in some exports, a UTF-8
/// BOM glued to the first column.
pub(crate) fn clean_header(raw: &str) -> &str {
    raw.trim_start_matches('\u{feff}').trim()
}

pub(crate) fn column_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| clean_header(h) == name)
}
