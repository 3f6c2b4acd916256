use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Calendar key
// ============================================================================

/// (year, month) key used for grouping and joining monthly data.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct MonthKey {
    pub year: i32,
    /// Calendar month, 1-12
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

// ============================================================================
// Load & weather records
// ============================================================================

/// One hourly territory-wide meter reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyLoadRecord {
    pub date: NaiveDate,
    /// Hour-ending as carried by the source files (1-24 under `HE`, 0-23 under `HR`)
    pub hour: u32,
    pub consumption_mwh: f64,
}

/// Monthly average temperature for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyWeatherRecord {
    #[serde(flatten)]
    pub key: MonthKey,
    pub avg_temperature_f: f64,
}

/// Mean consumption over all hourly records of one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    #[serde(flatten)]
    pub key: MonthKey,
    pub mean_consumption_mwh: f64,
}

/// Mean consumption for one (hour-of-day, weekday) cell of the intra-week
/// load profile, averaged over every source year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourWeekdayAggregate {
    pub hour: u32,
    /// Full weekday name, `Monday` through `Sunday`
    pub weekday: String,
    pub mean_consumption_mwh: f64,
}

/// One row of the historical training table: monthly load joined with
/// weather, plus the cyclical month features the model is fitted on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalTrainingRow {
    #[serde(flatten)]
    pub key: MonthKey,
    pub mean_consumption_mwh: f64,
    pub avg_temperature_f: f64,
    pub month_sin: f64,
    pub month_cos: f64,
}

// ============================================================================
// Forecast & evaluation
// ============================================================================

/// One month of the forward forecast, carrying both the raw model output
/// and the seasonally adjusted value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastMonth {
    #[serde(flatten)]
    pub key: MonthKey,
    /// Externally assumed temperature for this month, not an observation
    pub input_temperature_f: f64,
    pub predicted_raw_mwh: f64,
    pub predicted_adjusted_mwh: f64,
}

/// Ground-truth monthly consumption, available only for months that have
/// already elapsed at evaluation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservedMonth {
    #[serde(flatten)]
    pub key: MonthKey,
    pub observed_mwh: f64,
}

/// Forecast accuracy over the comparison window. Only produced when the
/// observed data exactly fills the window; never defaulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub mean_absolute_error_mwh: f64,
    pub months_compared: usize,
}

// ============================================================================
// Residential ZIP analysis
// ============================================================================

/// One row of the residential usage table (per ZIP code and month).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResidentialReading {
    pub zip_code: String,
    /// Month label as carried by the source, kept opaque for deduplication
    pub month: String,
    pub customer_class: String,
    pub average_kwh: f64,
}

/// Mean household usage for one ZIP code across all its months.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZipAverage {
    pub zip_code: String,
    pub avg_kwh_per_household: f64,
}

/// Median household income for one ZIP code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZipIncome {
    pub zip_code: String,
    pub median_household_income: f64,
}

/// Usage joined with income on the ZIP key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZipIncomeRow {
    pub zip_code: String,
    pub avg_kwh_per_household: f64,
    pub median_household_income: f64,
}
