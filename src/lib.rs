//! Territory Load Forecast
//!
//! Monthly electricity load forecasting for a single utility service
//! territory:
//! - Aggregation of multi-year hourly load records to monthly means
//! - Merge with monthly weather averages into a training table
//! - Linear regression on temperature and cyclical month features
//! - Seasonally adjusted 12-month forward forecast
//! - Accuracy evaluation against observed months
//!
//! # Architecture
//! - `ingest` reads the raw CSV sources (tolerant, per-source skip)
//! - `pipeline` holds the pure batch stages and the orchestrator
//! - `domain` defines the value types flowing between stages

pub mod config;
pub mod domain;
pub mod ingest;
pub mod pipeline;
pub mod telemetry;
