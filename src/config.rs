use anyhow::Result;
use figment::{providers::{Env, Format, Toml}, Figment};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    pub forecast: ForecastConfig,
    pub model: ModelConfig,
    pub evaluation: EvaluationConfig,
    pub output: OutputConfig,
}

/// Raw source files. Each load/weather file covers one calendar year;
/// each observed file covers one month of the forecast year.
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    pub load_files: Vec<PathBuf>,
    pub weather_files: Vec<PathBuf>,
    pub observed_files: Vec<PathBuf>,
    pub residential_file: Option<PathBuf>,
    pub income_file: Option<PathBuf>,
    /// Header name of the territory-wide consumption column in the hourly files.
    pub consumption_column: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastConfig {
    pub year: i32,
    /// Assumed average temperature (°F) for each forecast month, January first.
    /// Supplied externally, not derived by the pipeline.
    pub temperatures_f: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub train_ratio: f64,
    pub split_seed: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationConfig {
    /// Number of leading forecast months with ground truth available.
    pub window_months: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("TLF__").split("__"));
        Ok(figment.extract()?)
    }
}
