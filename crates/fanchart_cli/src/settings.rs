//! Run settings file.
//!
//! One TOML file describes a whole summarisation run: the filesystem
//! layout plus the configuration surface of the pipeline. Example:
//!
//! ```toml
//! input_dir = "raw"
//! output_dir = "summaries"
//! history = "history.csv"
//! population_history = "population_history.csv"
//! population_forecast = "population_forecast.csv"
//! population_mnemonic = "CNP16OV"
//! population_growth = "one_quarter"
//!
//! input_type = "full"
//! cond_type = "none"
//! output_vars = ["obs.forecast", "obs.forecast4q", "pseudo.hist"]
//! density_bands = [0.5, 0.6, 0.7, 0.8, 0.9]
//! minimize = false
//! compute_shockdec_bands = false
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use fanchart_compute::driver::RunPaths;
use fanchart_core::config::{GrowthHorizon, MeansBandsConfig, DEFAULT_BANDS};
use fanchart_core::types::{CondType, InputType, OutputVar};

use crate::error::{CliError, Result};

fn default_bands() -> Vec<f64> {
    DEFAULT_BANDS.to_vec()
}

/// Deserialised settings file.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Directory holding the draw containers.
    pub input_dir: PathBuf,
    /// Directory the summaries are written into.
    pub output_dir: PathBuf,
    /// Historical data matrix (CSV).
    pub history: Option<PathBuf>,
    /// Realised population levels (CSV).
    pub population_history: Option<PathBuf>,
    /// Forecast population levels (CSV).
    pub population_forecast: Option<PathBuf>,
    /// Column name of the population series.
    pub population_mnemonic: Option<String>,
    /// How population growth is measured.
    #[serde(default)]
    pub population_growth: GrowthHorizon,

    /// Kind of estimation output the draws came from.
    #[serde(default)]
    pub input_type: InputType,
    /// Conditioning regime tag.
    #[serde(default)]
    pub cond_type: CondType,
    /// Requested `class.product` identifiers.
    pub output_vars: Vec<String>,
    /// Run identifier, required for draw subsets.
    pub forecast_string: Option<String>,
    /// Coverage levels.
    #[serde(default = "default_bands")]
    pub density_bands: Vec<f64>,
    /// Minimal-width intervals instead of equal-tailed.
    #[serde(default)]
    pub minimize: bool,
    /// Band decomposition/trend products too.
    #[serde(default)]
    pub compute_shockdec_bands: bool,
}

impl Settings {
    /// Loads and parses a settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| CliError::SettingsRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| CliError::SettingsParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Builds the validated pipeline configuration.
    pub fn config(&self) -> Result<MeansBandsConfig> {
        let output_vars = self
            .output_vars
            .iter()
            .map(|s| {
                s.parse::<OutputVar>()
                    .map_err(|e| CliError::InvalidSetting(format!("output_vars: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut builder = MeansBandsConfig::builder()
            .input_type(self.input_type)
            .cond_type(self.cond_type)
            .output_vars(output_vars)
            .density_bands(self.density_bands.clone())
            .minimize(self.minimize)
            .compute_shockdec_bands(self.compute_shockdec_bands)
            .population_growth(self.population_growth);
        if let Some(s) = &self.forecast_string {
            builder = builder.forecast_string(s);
        }
        if let Some(m) = &self.population_mnemonic {
            builder = builder.population_mnemonic(m);
        }
        Ok(builder.build()?)
    }

    /// Builds the run's filesystem layout.
    pub fn run_paths(&self) -> RunPaths {
        let mut paths = RunPaths::new(&self.input_dir, &self.output_dir);
        if let Some(history) = &self.history {
            paths = paths.with_history(history);
        }
        if let (Some(hist), Some(fcast)) = (&self.population_history, &self.population_forecast)
        {
            paths = paths.with_population(hist, fcast);
        }
        paths
    }
}
