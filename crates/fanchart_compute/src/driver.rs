//! The batch driver.
//!
//! Loads run-wide inputs (population growth, historical data) once, then
//! summarises each requested output variable sequentially: derive the
//! seed index for the product, open its draw container, run the
//! aggregator, persist the artifact. Fail-fast: a failure aborts the
//! remaining output variables but never rolls back summaries already
//! written.

use std::path::{Path, PathBuf};

use tracing::info;

use fanchart_core::config::MeansBandsConfig;
use fanchart_core::types::{OutputVar, Product};
use fanchart_data::{
    load_population_growth, store, DrawFile, HistoricalData, PopulationGrowth,
};

use crate::aggregate::{means_bands, AggregateContext};
use crate::error::ComputeError;

/// Filesystem layout for one run.
#[derive(Clone, Debug)]
pub struct RunPaths {
    /// Directory holding the draw containers.
    pub input_dir: PathBuf,
    /// Directory the summaries are written into (created if absent).
    pub output_dir: PathBuf,
    /// Historical data matrix (CSV), when the run supplies one.
    pub history: Option<PathBuf>,
    /// Realised population levels (CSV).
    pub population_history: Option<PathBuf>,
    /// Forecast population levels (CSV).
    pub population_forecast: Option<PathBuf>,
}

impl RunPaths {
    /// Creates a layout with just the draw and summary directories.
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            history: None,
            population_history: None,
            population_forecast: None,
        }
    }

    /// Sets the historical data path.
    pub fn with_history(mut self, path: impl Into<PathBuf>) -> Self {
        self.history = Some(path.into());
        self
    }

    /// Sets the population level file paths.
    pub fn with_population(
        mut self,
        history: impl Into<PathBuf>,
        forecast: impl Into<PathBuf>,
    ) -> Self {
        self.population_history = Some(history.into());
        self.population_forecast = Some(forecast.into());
        self
    }
}

/// Derives the draw container filename for one output variable:
/// `<product>_<class>_<input_type>_<cond>[_<forecast_string>].json`.
pub fn input_filename(config: &MeansBandsConfig, output_var: OutputVar) -> String {
    let mut stem = format!(
        "{}_{}_{}_{}",
        output_var.product.name(),
        output_var.class.prefix(),
        config.input_type.name(),
        config.cond_type.name(),
    );
    if let Some(forecast_string) = &config.forecast_string {
        stem.push('_');
        stem.push_str(forecast_string);
    }
    stem.push_str(".json");
    stem
}

/// The seed index into the historical matrix for a product.
///
/// History and impulse responses have no forecast origin. Four-quarter
/// products anchor a year back, so the seed slices starting at
/// `y0_index + 1` (growth) and `y0_index` (levels) cover the last three
/// and four historical periods respectively; everything else seeds from
/// the final historical period.
pub fn derive_y0_index(product: Product, history: Option<&HistoricalData>) -> Option<usize> {
    let back = match product {
        Product::History | Product::Irf => return None,
        p if p.is_four_quarter() => 4,
        _ => 1,
    };
    history.and_then(|h| h.n_periods().checked_sub(back))
}

fn load_population(
    config: &MeansBandsConfig,
    paths: &RunPaths,
) -> Result<PopulationGrowth, ComputeError> {
    let Some(mnemonic) = config.population_mnemonic.as_deref() else {
        return Ok(PopulationGrowth::empty());
    };
    let history = paths.population_history.as_deref().ok_or_else(|| {
        ComputeError::MissingPopulationFile {
            mnemonic: mnemonic.to_string(),
            which: "history",
        }
    })?;
    let forecast = paths.population_forecast.as_deref().ok_or_else(|| {
        ComputeError::MissingPopulationFile {
            mnemonic: mnemonic.to_string(),
            which: "forecast",
        }
    })?;
    let pop = load_population_growth(
        history,
        forecast,
        Some(mnemonic),
        config.population_growth,
    )?;
    Ok(pop)
}

fn load_history(paths: &RunPaths) -> Result<Option<HistoricalData>, ComputeError> {
    paths
        .history
        .as_deref()
        .map(HistoricalData::load)
        .transpose()
        .map_err(ComputeError::from)
}

/// Summarises every configured output variable, returning the written
/// summary paths in processing order.
pub fn means_bands_all(
    config: &MeansBandsConfig,
    paths: &RunPaths,
) -> Result<Vec<PathBuf>, ComputeError> {
    let population = load_population(config, paths)?;
    let history = load_history(paths)?;

    let mut written = Vec::with_capacity(config.output_vars.len());
    for &output_var in &config.output_vars {
        let filename = input_filename(config, output_var);
        let path = paths.input_dir.join(&filename);
        info!(output_var = %output_var, input = %path.display(), "Computing means and bands");

        let file = DrawFile::open(&path)?;
        let ctx = AggregateContext {
            config,
            output_var,
            file: &file,
            history: history.as_ref(),
            population: &population,
            y0_index: derive_y0_index(output_var.product, history.as_ref()),
        };
        let mb = means_bands(&ctx)?;
        written.push(store::write_means_bands(
            &paths.output_dir,
            &filename,
            &mb,
        )?);
    }
    Ok(written)
}

/// Confirms the run's inputs exist before any computation starts.
///
/// Checks every derived draw container path plus the configured
/// historical and population files; returns the missing paths.
pub fn missing_inputs(config: &MeansBandsConfig, paths: &RunPaths) -> Vec<PathBuf> {
    let mut missing = Vec::new();
    let mut check = |path: &Path| {
        if !path.is_file() {
            missing.push(path.to_path_buf());
        }
    };
    for &output_var in &config.output_vars {
        check(&paths.input_dir.join(input_filename(config, output_var)));
    }
    for path in [&paths.history, &paths.population_history, &paths.population_forecast]
        .into_iter()
        .flatten()
    {
        check(path);
    }
    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use fanchart_core::types::{CondType, InputType};
    use std::collections::HashMap;

    fn config_with(input_type: InputType, forecast_string: Option<&str>) -> MeansBandsConfig {
        let mut builder = MeansBandsConfig::builder()
            .input_type(input_type)
            .cond_type(CondType::Semi)
            .output_vars(vec!["obs.forecast".parse().unwrap()]);
        if let Some(s) = forecast_string {
            builder = builder.forecast_string(s);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_input_filename_layout() {
        let config = config_with(InputType::Full, None);
        let var: OutputVar = "obs.forecast".parse().unwrap();
        assert_eq!(input_filename(&config, var), "forecast_obs_full_semi.json");

        let var: OutputVar = "pseudo.bddforecast4q".parse().unwrap();
        assert_eq!(
            input_filename(&config, var),
            "bddforecast4q_pseudo_full_semi.json"
        );
    }

    #[test]
    fn test_input_filename_appends_forecast_string() {
        let config = config_with(InputType::Subset, Some("run22"));
        let var: OutputVar = "obs.forecast".parse().unwrap();
        assert_eq!(
            input_filename(&config, var),
            "forecast_obs_subset_semi_run22.json"
        );
    }

    #[test]
    fn test_derive_y0_index_by_product() {
        let dates: Vec<fanchart_core::types::Quarter> = (1..=6)
            .map(|q| format!("202{}-Q{}", 3 + (q - 1) / 4, (q - 1) % 4 + 1).parse().unwrap())
            .collect();
        let mut rows = HashMap::new();
        rows.insert("obs_gdp".to_string(), vec![1.0; 6]);
        let history = HistoricalData::from_rows(dates, rows);

        assert_eq!(derive_y0_index(Product::History, Some(&history)), None);
        assert_eq!(derive_y0_index(Product::Irf, Some(&history)), None);
        assert_eq!(derive_y0_index(Product::Forecast, Some(&history)), Some(5));
        assert_eq!(derive_y0_index(Product::Forecast4q, Some(&history)), Some(2));
        assert_eq!(
            derive_y0_index(Product::BddForecast4q, Some(&history)),
            Some(2)
        );
        assert_eq!(derive_y0_index(Product::Forecast, None), None);
    }

    #[test]
    fn test_missing_inputs_lists_absent_files() {
        let config = config_with(InputType::Full, None);
        let paths = RunPaths::new("/nonexistent/in", "/nonexistent/out")
            .with_history("/nonexistent/history.csv");
        let missing = missing_inputs(&config, &paths);
        assert_eq!(missing.len(), 2);
    }
}
