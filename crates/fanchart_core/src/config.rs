//! Run configuration for means-and-bands summarisation.
//!
//! Immutable configuration of one summarisation run. Use
//! [`MeansBandsConfigBuilder`] to construct instances; `build()` validates
//! band levels and the subset/forecast-string pairing.

use serde::{Deserialize, Serialize};

use crate::types::{CondType, CoreError, InputType, OutputVar};

/// Default density band coverage levels.
pub const DEFAULT_BANDS: [f64; 5] = [0.5, 0.6, 0.7, 0.8, 0.9];

/// How population growth is measured from level files.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthHorizon {
    /// Quarter-over-quarter log growth.
    #[default]
    OneQuarter,
    /// Year-over-year log growth.
    FourQuarter,
}

impl GrowthHorizon {
    /// Lag, in quarters, between the two levels forming one growth rate.
    #[inline]
    pub fn lag(&self) -> usize {
        match self {
            Self::OneQuarter => 1,
            Self::FourQuarter => 4,
        }
    }
}

/// Configuration of one means-and-bands run.
///
/// # Examples
///
/// ```
/// use fanchart_core::config::MeansBandsConfig;
/// use fanchart_core::types::{InputType, CondType};
///
/// let config = MeansBandsConfig::builder()
///     .input_type(InputType::Full)
///     .cond_type(CondType::None)
///     .output_vars(vec!["obs.forecast".parse().unwrap()])
///     .density_bands(vec![0.5, 0.9])
///     .build()
///     .unwrap();
///
/// assert_eq!(config.effective_bands(), &[0.5, 0.9]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MeansBandsConfig {
    /// Kind of estimation output the draws came from.
    pub input_type: InputType,
    /// Conditioning regime tag.
    pub cond_type: CondType,
    /// Requested output variables, processed in order.
    pub output_vars: Vec<OutputVar>,
    /// Run identifier; required when `input_type` is a draw subset.
    pub forecast_string: Option<String>,
    /// Density band coverage levels, each in (0, 1).
    pub density_bands: Vec<f64>,
    /// Interval construction policy: minimal-width when true, otherwise
    /// equal-tailed.
    pub minimize: bool,
    /// Whether to band shock-decomposition, trend and deterministic-trend
    /// sub-series.
    pub compute_shockdec_bands: bool,
    /// Population mnemonic (level-file column); per-capita transforms are
    /// unreachable when absent.
    pub population_mnemonic: Option<String>,
    /// Growth measurement for population levels.
    pub population_growth: GrowthHorizon,
}

impl MeansBandsConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> MeansBandsConfigBuilder {
        MeansBandsConfigBuilder::default()
    }

    /// The band levels actually used in this run.
    ///
    /// Point-estimate input types carry a single draw, so the requested
    /// levels collapse to the trivial `[0.5]`.
    pub fn effective_bands(&self) -> &[f64] {
        if self.input_type.is_point_estimate() {
            &[0.5]
        } else {
            &self.density_bands
        }
    }
}

/// Builder for [`MeansBandsConfig`].
#[derive(Clone, Debug)]
pub struct MeansBandsConfigBuilder {
    input_type: InputType,
    cond_type: CondType,
    output_vars: Vec<OutputVar>,
    forecast_string: Option<String>,
    density_bands: Vec<f64>,
    minimize: bool,
    compute_shockdec_bands: bool,
    population_mnemonic: Option<String>,
    population_growth: GrowthHorizon,
}

impl Default for MeansBandsConfigBuilder {
    fn default() -> Self {
        Self {
            input_type: InputType::Full,
            cond_type: CondType::None,
            output_vars: Vec::new(),
            forecast_string: None,
            density_bands: DEFAULT_BANDS.to_vec(),
            minimize: false,
            compute_shockdec_bands: false,
            population_mnemonic: None,
            population_growth: GrowthHorizon::default(),
        }
    }
}

impl MeansBandsConfigBuilder {
    /// Sets the input type.
    pub fn input_type(mut self, input_type: InputType) -> Self {
        self.input_type = input_type;
        self
    }

    /// Sets the conditioning type.
    pub fn cond_type(mut self, cond_type: CondType) -> Self {
        self.cond_type = cond_type;
        self
    }

    /// Sets the requested output variables.
    pub fn output_vars(mut self, output_vars: Vec<OutputVar>) -> Self {
        self.output_vars = output_vars;
        self
    }

    /// Sets the forecast string identifying a draw subset.
    pub fn forecast_string(mut self, forecast_string: impl Into<String>) -> Self {
        self.forecast_string = Some(forecast_string.into());
        self
    }

    /// Sets the density band coverage levels.
    pub fn density_bands(mut self, density_bands: Vec<f64>) -> Self {
        self.density_bands = density_bands;
        self
    }

    /// Sets the interval construction policy.
    pub fn minimize(mut self, minimize: bool) -> Self {
        self.minimize = minimize;
        self
    }

    /// Enables or disables banding of decomposition/trend sub-series.
    pub fn compute_shockdec_bands(mut self, compute: bool) -> Self {
        self.compute_shockdec_bands = compute;
        self
    }

    /// Sets the population mnemonic.
    pub fn population_mnemonic(mut self, mnemonic: impl Into<String>) -> Self {
        self.population_mnemonic = Some(mnemonic.into());
        self
    }

    /// Sets the population growth measurement horizon.
    pub fn population_growth(mut self, horizon: GrowthHorizon) -> Self {
        self.population_growth = horizon;
        self
    }

    /// Validates and builds the configuration.
    ///
    /// # Errors
    ///
    /// - a band level outside (0, 1)
    /// - `InputType::Subset` without a non-empty forecast string
    pub fn build(self) -> Result<MeansBandsConfig, CoreError> {
        for &level in &self.density_bands {
            if !(level > 0.0 && level < 1.0) {
                return Err(CoreError::InvalidBandLevel(level));
            }
        }
        if self.input_type == InputType::Subset
            && self.forecast_string.as_deref().map_or(true, str::is_empty)
        {
            return Err(CoreError::MissingForecastString);
        }
        Ok(MeansBandsConfig {
            input_type: self.input_type,
            cond_type: self.cond_type,
            output_vars: self.output_vars,
            forecast_string: self.forecast_string,
            density_bands: self.density_bands,
            minimize: self.minimize,
            compute_shockdec_bands: self.compute_shockdec_bands,
            population_mnemonic: self.population_mnemonic,
            population_growth: self.population_growth,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = MeansBandsConfig::builder().build().unwrap();
        assert_eq!(config.input_type, InputType::Full);
        assert_eq!(config.cond_type, CondType::None);
        assert_eq!(config.density_bands, DEFAULT_BANDS.to_vec());
        assert!(!config.minimize);
        assert!(!config.compute_shockdec_bands);
        assert!(config.population_mnemonic.is_none());
        assert_eq!(config.population_growth, GrowthHorizon::OneQuarter);
    }

    #[test]
    fn test_invalid_band_level_rejected() {
        for bad in [0.0, 1.0, -0.1, 1.5] {
            let result = MeansBandsConfig::builder()
                .density_bands(vec![0.5, bad])
                .build();
            assert_eq!(result.unwrap_err(), CoreError::InvalidBandLevel(bad));
        }
    }

    #[test]
    fn test_subset_requires_forecast_string() {
        let result = MeansBandsConfig::builder()
            .input_type(InputType::Subset)
            .build();
        assert_eq!(result.unwrap_err(), CoreError::MissingForecastString);

        let result = MeansBandsConfig::builder()
            .input_type(InputType::Subset)
            .forecast_string("")
            .build();
        assert_eq!(result.unwrap_err(), CoreError::MissingForecastString);

        assert!(MeansBandsConfig::builder()
            .input_type(InputType::Subset)
            .forecast_string("run1")
            .build()
            .is_ok());
    }

    #[test]
    fn test_point_estimate_collapses_bands() {
        let config = MeansBandsConfig::builder()
            .input_type(InputType::Mode)
            .density_bands(vec![0.5, 0.6, 0.7])
            .build()
            .unwrap();
        assert_eq!(config.effective_bands(), &[0.5]);

        let config = MeansBandsConfig::builder()
            .input_type(InputType::Full)
            .density_bands(vec![0.5, 0.6, 0.7])
            .build()
            .unwrap();
        assert_eq!(config.effective_bands(), &[0.5, 0.6, 0.7]);
    }

    #[test]
    fn test_growth_horizon_lag() {
        assert_eq!(GrowthHorizon::OneQuarter.lag(), 1);
        assert_eq!(GrowthHorizon::FourQuarter.lag(), 4);
    }
}
