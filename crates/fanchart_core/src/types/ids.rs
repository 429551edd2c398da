//! Identity tags: variable class, product, input type, conditioning type.
//!
//! These closed enums select which branch of the summarisation pipeline
//! runs and which metadata tables of a draw container apply. They parse
//! from the lowercase tags used in configuration files and container
//! filenames.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::CoreError;

/// Class of a model variable, selecting the `<prefix>_indices` and
/// `<prefix>_revtransforms` tables of a draw container.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableClass {
    /// Observed data series (`obs`).
    Observable,
    /// Model-implied but unobserved series (`pseudo`).
    PseudoObservable,
    /// Structural shock processes (`shock`).
    Shock,
}

impl VariableClass {
    /// Returns the metadata-table prefix used inside draw containers.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Observable => "obs",
            Self::PseudoObservable => "pseudo",
            Self::Shock => "shock",
        }
    }
}

impl fmt::Display for VariableClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

impl FromStr for VariableClass {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "obs" => Ok(Self::Observable),
            "pseudo" => Ok(Self::PseudoObservable),
            "shock" => Ok(Self::Shock),
            other => Err(CoreError::UnknownClass(other.to_string())),
        }
    }
}

/// Summarisation product, selecting the pipeline branch.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Product {
    /// Historical (smoothed) fit.
    History,
    /// Unconditional forecast.
    Forecast,
    /// Steady-state trend, one value per draw broadcast over the axis.
    Trend,
    /// Deterministic trend path.
    DetTrend,
    /// Forecast aggregated to trailing four-quarter growth.
    Forecast4q,
    /// Forecast bounded by effective-lower-bound enforcement.
    BddForecast,
    /// Bounded forecast, four-quarter aggregated.
    BddForecast4q,
    /// Shock decomposition (variable × shock sub-series).
    ShockDec,
    /// Impulse response; no calendar date axis.
    Irf,
}

impl Product {
    /// Canonical lowercase tag used in filenames and configuration.
    pub fn name(&self) -> &'static str {
        match self {
            Self::History => "hist",
            Self::Forecast => "forecast",
            Self::Trend => "trend",
            Self::DetTrend => "dettrend",
            Self::Forecast4q => "forecast4q",
            Self::BddForecast => "bddforecast",
            Self::BddForecast4q => "bddforecast4q",
            Self::ShockDec => "shockdec",
            Self::Irf => "irf",
        }
    }

    /// Whether the four-quarter transform branch applies.
    #[inline]
    pub fn is_four_quarter(&self) -> bool {
        matches!(self, Self::Forecast4q | Self::BddForecast4q)
    }

    /// Whether the product carries a calendar date axis.
    ///
    /// Impulse responses are indexed by horizon, not by date.
    #[inline]
    pub fn has_date_axis(&self) -> bool {
        !matches!(self, Self::Irf)
    }

    /// Whether sub-series fan out over shocks as well as variables.
    #[inline]
    pub fn is_decomposition(&self) -> bool {
        matches!(self, Self::ShockDec | Self::Irf)
    }

    /// Whether the raw series holds one value per draw to be broadcast
    /// across the date axis.
    #[inline]
    pub fn is_scalar_per_draw(&self) -> bool {
        matches!(self, Self::Trend)
    }

    /// Whether banding may be skipped when `compute_shockdec_bands` is
    /// disabled. Banding every shock sub-series is expensive and often
    /// unneeded.
    #[inline]
    pub fn bands_optional(&self) -> bool {
        matches!(self, Self::ShockDec | Self::DetTrend | Self::Trend)
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Product {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hist" => Ok(Self::History),
            "forecast" => Ok(Self::Forecast),
            "trend" => Ok(Self::Trend),
            "dettrend" => Ok(Self::DetTrend),
            "forecast4q" => Ok(Self::Forecast4q),
            "bddforecast" => Ok(Self::BddForecast),
            "bddforecast4q" => Ok(Self::BddForecast4q),
            "shockdec" => Ok(Self::ShockDec),
            "irf" => Ok(Self::Irf),
            other => Err(CoreError::UnknownProduct(other.to_string())),
        }
    }
}

/// Kind of estimation output the draws were produced from.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    /// Posterior mode: a single draw.
    Mode,
    /// Posterior mean: a single draw.
    Mean,
    /// The full ensemble of draws.
    #[default]
    Full,
    /// A named subset of the ensemble; requires a forecast string.
    Subset,
}

impl InputType {
    /// Canonical lowercase tag.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mode => "mode",
            Self::Mean => "mean",
            Self::Full => "full",
            Self::Subset => "subset",
        }
    }

    /// Point estimates carry a single draw, so density bands degenerate
    /// and the effective levels collapse to `[0.5]`.
    #[inline]
    pub fn is_point_estimate(&self) -> bool {
        matches!(self, Self::Mode | Self::Mean)
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InputType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mode" => Ok(Self::Mode),
            "mean" => Ok(Self::Mean),
            "full" => Ok(Self::Full),
            "subset" => Ok(Self::Subset),
            other => Err(CoreError::UnknownInputType(other.to_string())),
        }
    }
}

/// Conditioning regime the draws were generated under.
///
/// Pure metadata at this layer: it participates in file naming and is
/// recorded in the result artifact.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CondType {
    /// Unconditional.
    #[default]
    None,
    /// Conditional on a subset of current-quarter observables.
    Semi,
    /// Conditional on all current-quarter observables.
    Full,
}

impl CondType {
    /// Canonical lowercase tag.
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Semi => "semi",
            Self::Full => "full",
        }
    }
}

impl fmt::Display for CondType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CondType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "semi" => Ok(Self::Semi),
            "full" => Ok(Self::Full),
            other => Err(CoreError::UnknownCondType(other.to_string())),
        }
    }
}

/// A requested output variable: one (class, product) pair, written
/// `class.product` in configuration, e.g. `obs.forecast4q`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutputVar {
    /// Variable class the summary covers.
    pub class: VariableClass,
    /// Product branch to run.
    pub product: Product,
}

impl OutputVar {
    /// Creates an output variable identifier.
    pub fn new(class: VariableClass, product: Product) -> Self {
        Self { class, product }
    }
}

impl fmt::Display for OutputVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.class, self.product)
    }
}

impl FromStr for OutputVar {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (class_part, product_part) = s
            .split_once('.')
            .ok_or_else(|| CoreError::InvalidOutputVar(s.to_string()))?;
        Ok(Self {
            class: class_part.parse()?,
            product: product_part.parse()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_prefix_roundtrip() {
        for class in [
            VariableClass::Observable,
            VariableClass::PseudoObservable,
            VariableClass::Shock,
        ] {
            let back: VariableClass = class.prefix().parse().unwrap();
            assert_eq!(back, class);
        }
        assert!("observable".parse::<VariableClass>().is_err());
    }

    #[test]
    fn test_product_name_roundtrip() {
        for product in [
            Product::History,
            Product::Forecast,
            Product::Trend,
            Product::DetTrend,
            Product::Forecast4q,
            Product::BddForecast,
            Product::BddForecast4q,
            Product::ShockDec,
            Product::Irf,
        ] {
            let back: Product = product.name().parse().unwrap();
            assert_eq!(back, product);
        }
        assert!("history".parse::<Product>().is_err());
    }

    #[test]
    fn test_product_predicates() {
        assert!(Product::Forecast4q.is_four_quarter());
        assert!(Product::BddForecast4q.is_four_quarter());
        assert!(!Product::Forecast.is_four_quarter());

        assert!(!Product::Irf.has_date_axis());
        assert!(Product::ShockDec.has_date_axis());

        assert!(Product::ShockDec.is_decomposition());
        assert!(Product::Irf.is_decomposition());
        assert!(!Product::Trend.is_decomposition());

        assert!(Product::Trend.is_scalar_per_draw());

        assert!(Product::ShockDec.bands_optional());
        assert!(Product::Trend.bands_optional());
        assert!(Product::DetTrend.bands_optional());
        assert!(!Product::Forecast.bands_optional());
    }

    #[test]
    fn test_input_type_point_estimate() {
        assert!(InputType::Mode.is_point_estimate());
        assert!(InputType::Mean.is_point_estimate());
        assert!(!InputType::Full.is_point_estimate());
        assert!(!InputType::Subset.is_point_estimate());
    }

    #[test]
    fn test_output_var_parse() {
        let v: OutputVar = "obs.forecast4q".parse().unwrap();
        assert_eq!(v.class, VariableClass::Observable);
        assert_eq!(v.product, Product::Forecast4q);
        assert_eq!(v.to_string(), "obs.forecast4q");

        assert!("obsforecast".parse::<OutputVar>().is_err());
        assert!("obs.fourcast".parse::<OutputVar>().is_err());
        assert!("obz.forecast".parse::<OutputVar>().is_err());
    }
}
