//! The transform engine.
//!
//! Raw draws arrive in model units: growth-kind series as 100×quarterly
//! log growth, level-kind series as 100×log level. A per-variable
//! transform assignment, stored in the draw container's metadata, maps
//! them into reporting units (annualised percent changes, optionally
//! per-capita and optionally aggregated to trailing four-quarter growth).
//!
//! The kind table is a closed enum with one exhaustive dispatch function;
//! adding a kind is a compile-time-checked addition here, never a
//! stringly matched branch elsewhere.

mod apply;

pub use apply::{apply, apply_four_quarter, seed_slice, AlignedPopulation, TransformInputs};

use crate::error::ComputeError;

/// Per-variable transform assignment, as stored in container metadata.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Transform {
    /// Pass-through.
    Identity,
    /// Quarterly log growth → annualised percent change.
    PctAnnualized,
    /// Quarterly log growth → annualised percent change, adjusted for
    /// population growth.
    PctAnnualizedPerCapita,
    /// Log level → annualised percent change, adjusted for population
    /// growth; first-differences against the final historical level.
    LevelPctAnnualizedPerCapita,
    /// Quarterly rate → annual rate (×4).
    QuarterToAnnual,
}

impl Transform {
    /// Parses a kind string from container metadata.
    ///
    /// The mapping is exhaustive over known kinds; anything else is a
    /// configuration error naming the variable, surfaced by the caller.
    pub fn from_kind(kind: &str) -> Option<Self> {
        match kind {
            "identity" => Some(Self::Identity),
            "pct_annualized" => Some(Self::PctAnnualized),
            "pct_annualized_percapita" => Some(Self::PctAnnualizedPerCapita),
            "level_pct_annualized_percapita" => Some(Self::LevelPctAnnualizedPerCapita),
            "quarter_to_annual" => Some(Self::QuarterToAnnual),
            _ => None,
        }
    }

    /// Canonical kind string.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::PctAnnualized => "pct_annualized",
            Self::PctAnnualizedPerCapita => "pct_annualized_percapita",
            Self::LevelPctAnnualizedPerCapita => "level_pct_annualized_percapita",
            Self::QuarterToAnnual => "quarter_to_annual",
        }
    }

    /// The four-quarter counterpart applied when the product is a
    /// four-quarter variant.
    pub fn four_quarter(&self) -> FourQuarterTransform {
        match self {
            Self::Identity => FourQuarterTransform::Identity,
            Self::PctAnnualized => FourQuarterTransform::Pct,
            Self::PctAnnualizedPerCapita => FourQuarterTransform::PctPerCapita,
            Self::LevelPctAnnualizedPerCapita => FourQuarterTransform::LevelPctPerCapita,
            Self::QuarterToAnnual => FourQuarterTransform::QuarterToAnnual,
        }
    }

    /// Whether the transform adjusts for population growth.
    pub fn needs_population(&self) -> bool {
        matches!(
            self,
            Self::PctAnnualizedPerCapita | Self::LevelPctAnnualizedPerCapita
        )
    }
}

/// Four-quarter transform variants.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FourQuarterTransform {
    /// Pass-through.
    Identity,
    /// Trailing four-quarter cumulative percent change.
    Pct,
    /// Trailing four-quarter cumulative percent change, per-capita.
    PctPerCapita,
    /// Four-quarter log-level growth, per-capita.
    LevelPctPerCapita,
    /// Quarterly rate → annual rate (×4); deterministic scaling only.
    QuarterToAnnual,
}

impl FourQuarterTransform {
    /// Canonical kind string (for error messages).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Identity => "4q_identity",
            Self::Pct => "4q_pct",
            Self::PctPerCapita => "4q_pct_percapita",
            Self::LevelPctPerCapita => "4q_level_pct_percapita",
            Self::QuarterToAnnual => "4q_quarter_to_annual",
        }
    }

    /// Whether the transform adjusts for population growth.
    pub fn needs_population(&self) -> bool {
        matches!(self, Self::PctPerCapita | Self::LevelPctPerCapita)
    }

    /// Historical seed periods required ahead of the draw series.
    pub fn seed_len(&self) -> usize {
        match self {
            Self::Identity | Self::QuarterToAnnual => 0,
            // Cumulating growth borrows the last three historical growths.
            Self::Pct | Self::PctPerCapita => 3,
            // Differencing levels borrows the last four historical levels.
            Self::LevelPctPerCapita => 4,
        }
    }
}

/// Resolves a kind string for a variable, or fails as a configuration
/// error.
pub fn resolve_transform(variable: &str, kind: &str) -> Result<Transform, ComputeError> {
    Transform::from_kind(kind).ok_or_else(|| ComputeError::UnknownTransform {
        variable: variable.to_string(),
        kind: kind.to_string(),
    })
}
