//! Error types for core identity and calendar parsing.

use thiserror::Error;

/// Error raised when parsing or constructing a [`crate::types::Quarter`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuarterError {
    /// String did not match the `YYYY-Qn` form.
    #[error("Invalid quarter string '{0}': expected form YYYY-Qn")]
    InvalidFormat(String),

    /// Quarter number outside 1..=4.
    #[error("Invalid quarter number {0}: must be in 1..=4")]
    InvalidQuarter(u32),
}

/// Error raised when parsing identity tags from configuration or file
/// metadata.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Unrecognised variable class tag.
    #[error("Unknown variable class '{0}': expected obs, pseudo or shock")]
    UnknownClass(String),

    /// Unrecognised product tag.
    #[error("Unknown product '{0}'")]
    UnknownProduct(String),

    /// Unrecognised input type tag.
    #[error("Unknown input type '{0}': expected mode, mean, full or subset")]
    UnknownInputType(String),

    /// Unrecognised conditioning type tag.
    #[error("Unknown conditional type '{0}': expected none, semi or full")]
    UnknownCondType(String),

    /// Output variable identifier not of the `class.product` form.
    #[error("Invalid output variable '{0}': expected form class.product")]
    InvalidOutputVar(String),

    /// Density band level outside the open unit interval.
    #[error("Invalid density band level {0}: must lie in (0, 1)")]
    InvalidBandLevel(f64),

    /// Subset runs must carry a forecast string to identify the draw block.
    #[error("Input type 'subset' requires a non-empty forecast string")]
    MissingForecastString,
}
