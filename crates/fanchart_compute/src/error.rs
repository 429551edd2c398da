//! Error types for the compute pipeline.
//!
//! Every failure is fatal and fail-fast; the variants carry the variable
//! name and transform kind so a failed batch can be diagnosed from the
//! message alone. No transform precondition violation is ever downgraded
//! to an identity pass-through.

use fanchart_core::matrix::MatrixError;
use fanchart_data::DataError;
use thiserror::Error;

/// Compute-layer error type.
#[derive(Debug, Error)]
pub enum ComputeError {
    /// Error from the data layer (containers, CSV files, output writes).
    #[error(transparent)]
    Data(#[from] DataError),

    /// File metadata assigned a transform kind this pipeline does not
    /// know. The kind table is closed; a gap is a configuration defect,
    /// surfaced immediately rather than defaulted silently.
    #[error("Unknown transform kind '{kind}' assigned to variable '{variable}'")]
    UnknownTransform {
        /// Variable carrying the assignment.
        variable: String,
        /// Unrecognised kind string.
        kind: String,
    },

    /// A per-capita transform ran without a population series.
    #[error(
        "Transform '{transform}' for variable '{variable}' requires a population \
         growth series, but none is available"
    )]
    MissingPopulation {
        /// Variable being transformed.
        variable: String,
        /// Transform kind requested.
        transform: &'static str,
    },

    /// The aligned population series does not span the date axis.
    #[error(
        "Population growth series has no entry for {date}; a gap would silently \
         corrupt every per-capita variable"
    )]
    PopulationGap {
        /// First uncovered quarter.
        date: String,
    },

    /// A four-quarter per-capita transform lacks the pre-axis population
    /// growth tail.
    #[error(
        "Transform '{transform}' for variable '{variable}' needs {needed} pre-axis \
         population growth rates, found {available}"
    )]
    InsufficientPopulationTail {
        /// Variable being transformed.
        variable: String,
        /// Transform kind requested.
        transform: &'static str,
        /// Tail length required.
        needed: usize,
        /// Tail length available.
        available: usize,
    },

    /// A transform needing historical data ran without any.
    #[error(
        "Transform '{transform}' for variable '{variable}' requires historical \
         data, but none is available"
    )]
    MissingHistory {
        /// Variable being transformed.
        variable: String,
        /// Transform kind requested.
        transform: &'static str,
    },

    /// A transform needing a seed index ran without one.
    #[error(
        "Transform '{transform}' for variable '{variable}' requires a final \
         pre-forecast period index, but the product provides none"
    )]
    MissingSeedIndex {
        /// Variable being transformed.
        variable: String,
        /// Transform kind requested.
        transform: &'static str,
    },

    /// The historical slice is too short to seed the transform.
    #[error(
        "Transform '{transform}' for variable '{variable}' needs {needed} \
         historical periods after the seed index, found {available}"
    )]
    InsufficientHistory {
        /// Variable being transformed.
        variable: String,
        /// Transform kind requested.
        transform: &'static str,
        /// Periods required.
        needed: usize,
        /// Periods available.
        available: usize,
    },

    /// Population series length differs from the series being adjusted.
    #[error(
        "Population growth series has {got} periods, expected {expected} for \
         variable '{variable}'"
    )]
    PopulationLength {
        /// Variable being transformed.
        variable: String,
        /// Periods expected (the series width).
        expected: usize,
        /// Periods supplied.
        got: usize,
    },

    /// A scalar-per-draw product held a series with the wrong shape.
    #[error("Trend series for variable '{variable}' cannot be broadcast: {source}")]
    TrendShape {
        /// Variable whose container is malformed.
        variable: String,
        /// Underlying shape violation.
        #[source]
        source: MatrixError,
    },

    /// A density band level outside the open unit interval reached the
    /// estimator.
    #[error("Invalid density band level {0}: must lie in (0, 1)")]
    InvalidBandLevel(f64),

    /// Population files are configured inconsistently.
    #[error(
        "Population mnemonic '{mnemonic}' is configured but the {which} level \
         file path is missing"
    )]
    MissingPopulationFile {
        /// Configured mnemonic.
        mnemonic: String,
        /// Which of the two files is missing.
        which: &'static str,
    },
}
