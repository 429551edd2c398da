//! Error types for the data layer.

use std::path::PathBuf;

use fanchart_core::matrix::MatrixError;
use fanchart_core::types::{QuarterError, VariableClass};
use thiserror::Error;

/// Data-layer error type.
///
/// Every variant names the offending file, column or variable so that a
/// failed batch can be diagnosed offline from the message alone.
#[derive(Debug, Error)]
pub enum DataError {
    /// IO error, annotated with the path being accessed.
    #[error("IO error for {path}: {source}")]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON container.
    #[error("Malformed container {path}: {source}")]
    Json {
        /// Container path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// Malformed CSV input.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A CSV file lacks a required column.
    #[error("Missing column '{column}' in {path}")]
    MissingColumn {
        /// Column name requested.
        column: String,
        /// File inspected.
        path: PathBuf,
    },

    /// A CSV cell could not be parsed as a number.
    #[error("Invalid numeric value '{value}' in column '{column}' of {path}")]
    InvalidNumber {
        /// Offending cell contents.
        value: String,
        /// Column name.
        column: String,
        /// File inspected.
        path: PathBuf,
    },

    /// A population level was non-positive; log growth is undefined.
    #[error("Non-positive population level {value} at {date} in {path}")]
    NonPositiveLevel {
        /// Offending level.
        value: f64,
        /// Period of the offending level.
        date: String,
        /// File inspected.
        path: PathBuf,
    },

    /// The container holds no raw array under the requested key.
    #[error("Draw container is missing array '{key}'")]
    MissingArray {
        /// Array key requested (variable or variable__shock).
        key: String,
    },

    /// The requested variable is absent from its class index map,
    /// indicating an inconsistent draw container.
    #[error("Variable '{variable}' not found in {class} index map of the draw container")]
    MissingVariable {
        /// Variable requested.
        variable: String,
        /// Class whose index map was consulted.
        class: VariableClass,
    },

    /// A variable in the index map has no transform assignment.
    #[error("Variable '{variable}' has no transform assignment in the {class} table")]
    MissingTransform {
        /// Variable requested.
        variable: String,
        /// Class whose transform table was consulted.
        class: VariableClass,
    },

    /// The container has no date index block but the product needs one.
    #[error("Draw container has no date index block, required for product '{product}'")]
    MissingDates {
        /// Product requested.
        product: String,
    },

    /// The container has no shock index block but the product fans out
    /// over shocks.
    #[error("Draw container has no shock index block, required for product '{product}'")]
    MissingShocks {
        /// Product requested.
        product: String,
    },

    /// A stored raw array failed matrix validation.
    #[error("Invalid raw array '{key}': {source}")]
    InvalidArray {
        /// Array key.
        key: String,
        /// Underlying validation error.
        #[source]
        source: MatrixError,
    },

    /// A date key in the container failed to parse.
    #[error("Invalid date key in container: {0}")]
    Quarter(#[from] QuarterError),

    /// A variable name is listed in the historical data file twice.
    #[error("Duplicate variable '{variable}' in historical data {path}")]
    DuplicateHistoryRow {
        /// Variable listed twice.
        variable: String,
        /// File inspected.
        path: PathBuf,
    },
}

impl DataError {
    /// Annotates an IO error with its path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
