//! # Fanchart Core (Layer 1: Shared Types)
//!
//! Foundation types for the fanchart workspace: the quarterly date axis,
//! variable/product identity enums, the draws×periods matrix, the run
//! configuration surface, and the means-and-bands result artifacts.
//!
//! This crate performs no I/O. Everything here is consumed by
//! `fanchart_data` (external interfaces) and `fanchart_compute` (the
//! transformation-and-aggregation pipeline).
//!
//! # Examples
//!
//! ```
//! use fanchart_core::types::{Product, Quarter, VariableClass};
//!
//! let q: Quarter = "2020-Q1".parse().unwrap();
//! assert_eq!(q.next().to_string(), "2020-Q2");
//!
//! assert!(Product::Forecast4q.is_four_quarter());
//! assert_eq!(VariableClass::Observable.prefix(), "obs");
//! ```

pub mod config;
pub mod matrix;
pub mod result;
pub mod types;

pub use config::{GrowthHorizon, MeansBandsConfig, MeansBandsConfigBuilder};
pub use matrix::{DrawMatrix, MatrixError};
pub use result::{Band, DensityBands, MbMetadata, MeansBands};
pub use types::{
    CondType, CoreError, InputType, OutputVar, Product, Quarter, QuarterError, VariableClass,
};
