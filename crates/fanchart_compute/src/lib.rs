//! # Fanchart Compute (Layer 3: The Pipeline)
//!
//! The transformation-and-aggregation pipeline that turns raw ensembles
//! of model-forecast draws into means and density bands:
//!
//! - [`transforms`]: the variable-specific transform engine (growth,
//!   per-capita, four-quarter and annualisation variants)
//! - [`bands`]: the density band estimator (equal-tailed and
//!   minimal-width intervals)
//! - [`pipeline`]: the single-variable pipeline of scoped read, transform
//!   resolution, broadcast, transform, mean, bands
//! - [`aggregate`]: the parallel fan-out across all variables (and
//!   shocks) of one output variable
//! - [`driver`]: the sequential, fail-fast batch driver persisting one
//!   summary per requested output variable
//!
//! # Example
//!
//! ```no_run
//! use fanchart_compute::driver::{means_bands_all, RunPaths};
//! use fanchart_core::config::MeansBandsConfig;
//!
//! let config = MeansBandsConfig::builder()
//!     .output_vars(vec!["obs.forecast".parse().unwrap()])
//!     .build()
//!     .unwrap();
//! let paths = RunPaths::new("raw/", "summaries/");
//! let written = means_bands_all(&config, &paths).unwrap();
//! println!("wrote {} summaries", written.len());
//! ```

pub mod aggregate;
pub mod bands;
pub mod driver;
pub mod error;
pub mod pipeline;
pub mod transforms;

pub use aggregate::means_bands;
pub use bands::density_bands;
pub use driver::{means_bands_all, RunPaths};
pub use error::ComputeError;
pub use pipeline::compute_means_bands;
