//! # Fanchart Data (Layer 2: External Interfaces)
//!
//! Everything the pipeline reads or writes on disk:
//!
//! - [`store::DrawFile`]: the per-output-variable draw container
//!   (raw draws×periods arrays plus the metadata block)
//! - [`population`]: population level files and the growth series built
//!   from them
//! - [`history`]: the externally supplied historical data matrix
//! - [`meta`]: the metadata resolver mapping a (class, product) request
//!   onto a container's stored indices
//! - [`store::output`]: the summary-object writer
//!
//! All failure here is fail-fast: a missing file, column or variable is a
//! fatal, context-rich error, never a partial-data fallback.

pub mod error;
pub mod history;
pub mod meta;
pub mod population;
pub mod store;

pub use error::DataError;
pub use history::HistoricalData;
pub use meta::{require_variable, resolve, ResolvedMeta};
pub use population::{load_population_growth, PopulationGrowth};
pub use store::{DrawFile, FileMetadata};
