//! Means-and-bands result artifacts.
//!
//! One [`MeansBands`] is produced per requested output variable: a mean
//! trajectory per sub-series (variable, or variable×shock) and a set of
//! density bands at the configured coverage levels, plus the metadata
//! needed to label and align the columns. Created once by the aggregator
//! and never mutated afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{CondType, InputType, Product, Quarter, VariableClass};

/// Formats a coverage level as the band key used in result containers,
/// e.g. `0.68` → `"68.0%"`.
pub fn band_key(level: f64) -> String {
    format!("{:.1}%", level * 100.0)
}

/// Composite sub-series key for decomposition products.
pub fn subseries_key(variable: &str, shock: &str) -> String {
    format!("{variable}__{shock}")
}

/// One coverage band: per-period lower and upper bounds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Band {
    /// Per-period lower bound.
    pub lower: Vec<f64>,
    /// Per-period upper bound.
    pub upper: Vec<f64>,
}

impl Band {
    /// Number of periods covered.
    pub fn len(&self) -> usize {
        self.lower.len()
    }

    /// Whether the band covers no periods.
    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }
}

/// Density bands for one sub-series: coverage level key → band.
///
/// Keys are formatted with [`band_key`] so that the set is ordered and
/// readable in serialised containers. Bands are recomputed independently
/// per period; there is no inter-period state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DensityBands {
    /// Bands keyed by formatted coverage level.
    pub bands: BTreeMap<String, Band>,
}

impl DensityBands {
    /// An empty band set (used when banding is disabled for a product).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Inserts a band for a coverage level.
    pub fn insert(&mut self, level: f64, band: Band) {
        self.bands.insert(band_key(level), band);
    }

    /// Looks up the band for a coverage level.
    pub fn get(&self, level: f64) -> Option<&Band> {
        self.bands.get(&band_key(level))
    }

    /// Number of coverage levels present.
    pub fn len(&self) -> usize {
        self.bands.len()
    }

    /// Whether any bands are present.
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }
}

/// Reporting-oriented metadata recorded alongside the summary columns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MbMetadata {
    /// Kind of estimation output the draws came from.
    pub input_type: InputType,
    /// Conditioning regime tag.
    pub cond_type: CondType,
    /// Product branch that produced the summary.
    pub product: Product,
    /// Variable class the summary covers.
    pub class: VariableClass,
    /// Date axis; empty for impulse responses.
    pub dates: Vec<Quarter>,
    /// Sub-series keys in deterministic output order.
    pub subseries_order: Vec<String>,
    /// Shock names in resolved order; empty unless a decomposition product.
    pub shocks: Vec<String>,
    /// Run identifier for draw subsets.
    pub forecast_string: Option<String>,
}

/// The aggregate summary artifact for one output variable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeansBands {
    /// Labelling and alignment metadata.
    pub metadata: MbMetadata,
    /// Mean trajectory per sub-series key.
    pub means: BTreeMap<String, Vec<f64>>,
    /// Density bands per sub-series key.
    pub bands: BTreeMap<String, DensityBands>,
}

impl MeansBands {
    /// Number of periods in each column.
    pub fn n_periods(&self) -> usize {
        self.means.values().next().map_or(0, Vec::len)
    }

    /// Number of sub-series columns.
    pub fn n_subseries(&self) -> usize {
        self.metadata.subseries_order.len()
    }
}
