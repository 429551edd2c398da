//! The parallel aggregator.
//!
//! One invocation builds the full [`MeansBands`] artifact for one output
//! variable: metadata resolved once, population aligned to the date axis
//! once, then the single-variable pipeline fanned out with `rayon`
//! across every variable of the class (and every shock, for
//! decomposition products). Workers share the draw container immutably;
//! each takes its own scoped read. Results are collected in submission
//! order and the first failure by that order is returned after all
//! workers have finished; a means-bands computation is all-or-nothing.

use std::collections::{BTreeMap, HashMap};

use rayon::prelude::*;
use tracing::debug;

use fanchart_core::config::MeansBandsConfig;
use fanchart_core::result::{subseries_key, MbMetadata, MeansBands};
use fanchart_core::types::{OutputVar, Quarter};
use fanchart_data::{meta, DrawFile, HistoricalData, PopulationGrowth};

use crate::error::ComputeError;
use crate::pipeline::{compute_means_bands, VariableRequest};
use crate::transforms::{AlignedPopulation, Transform};

/// Shared inputs for one aggregator invocation.
#[derive(Clone, Copy, Debug)]
pub struct AggregateContext<'a> {
    /// Run configuration.
    pub config: &'a MeansBandsConfig,
    /// The class.product being summarised.
    pub output_var: OutputVar,
    /// Shared, read-only draw container.
    pub file: &'a DrawFile,
    /// Historical data matrix, when the run supplies one.
    pub history: Option<&'a HistoricalData>,
    /// Population growth series (possibly empty).
    pub population: &'a PopulationGrowth,
    /// Index of the last pre-forecast historical period.
    pub y0_index: Option<usize>,
}

/// Aligns the population growth series to a product's date axis.
///
/// Returns `None` when no variable of the request needs a population
/// adjustment (or the axis is empty, as for impulse responses). A gap in
/// the configured series over the axis is fatal: silently zero-filling
/// would corrupt every per-capita column.
fn align_population(
    population: &PopulationGrowth,
    dates: &[Quarter],
    transforms: &HashMap<String, String>,
) -> Result<Option<AlignedPopulation>, ComputeError> {
    let needed = transforms
        .values()
        .filter_map(|kind| Transform::from_kind(kind))
        .any(|t| t.needs_population());
    if !needed || dates.is_empty() || population.is_empty() {
        return Ok(None);
    }

    let mut growth = Vec::with_capacity(dates.len());
    for &date in dates {
        let g = population
            .get(date)
            .ok_or_else(|| ComputeError::PopulationGap {
                date: date.to_string(),
            })?;
        growth.push(g);
    }

    // Up to three growths immediately preceding the axis, for the
    // four-quarter window; a short tail is caught at the transform.
    let mut tail = Vec::with_capacity(3);
    for back in (1..=3).rev() {
        if let Some(g) = population.get(dates[0].minus(back)) {
            tail.push(g);
        } else {
            tail.clear();
        }
    }
    Ok(Some(AlignedPopulation { growth, tail }))
}

/// Computes the full means-and-bands artifact for one output variable.
pub fn means_bands(ctx: &AggregateContext<'_>) -> Result<MeansBands, ComputeError> {
    let OutputVar { class, product } = ctx.output_var;
    let levels = ctx.config.effective_bands();

    let resolved = meta::resolve(class, product, ctx.file)?;
    let aligned = align_population(ctx.population, &resolved.dates, &resolved.transforms)?;
    let n_periods = resolved.dates.len();

    // One work item per sub-series, in deterministic output order:
    // shock-major for decomposition products, plain variable order
    // otherwise.
    let items: Vec<(String, &str, Option<&str>)> = if product.is_decomposition() {
        resolved
            .shocks
            .iter()
            .flat_map(|shock| {
                resolved.variables.iter().map(move |var| {
                    (subseries_key(var, shock), var.as_str(), Some(shock.as_str()))
                })
            })
            .collect()
    } else {
        resolved
            .variables
            .iter()
            .map(|var| (var.clone(), var.as_str(), None))
            .collect()
    };
    debug!(
        class = %class,
        product = %product,
        subseries = items.len(),
        "fanning out means-bands workers"
    );

    let results: Vec<Result<_, ComputeError>> = items
        .par_iter()
        .map(|(_, variable, shock)| {
            let request = VariableRequest {
                class,
                product,
                variable,
                shock: *shock,
                file: ctx.file,
                hist: ctx.history.and_then(|h| h.row(variable)),
                y0_index: ctx.y0_index,
                population: aligned.as_ref(),
                n_periods,
                levels,
                minimize: ctx.config.minimize,
                compute_shockdec_bands: ctx.config.compute_shockdec_bands,
            };
            compute_means_bands(&request)
        })
        .collect();

    // First failure by submission order, after every worker has run.
    let mut means = BTreeMap::new();
    let mut bands = BTreeMap::new();
    for ((key, _, _), result) in items.iter().zip(results) {
        let (sub_means, sub_bands) = result?;
        means.insert(key.clone(), sub_means);
        bands.insert(key.clone(), sub_bands);
    }

    let metadata = MbMetadata {
        input_type: ctx.config.input_type,
        cond_type: ctx.config.cond_type,
        product,
        class,
        dates: resolved.dates,
        subseries_order: items.into_iter().map(|(key, _, _)| key).collect(),
        shocks: resolved.shocks,
        forecast_string: ctx.config.forecast_string.clone(),
    };
    Ok(MeansBands {
        metadata,
        means,
        bands,
    })
}
