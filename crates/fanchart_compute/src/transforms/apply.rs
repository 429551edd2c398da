//! Transform application.
//!
//! Pure functions mapping a raw draws×periods series (plus optional
//! historical and population context) into reporting units. Preconditions
//! are enforced here: a per-capita transform without a population series,
//! or a seeded transform without its historical slice, fails with the
//! variable name and transform kind attached.

use fanchart_core::matrix::DrawMatrix;

use super::{FourQuarterTransform, Transform};
use crate::error::ComputeError;

/// Population growth aligned to one product's date axis.
#[derive(Clone, Debug, Default)]
pub struct AlignedPopulation {
    /// Log growth per axis period, same length as the date axis.
    pub growth: Vec<f64>,
    /// Log growth for the periods immediately preceding the axis, in
    /// chronological order; four-quarter per-capita transforms need the
    /// last three.
    pub tail: Vec<f64>,
}

/// Context supplied to a transform for one variable.
#[derive(Clone, Copy, Debug)]
pub struct TransformInputs<'a> {
    /// Variable being transformed (for error context).
    pub variable: &'a str,
    /// The variable's full historical series, oldest first.
    pub hist: Option<&'a [f64]>,
    /// Index of the last pre-forecast historical period.
    pub y0_index: Option<usize>,
    /// Population growth aligned to the output date axis.
    pub population: Option<&'a AlignedPopulation>,
}

/// Annualises one quarterly log growth (plus population adjustment) into
/// a percent change: `100·((exp(y/100 + g))⁴ − 1)`.
#[inline]
fn annualize(y: f64, g: f64) -> f64 {
    100.0 * ((y / 100.0 + g).exp().powi(4) - 1.0)
}

/// Cumulates four quarters of log growth (plus population adjustment)
/// into a percent change: `100·(exp(s/100 + g4) − 1)`.
#[inline]
fn cumulate_4q(s: f64, g4: f64) -> f64 {
    100.0 * ((s / 100.0 + g4).exp() - 1.0)
}

fn require_population<'a>(
    inputs: &TransformInputs<'a>,
    transform: &'static str,
    n_periods: usize,
) -> Result<&'a AlignedPopulation, ComputeError> {
    let pop = inputs
        .population
        .filter(|p| !p.growth.is_empty())
        .ok_or_else(|| ComputeError::MissingPopulation {
            variable: inputs.variable.to_string(),
            transform,
        })?;
    if pop.growth.len() != n_periods {
        return Err(ComputeError::PopulationLength {
            variable: inputs.variable.to_string(),
            expected: n_periods,
            got: pop.growth.len(),
        });
    }
    Ok(pop)
}

/// Trailing four-period sums over `[seed(3), row]`, one per row period.
fn four_quarter_sums(seed: &[f64], row: &[f64]) -> Vec<f64> {
    debug_assert_eq!(seed.len(), 3);
    let combined: Vec<f64> = seed.iter().chain(row).copied().collect();
    (0..row.len())
        .map(|t| combined[t..t + 4].iter().sum())
        .collect()
}

/// Four-period level differences over `[seed(4), row]`, one per row
/// period.
fn four_quarter_diffs(seed: &[f64], row: &[f64]) -> Vec<f64> {
    debug_assert_eq!(seed.len(), 4);
    let combined: Vec<f64> = seed.iter().chain(row).copied().collect();
    (0..row.len()).map(|t| combined[t + 4] - combined[t]).collect()
}

/// Four-quarter population growth per axis period, from the 3-growth
/// pre-axis tail and the aligned series.
fn four_quarter_pop_growth(
    pop: &AlignedPopulation,
    transform: &'static str,
    variable: &str,
) -> Result<Vec<f64>, ComputeError> {
    if pop.tail.len() < 3 {
        return Err(ComputeError::InsufficientPopulationTail {
            variable: variable.to_string(),
            transform,
            needed: 3,
            available: pop.tail.len(),
        });
    }
    let tail = &pop.tail[pop.tail.len() - 3..];
    Ok(four_quarter_sums(tail, &pop.growth))
}

/// Applies a non-four-quarter transform.
pub fn apply(
    transform: Transform,
    series: &DrawMatrix,
    inputs: &TransformInputs,
) -> Result<DrawMatrix, ComputeError> {
    match transform {
        Transform::Identity => Ok(series.clone()),
        Transform::QuarterToAnnual => Ok(series.map(|v| 4.0 * v)),
        Transform::PctAnnualized => Ok(series.map(|v| annualize(v, 0.0))),
        Transform::PctAnnualizedPerCapita => {
            let pop = require_population(inputs, transform.name(), series.n_periods())?;
            Ok(series.map_rows(|row| {
                row.iter()
                    .zip(&pop.growth)
                    .map(|(&y, &g)| annualize(y, g))
                    .collect()
            }))
        }
        Transform::LevelPctAnnualizedPerCapita => {
            let pop = require_population(inputs, transform.name(), series.n_periods())?;
            let hist = inputs.hist.ok_or_else(|| ComputeError::MissingHistory {
                variable: inputs.variable.to_string(),
                transform: transform.name(),
            })?;
            let y0 = inputs
                .y0_index
                .ok_or_else(|| ComputeError::MissingSeedIndex {
                    variable: inputs.variable.to_string(),
                    transform: transform.name(),
                })?;
            let y0_level = *hist.get(y0).ok_or_else(|| ComputeError::InsufficientHistory {
                variable: inputs.variable.to_string(),
                transform: transform.name(),
                needed: y0 + 1,
                available: hist.len(),
            })?;
            Ok(series.map_rows(|row| {
                let mut prev = y0_level;
                row.iter()
                    .zip(&pop.growth)
                    .map(|(&y, &g)| {
                        let dy = y - prev;
                        prev = y;
                        annualize(dy, g)
                    })
                    .collect()
            }))
        }
    }
}

/// Selects the historical slice a four-quarter transform seeds from.
///
/// With `y0_index = k`, cumulative-growth variants slice `hist[k+1..]`
/// and the level-growth variant slices `hist[k..]` (one period earlier).
/// The returned slice is validated to hold at least the transform's seed
/// length.
pub fn seed_slice<'a>(
    transform: FourQuarterTransform,
    hist: Option<&'a [f64]>,
    y0_index: Option<usize>,
    variable: &str,
) -> Result<&'a [f64], ComputeError> {
    let needed = transform.seed_len();
    if needed == 0 {
        return Ok(&[]);
    }
    let hist = hist.ok_or_else(|| ComputeError::MissingHistory {
        variable: variable.to_string(),
        transform: transform.name(),
    })?;
    let y0 = y0_index.ok_or_else(|| ComputeError::MissingSeedIndex {
        variable: variable.to_string(),
        transform: transform.name(),
    })?;
    let start = match transform {
        FourQuarterTransform::Pct | FourQuarterTransform::PctPerCapita => y0 + 1,
        FourQuarterTransform::LevelPctPerCapita => y0,
        FourQuarterTransform::Identity | FourQuarterTransform::QuarterToAnnual => {
            unreachable!("seedless transforms return early")
        }
    };
    let slice = hist.get(start..).unwrap_or(&[]);
    if slice.len() < needed {
        return Err(ComputeError::InsufficientHistory {
            variable: variable.to_string(),
            transform: transform.name(),
            needed,
            available: slice.len(),
        });
    }
    Ok(slice)
}

/// Applies a four-quarter transform.
///
/// `seed` is the historical slice from [`seed_slice`]; only its trailing
/// `seed_len()` values are consumed.
pub fn apply_four_quarter(
    transform: FourQuarterTransform,
    series: &DrawMatrix,
    seed: &[f64],
    inputs: &TransformInputs,
) -> Result<DrawMatrix, ComputeError> {
    match transform {
        FourQuarterTransform::Identity => Ok(series.clone()),
        FourQuarterTransform::QuarterToAnnual => Ok(series.map(|v| 4.0 * v)),
        FourQuarterTransform::Pct => {
            let tail = &seed[seed.len() - 3..];
            Ok(series.map_rows(|row| {
                four_quarter_sums(tail, row)
                    .into_iter()
                    .map(|s| cumulate_4q(s, 0.0))
                    .collect()
            }))
        }
        FourQuarterTransform::PctPerCapita => {
            let pop = require_population(inputs, transform.name(), series.n_periods())?;
            let g4 = four_quarter_pop_growth(pop, transform.name(), inputs.variable)?;
            let tail = &seed[seed.len() - 3..];
            Ok(series.map_rows(|row| {
                four_quarter_sums(tail, row)
                    .into_iter()
                    .zip(&g4)
                    .map(|(s, &g)| cumulate_4q(s, g))
                    .collect()
            }))
        }
        FourQuarterTransform::LevelPctPerCapita => {
            let pop = require_population(inputs, transform.name(), series.n_periods())?;
            let g4 = four_quarter_pop_growth(pop, transform.name(), inputs.variable)?;
            let tail = &seed[seed.len() - 4..];
            Ok(series.map_rows(|row| {
                four_quarter_diffs(tail, row)
                    .into_iter()
                    .zip(&g4)
                    .map(|(d, &g)| cumulate_4q(d, g))
                    .collect()
            }))
        }
    }
}
