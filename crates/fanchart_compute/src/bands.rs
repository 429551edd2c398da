//! Density band estimation.
//!
//! Bands are computed per period, independently: each period's draw
//! values are sorted and an interval covering the requested probability
//! mass is reported. Two policies exist:
//!
//! - **equal-tailed** drops `(1−p)/2` mass from each tail, with linear
//!   interpolation between bracketing order statistics on fractional
//!   quantile positions;
//! - **minimal-width** scans the sorted draws for the shortest contiguous
//!   window holding `ceil(p·n)` values and reports its realised
//!   endpoints (no interpolation).
//!
//! Intervals nest monotonically across coverage levels under both
//! policies. Equal-tailed quantiles nest because the quantile function is
//! monotone in the tail mass; minimal-width windows are computed widest
//! level first, with each narrower level's scan constrained to lie inside
//! the next wider level's window.
//!
//! When a period holds fewer draws than the coverage can resolve, both
//! policies clamp to the realised range rather than failing; a single
//! draw yields degenerate (lower == upper) bounds.

use fanchart_core::matrix::DrawMatrix;
use fanchart_core::result::{Band, DensityBands};

use crate::error::ComputeError;

/// Interpolated quantile of a non-empty sorted slice, `q` in [0, 1].
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let h = q * (n - 1) as f64;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = h - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

/// Index range of the shortest contiguous window of `k` sorted draws
/// whose indices lie within `[lo, hi]` (inclusive).
///
/// Ties on width resolve to the leftmost window.
fn minimal_window(sorted: &[f64], k: usize, lo: usize, hi: usize) -> (usize, usize) {
    debug_assert!(k >= 1 && lo + k <= hi + 1);
    let mut best_start = lo;
    let mut best_width = sorted[lo + k - 1] - sorted[lo];
    for start in (lo + 1)..=(hi + 1 - k) {
        let width = sorted[start + k - 1] - sorted[start];
        if width < best_width {
            best_width = width;
            best_start = start;
        }
    }
    (best_start, best_start + k - 1)
}

/// Computes density bands for a transformed series at the given coverage
/// levels.
///
/// Levels must lie strictly between 0 and 1. With `minimize = false`
/// intervals are equal-tailed; with `minimize = true` they are the
/// minimal-width windows over realised draws.
pub fn density_bands(
    series: &DrawMatrix,
    levels: &[f64],
    minimize: bool,
) -> Result<DensityBands, ComputeError> {
    for &level in levels {
        if !(level > 0.0 && level < 1.0) {
            return Err(ComputeError::InvalidBandLevel(level));
        }
    }

    let n_periods = series.n_periods();
    let n_draws = series.n_draws();
    let mut sorted_columns = Vec::with_capacity(n_periods);
    for period in 0..n_periods {
        let mut column = series.column(period);
        column.sort_unstable_by(f64::total_cmp);
        sorted_columns.push(column);
    }

    let mut out = DensityBands::empty();
    if minimize {
        // Widest level first, so each narrower window is searched inside
        // the enclosing wider one and the intervals nest by construction.
        let mut order: Vec<usize> = (0..levels.len()).collect();
        order.sort_by(|&a, &b| levels[b].total_cmp(&levels[a]));
        let mut lowers = vec![Vec::with_capacity(n_periods); levels.len()];
        let mut uppers = vec![Vec::with_capacity(n_periods); levels.len()];
        for sorted in &sorted_columns {
            let (mut lo, mut hi) = (0, n_draws - 1);
            for &i in &order {
                let span = hi - lo + 1;
                let k = ((levels[i] * n_draws as f64).ceil() as usize).clamp(1, span);
                (lo, hi) = minimal_window(sorted, k, lo, hi);
                lowers[i].push(sorted[lo]);
                uppers[i].push(sorted[hi]);
            }
        }
        for (i, &level) in levels.iter().enumerate() {
            let lower = std::mem::take(&mut lowers[i]);
            let upper = std::mem::take(&mut uppers[i]);
            out.insert(level, Band { lower, upper });
        }
    } else {
        for &level in levels {
            let mut lower = Vec::with_capacity(n_periods);
            let mut upper = Vec::with_capacity(n_periods);
            let alpha = (1.0 - level) / 2.0;
            for sorted in &sorted_columns {
                lower.push(quantile(sorted, alpha));
                upper.push(quantile(sorted, 1.0 - alpha));
            }
            out.insert(level, Band { lower, upper });
        }
    }
    Ok(out)
}
