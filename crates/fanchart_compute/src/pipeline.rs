//! The single-variable pipeline.
//!
//! One invocation summarises one sub-series (a variable, or a
//! variable×shock pair for decomposition products): scoped read from the
//! shared draw container, transform resolution from stored metadata,
//! trend broadcast, transform application, per-period mean, and density
//! bands. The pipeline has no side effects and no shared mutable state,
//! which is what lets the aggregator fan it out across workers.

use fanchart_core::matrix::DrawMatrix;
use fanchart_core::result::DensityBands;
use fanchart_core::types::{Product, VariableClass};
use fanchart_data::{require_variable, DrawFile};

use crate::bands::density_bands;
use crate::error::ComputeError;
use crate::transforms::{
    apply, apply_four_quarter, resolve_transform, seed_slice, AlignedPopulation, TransformInputs,
};

/// Everything one pipeline invocation needs, borrowed from the
/// aggregator. Cheap to copy per worker.
#[derive(Clone, Copy, Debug)]
pub struct VariableRequest<'a> {
    /// Class the variable belongs to.
    pub class: VariableClass,
    /// Product branch being summarised.
    pub product: Product,
    /// Variable name.
    pub variable: &'a str,
    /// Shock name for decomposition products.
    pub shock: Option<&'a str>,
    /// Shared, read-only draw container.
    pub file: &'a DrawFile,
    /// The variable's historical series, when available.
    pub hist: Option<&'a [f64]>,
    /// Index of the last pre-forecast historical period.
    pub y0_index: Option<usize>,
    /// Population growth aligned to the product's date axis.
    pub population: Option<&'a AlignedPopulation>,
    /// Date-axis length, for broadcasting scalar-per-draw products.
    pub n_periods: usize,
    /// Coverage levels for banding.
    pub levels: &'a [f64],
    /// Interval-construction policy.
    pub minimize: bool,
    /// Whether decomposition/trend products get bands at all.
    pub compute_shockdec_bands: bool,
}

impl VariableRequest<'_> {
    fn transform_inputs(&self) -> TransformInputs<'_> {
        TransformInputs {
            variable: self.variable,
            hist: self.hist,
            y0_index: self.y0_index,
            population: self.population,
        }
    }
}

/// Runs the pipeline for one sub-series.
///
/// Returns the per-period mean trajectory and its density bands; bands
/// are empty when the product's banding is optional and switched off.
/// Any transform precondition violation propagates with the variable
/// name and transform kind attached.
pub fn compute_means_bands(
    request: &VariableRequest<'_>,
) -> Result<(Vec<f64>, DensityBands), ComputeError> {
    require_variable(request.class, request.variable, request.file)?;
    let raw = request.file.series(request.variable, request.shock)?;
    let kind = request.file.transform_kind(request.class, request.variable)?;
    let transform = resolve_transform(request.variable, kind)?;

    // Trend containers store one scalar per draw; widen to the date axis
    // before transforming.
    let raw: DrawMatrix = if request.product.is_scalar_per_draw() {
        raw.broadcast_periods(request.n_periods)
            .map_err(|source| ComputeError::TrendShape {
                variable: request.variable.to_string(),
                source,
            })?
    } else {
        raw
    };

    let inputs = request.transform_inputs();
    let transformed = if request.product.is_four_quarter() {
        let four_quarter = transform.four_quarter();
        let seed = seed_slice(
            four_quarter,
            request.hist,
            request.y0_index,
            request.variable,
        )?;
        apply_four_quarter(four_quarter, &raw, seed, &inputs)?
    } else {
        apply(transform, &raw, &inputs)?
    };

    let means = transformed.period_means();
    let bands = if request.product.bands_optional() && !request.compute_shockdec_bands {
        DensityBands::empty()
    } else {
        density_bands(&transformed, request.levels, request.minimize)?
    };
    Ok((means, bands))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use fanchart_data::DataError;

    fn sample_file() -> DrawFile {
        let mut file = DrawFile::default();
        file.arrays.insert(
            "obs_gdp".to_string(),
            vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]],
        );
        file.arrays
            .insert("obs_trend".to_string(), vec![vec![2.0], vec![4.0]]);
        file.arrays.insert(
            "obs_gdp__g_sh".to_string(),
            vec![vec![0.5, 0.5], vec![1.5, 1.5]],
        );
        file.metadata.date_indices.insert("2024-Q1".to_string(), 0);
        file.metadata.date_indices.insert("2024-Q2".to_string(), 1);
        file.metadata.obs_indices.insert("obs_gdp".to_string(), 0);
        file.metadata.obs_indices.insert("obs_trend".to_string(), 1);
        file.metadata
            .obs_revtransforms
            .insert("obs_gdp".to_string(), "identity".to_string());
        file.metadata
            .obs_revtransforms
            .insert("obs_trend".to_string(), "identity".to_string());
        file.metadata.shock_indices.insert("g_sh".to_string(), 0);
        file
    }

    fn request<'a>(
        file: &'a DrawFile,
        product: Product,
        variable: &'a str,
        shock: Option<&'a str>,
        levels: &'a [f64],
    ) -> VariableRequest<'a> {
        VariableRequest {
            class: VariableClass::Observable,
            product,
            variable,
            shock,
            file,
            hist: None,
            y0_index: None,
            population: None,
            n_periods: 2,
            levels,
            minimize: false,
            compute_shockdec_bands: true,
        }
    }

    #[test]
    fn test_forecast_means_and_bands() {
        let file = sample_file();
        let levels = [0.5];
        let req = request(&file, Product::Forecast, "obs_gdp", None, &levels);
        let (means, bands) = compute_means_bands(&req).unwrap();
        assert_relative_eq!(means[0], 3.0);
        assert_relative_eq!(means[1], 4.0);
        let band = bands.get(0.5).unwrap();
        assert!(band.lower[0] >= 1.0 && band.upper[0] <= 5.0);
    }

    #[test]
    fn test_trend_broadcasts_before_banding() {
        let file = sample_file();
        let levels = [0.5];
        let req = request(&file, Product::Trend, "obs_trend", None, &levels);
        let (means, bands) = compute_means_bands(&req).unwrap();
        assert_eq!(means, vec![3.0, 3.0]);
        assert_eq!(bands.get(0.5).unwrap().len(), 2);
    }

    #[test]
    fn test_optional_bands_skipped_when_disabled() {
        let file = sample_file();
        let levels = [0.5];
        let mut req = request(&file, Product::ShockDec, "obs_gdp", Some("g_sh"), &levels);
        req.compute_shockdec_bands = false;
        let (means, bands) = compute_means_bands(&req).unwrap();
        assert_relative_eq!(means[0], 1.0);
        assert!(bands.is_empty());
    }

    #[test]
    fn test_shock_series_uses_composite_key() {
        let file = sample_file();
        let levels = [0.5];
        let mut req = request(&file, Product::ShockDec, "obs_gdp", Some("g_sh"), &levels);
        req.compute_shockdec_bands = true;
        let (means, bands) = compute_means_bands(&req).unwrap();
        assert_relative_eq!(means[0], 1.0);
        assert!(!bands.is_empty());
    }

    #[test]
    fn test_multi_column_trend_container_is_fatal() {
        // A trend array with more than one column is a malformed input
        // file; the error names the variable instead of panicking in a
        // worker.
        let mut file = sample_file();
        file.arrays.insert(
            "obs_trend".to_string(),
            vec![vec![2.0, 2.0], vec![4.0, 4.0]],
        );
        let levels = [0.5];
        let req = request(&file, Product::Trend, "obs_trend", None, &levels);
        let err = compute_means_bands(&req).unwrap_err();
        match err {
            ComputeError::TrendShape { variable, .. } => assert_eq!(variable, "obs_trend"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_variable_is_fatal() {
        let file = sample_file();
        let levels = [0.5];
        let req = request(&file, Product::Forecast, "obs_missing", None, &levels);
        let err = compute_means_bands(&req).unwrap_err();
        assert!(matches!(
            err,
            ComputeError::Data(DataError::MissingVariable { .. })
        ));
    }

    #[test]
    fn test_unknown_transform_kind_is_fatal() {
        let mut file = sample_file();
        file.metadata
            .obs_revtransforms
            .insert("obs_gdp".to_string(), "loglevel".to_string());
        let levels = [0.5];
        let req = request(&file, Product::Forecast, "obs_gdp", None, &levels);
        let err = compute_means_bands(&req).unwrap_err();
        assert!(matches!(err, ComputeError::UnknownTransform { .. }));
    }
}
