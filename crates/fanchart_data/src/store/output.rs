//! Summary-object writer.
//!
//! One JSON file per output variable, named by prefixing the input draw
//! filename with `mb_`. The write is a single exclusive write; no
//! concurrent writers target the same path.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use fanchart_core::result::MeansBands;

use crate::error::DataError;

/// Derives the summary path for an input draw filename: `mb_<file>` in
/// the output directory.
pub fn output_path(output_dir: &Path, input_filename: &str) -> PathBuf {
    output_dir.join(format!("mb_{input_filename}"))
}

/// Writes one means-and-bands result, creating the destination directory
/// if absent. Returns the written path.
pub fn write_means_bands(
    output_dir: &Path,
    input_filename: &str,
    mb: &MeansBands,
) -> Result<PathBuf, DataError> {
    fs::create_dir_all(output_dir).map_err(|e| DataError::io(output_dir, e))?;
    let path = output_path(output_dir, input_filename);
    let bytes = serde_json::to_vec(mb).map_err(|e| DataError::Json {
        path: path.clone(),
        source: e,
    })?;
    fs::write(&path, bytes).map_err(|e| DataError::io(&path, e))?;

    info!(
        path = %path.display(),
        product = %mb.metadata.product,
        class = %mb.metadata.class,
        subseries = mb.n_subseries(),
        periods = mb.n_periods(),
        "Means and bands written"
    );
    Ok(path)
}

/// Reads a previously written summary (tooling and tests).
pub fn read_means_bands(path: &Path) -> Result<MeansBands, DataError> {
    let bytes = fs::read(path).map_err(|e| DataError::io(path, e))?;
    serde_json::from_slice(&bytes).map_err(|e| DataError::Json {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fanchart_core::result::{MbMetadata, MeansBands};
    use fanchart_core::types::{CondType, InputType, Product, VariableClass};
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    fn sample_mb() -> MeansBands {
        let mut means = BTreeMap::new();
        means.insert("obs_gdp".to_string(), vec![1.0, 2.0]);
        MeansBands {
            metadata: MbMetadata {
                input_type: InputType::Full,
                cond_type: CondType::None,
                product: Product::Forecast,
                class: VariableClass::Observable,
                dates: vec!["2020-Q1".parse().unwrap(), "2020-Q2".parse().unwrap()],
                subseries_order: vec!["obs_gdp".to_string()],
                shocks: vec![],
                forecast_string: None,
            },
            means,
            bands: BTreeMap::new(),
        }
    }

    #[test]
    fn test_output_path_prefix() {
        let path = output_path(Path::new("/out"), "forecast_obs_full_none.json");
        assert_eq!(
            path,
            Path::new("/out/mb_forecast_obs_full_none.json")
        );
    }

    #[test]
    fn test_write_creates_dir_and_roundtrips() {
        let dir = tempdir().unwrap();
        let out_dir = dir.path().join("nested").join("out");
        let mb = sample_mb();

        let path = write_means_bands(&out_dir, "forecast_obs_full_none.json", &mb).unwrap();
        assert!(path.exists());

        let back = read_means_bands(&path).unwrap();
        assert_eq!(back, mb);
    }
}
