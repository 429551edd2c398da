//! The per-output-variable draw container.
//!
//! One container holds everything the pipeline needs for a single
//! (product, class) request: the raw draws×periods array per variable
//! (keyed `variable`, or `variable__shock` for decomposition products),
//! and a metadata block with the stored index maps:
//!
//! ```json
//! {
//!   "arrays": { "obs_gdp": [[0.1, 0.2], [0.3, 0.4]] },
//!   "metadata": {
//!     "date_indices": { "2020-Q1": 0, "2020-Q2": 1 },
//!     "obs_indices": { "obs_gdp": 0 },
//!     "obs_revtransforms": { "obs_gdp": "pct_annualized_percapita" },
//!     "pseudo_indices": {},
//!     "pseudo_revtransforms": {},
//!     "shock_indices": {}
//!   }
//! }
//! ```
//!
//! The container is parsed once into an immutable in-memory value; each
//! pipeline worker then performs its scoped read via [`DrawFile::series`],
//! which copies exactly one variable's block. Workers never share a
//! mutable cursor.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use fanchart_core::matrix::DrawMatrix;
use fanchart_core::result::subseries_key;
use fanchart_core::types::VariableClass;

use crate::error::DataError;

/// Stored index and transform tables of a draw container.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Date string → period index; absent (empty) for impulse responses.
    #[serde(default)]
    pub date_indices: BTreeMap<String, usize>,

    /// Observable name → column index.
    #[serde(default)]
    pub obs_indices: HashMap<String, usize>,
    /// Observable name → transform kind string.
    #[serde(default)]
    pub obs_revtransforms: HashMap<String, String>,

    /// Pseudo-observable name → column index.
    #[serde(default)]
    pub pseudo_indices: HashMap<String, usize>,
    /// Pseudo-observable name → transform kind string.
    #[serde(default)]
    pub pseudo_revtransforms: HashMap<String, String>,

    /// Shock name → column index.
    #[serde(default)]
    pub shock_indices: HashMap<String, usize>,
    /// Shock name → transform kind string.
    #[serde(default)]
    pub shock_revtransforms: HashMap<String, String>,
}

impl FileMetadata {
    /// The name → column index map for a class.
    pub fn indices(&self, class: VariableClass) -> &HashMap<String, usize> {
        match class {
            VariableClass::Observable => &self.obs_indices,
            VariableClass::PseudoObservable => &self.pseudo_indices,
            VariableClass::Shock => &self.shock_indices,
        }
    }

    /// The name → transform kind map for a class.
    pub fn revtransforms(&self, class: VariableClass) -> &HashMap<String, String> {
        match class {
            VariableClass::Observable => &self.obs_revtransforms,
            VariableClass::PseudoObservable => &self.pseudo_revtransforms,
            VariableClass::Shock => &self.shock_revtransforms,
        }
    }
}

/// An in-memory draw container.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DrawFile {
    /// Raw draws×periods arrays keyed by variable (or `variable__shock`).
    #[serde(default)]
    pub arrays: HashMap<String, Vec<Vec<f64>>>,
    /// Stored index and transform tables.
    #[serde(default)]
    pub metadata: FileMetadata,
}

impl DrawFile {
    /// Opens and parses a container from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| DataError::io(path, e))?;
        serde_json::from_slice(&bytes).map_err(|e| DataError::Json {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Writes a container to disk (test fixtures and tooling).
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), DataError> {
        let path = path.as_ref();
        let bytes = serde_json::to_vec(self).map_err(|e| DataError::Json {
            path: path.to_path_buf(),
            source: e,
        })?;
        fs::write(path, bytes).map_err(|e| DataError::io(path, e))
    }

    /// Scoped read of one variable's raw series.
    ///
    /// For shock products the series is additionally keyed by the shock
    /// name. Returns an owned, validated [`DrawMatrix`]; the container
    /// itself stays untouched and shareable across workers.
    pub fn series(
        &self,
        variable: &str,
        shock: Option<&str>,
    ) -> Result<DrawMatrix, DataError> {
        let key = match shock {
            Some(shock) => subseries_key(variable, shock),
            None => variable.to_string(),
        };
        let rows = self
            .arrays
            .get(&key)
            .ok_or_else(|| DataError::MissingArray { key: key.clone() })?;
        DrawMatrix::from_rows(rows.clone())
            .map_err(|source| DataError::InvalidArray { key, source })
    }

    /// The stored transform kind string for one variable of a class.
    pub fn transform_kind(
        &self,
        class: VariableClass,
        variable: &str,
    ) -> Result<&str, DataError> {
        self.metadata
            .revtransforms(class)
            .get(variable)
            .map(String::as_str)
            .ok_or_else(|| DataError::MissingTransform {
                variable: variable.to_string(),
                class,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_file() -> DrawFile {
        let mut file = DrawFile::default();
        file.arrays
            .insert("obs_gdp".to_string(), vec![vec![0.1, 0.2], vec![0.3, 0.4]]);
        file.arrays.insert(
            "obs_gdp__g_sh".to_string(),
            vec![vec![0.05, 0.05], vec![0.1, 0.1]],
        );
        file.metadata.date_indices.insert("2020-Q1".to_string(), 0);
        file.metadata.date_indices.insert("2020-Q2".to_string(), 1);
        file.metadata.obs_indices.insert("obs_gdp".to_string(), 0);
        file.metadata
            .obs_revtransforms
            .insert("obs_gdp".to_string(), "identity".to_string());
        file.metadata.shock_indices.insert("g_sh".to_string(), 0);
        file
    }

    #[test]
    fn test_series_plain_and_shock_keyed() {
        let file = sample_file();
        let m = file.series("obs_gdp", None).unwrap();
        assert_eq!(m.n_draws(), 2);
        assert_eq!(m.n_periods(), 2);
        assert_eq!(m.row(0), &[0.1, 0.2]);

        let m = file.series("obs_gdp", Some("g_sh")).unwrap();
        assert_eq!(m.row(1), &[0.1, 0.1]);
    }

    #[test]
    fn test_series_missing_key() {
        let file = sample_file();
        let err = file.series("obs_cpi", None).unwrap_err();
        assert!(err.to_string().contains("obs_cpi"));
    }

    #[test]
    fn test_transform_kind_lookup() {
        let file = sample_file();
        assert_eq!(
            file.transform_kind(VariableClass::Observable, "obs_gdp")
                .unwrap(),
            "identity"
        );
        let err = file
            .transform_kind(VariableClass::Observable, "obs_cpi")
            .unwrap_err();
        assert!(err.to_string().contains("obs_cpi"));
    }

    #[test]
    fn test_open_write_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("forecast_obs_full_none.json");
        let file = sample_file();
        file.write(&path).unwrap();

        let back = DrawFile::open(&path).unwrap();
        assert_eq!(back.arrays.len(), 2);
        assert_eq!(back.metadata.date_indices.len(), 2);
        assert_eq!(
            back.metadata.obs_revtransforms.get("obs_gdp").unwrap(),
            "identity"
        );
    }

    #[test]
    fn test_open_missing_file() {
        let err = DrawFile::open("/nonexistent/container.json").unwrap_err();
        assert!(err.to_string().contains("container.json"));
    }
}
