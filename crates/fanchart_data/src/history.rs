//! Historical data matrix.
//!
//! Externally supplied, untransformed history: one CSV row per variable,
//! first column the variable name, remaining columns the historical
//! periods in date order:
//!
//! ```csv
//! variable,1999-Q1,1999-Q2,1999-Q3
//! obs_gdp,0.52,0.61,0.47
//! obs_cpi,0.30,0.28,0.33
//! ```
//!
//! Transforms that seed a growth-rate or four-quarter computation read a
//! tail slice of one variable's row, anchored at the product's
//! `y0_index`.

use std::collections::HashMap;
use std::path::Path;

use fanchart_core::types::Quarter;

use crate::error::DataError;

/// Variables × historical-periods matrix with a name→row map.
#[derive(Clone, Debug, Default)]
pub struct HistoricalData {
    dates: Vec<Quarter>,
    rows: HashMap<String, Vec<f64>>,
}

impl HistoricalData {
    /// Loads the matrix from CSV.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path).map_err(|e| match e.kind() {
            csv::ErrorKind::Io(_) => {
                DataError::io(path, std::io::Error::other(e.to_string()))
            }
            _ => DataError::Csv(e),
        })?;

        let headers = reader.headers()?.clone();
        let mut dates = Vec::with_capacity(headers.len().saturating_sub(1));
        for header in headers.iter().skip(1) {
            dates.push(header.parse::<Quarter>()?);
        }

        let mut rows: HashMap<String, Vec<f64>> = HashMap::new();
        for record in reader.records() {
            let record = record?;
            let name = record.get(0).unwrap_or_default().to_string();
            let mut values = Vec::with_capacity(dates.len());
            for (i, raw) in record.iter().skip(1).enumerate() {
                let v: f64 = raw.parse().map_err(|_| DataError::InvalidNumber {
                    value: raw.to_string(),
                    column: headers.get(i + 1).unwrap_or_default().to_string(),
                    path: path.to_path_buf(),
                })?;
                values.push(v);
            }
            if rows.insert(name.clone(), values).is_some() {
                return Err(DataError::DuplicateHistoryRow {
                    variable: name,
                    path: path.to_path_buf(),
                });
            }
        }
        Ok(Self { dates, rows })
    }

    /// Builds a matrix directly (tests and embedding callers).
    pub fn from_rows(dates: Vec<Quarter>, rows: HashMap<String, Vec<f64>>) -> Self {
        Self { dates, rows }
    }

    /// Number of historical periods.
    pub fn n_periods(&self) -> usize {
        self.dates.len()
    }

    /// The historical date axis.
    pub fn dates(&self) -> &[Quarter] {
        &self.dates
    }

    /// One variable's full historical series, if present.
    pub fn row(&self, variable: &str) -> Option<&[f64]> {
        self.rows.get(variable).map(Vec::as_slice)
    }
}
