//! Population growth series.
//!
//! Per-capita transforms adjust reported growth for population growth.
//! The levels arrive in two CSV files (realised history and a forecast
//! extension), each with a `date` column of quarter strings and one named
//! column per mnemonic:
//!
//! ```csv
//! date,CNP16OV
//! 2019-Q4,259.2
//! 2020-Q1,259.9
//! ```
//!
//! [`load_population_growth`] converts both level series into log growth
//! rates at the configured horizon. Misaligned population adjustment
//! would silently corrupt every per-capita variable, so any missing or
//! malformed input is fatal; there is no partial-data fallback.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use fanchart_core::config::GrowthHorizon;
use fanchart_core::types::Quarter;

use crate::error::DataError;

/// Log population growth keyed by quarter, split into realised history
/// and the forecast extension.
///
/// Both maps are empty when no mnemonic is configured; per-capita
/// transforms are then unreachable for the run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PopulationGrowth {
    /// Growth computed from the realised level file.
    pub history: BTreeMap<Quarter, f64>,
    /// Growth computed from the forecast level file.
    pub forecast: BTreeMap<Quarter, f64>,
}

impl PopulationGrowth {
    /// An empty series (no mnemonic configured).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether any growth rates are available.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty() && self.forecast.is_empty()
    }

    /// Growth at one quarter, preferring realised history over forecast.
    pub fn get(&self, quarter: Quarter) -> Option<f64> {
        self.history
            .get(&quarter)
            .or_else(|| self.forecast.get(&quarter))
            .copied()
    }
}

/// Loads one level CSV: quarter → level for the requested mnemonic.
fn load_levels(
    path: &Path,
    mnemonic: &str,
) -> Result<BTreeMap<Quarter, f64>, DataError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| match e.kind() {
        csv::ErrorKind::Io(_) => {
            DataError::io(path, std::io::Error::other(e.to_string()))
        }
        _ => DataError::Csv(e),
    })?;

    let headers = reader.headers()?.clone();
    let date_col = headers
        .iter()
        .position(|h| h == "date")
        .ok_or_else(|| DataError::MissingColumn {
            column: "date".to_string(),
            path: path.to_path_buf(),
        })?;
    let level_col = headers
        .iter()
        .position(|h| h == mnemonic)
        .ok_or_else(|| DataError::MissingColumn {
            column: mnemonic.to_string(),
            path: path.to_path_buf(),
        })?;

    let mut levels = BTreeMap::new();
    for record in reader.records() {
        let record = record?;
        let date_str = record.get(date_col).unwrap_or_default();
        let quarter: Quarter = date_str.parse()?;
        let raw = record.get(level_col).unwrap_or_default();
        let level: f64 = raw.parse().map_err(|_| DataError::InvalidNumber {
            value: raw.to_string(),
            column: mnemonic.to_string(),
            path: path.to_path_buf(),
        })?;
        if level <= 0.0 {
            return Err(DataError::NonPositiveLevel {
                value: level,
                date: date_str.to_string(),
                path: path.to_path_buf(),
            });
        }
        levels.insert(quarter, level);
    }
    Ok(levels)
}

/// Log growth at the given horizon over an ordered level series.
///
/// Growth at quarter `t` is `ln(p_t) − ln(p_{t−lag})`; quarters whose lag
/// partner is absent produce no entry.
fn growth_rates(
    levels: &BTreeMap<Quarter, f64>,
    horizon: GrowthHorizon,
) -> BTreeMap<Quarter, f64> {
    let lag = horizon.lag() as u32;
    levels
        .iter()
        .filter_map(|(&q, &level)| {
            levels
                .get(&q.minus(lag))
                .map(|&prev| (q, (level / prev).ln()))
        })
        .collect()
}

/// Loads the population growth series from the history and forecast
/// level files.
///
/// With no mnemonic configured, returns two empty series and every
/// per-capita transform becomes unreachable for the run.
///
/// For the forecast file, the first growth rates are seeded from the tail
/// of the history levels so that the series joins without a gap.
pub fn load_population_growth(
    history_file: &Path,
    forecast_file: &Path,
    mnemonic: Option<&str>,
    horizon: GrowthHorizon,
) -> Result<PopulationGrowth, DataError> {
    let Some(mnemonic) = mnemonic else {
        debug!("No population mnemonic configured; per-capita transforms unavailable");
        return Ok(PopulationGrowth::empty());
    };

    let history_levels = load_levels(history_file, mnemonic)?;
    let forecast_levels = load_levels(forecast_file, mnemonic)?;

    let history = growth_rates(&history_levels, horizon);

    // Join histories so the first forecast quarters can difference
    // against realised levels.
    let mut combined = history_levels;
    combined.extend(forecast_levels.iter().map(|(&q, &v)| (q, v)));
    let forecast: BTreeMap<Quarter, f64> = growth_rates(&combined, horizon)
        .into_iter()
        .filter(|(q, _)| forecast_levels.contains_key(q))
        .collect();

    debug!(
        mnemonic,
        history_len = history.len(),
        forecast_len = forecast.len(),
        "Loaded population growth"
    );
    Ok(PopulationGrowth { history, forecast })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_csv(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn q(s: &str) -> Quarter {
        s.parse().unwrap()
    }

    #[test]
    fn test_no_mnemonic_returns_empty() {
        let pop = load_population_growth(
            Path::new("unused"),
            Path::new("unused"),
            None,
            GrowthHorizon::OneQuarter,
        )
        .unwrap();
        assert!(pop.is_empty());
    }

    #[test]
    fn test_quarter_over_quarter_growth() {
        let dir = tempdir().unwrap();
        let hist = write_csv(
            dir.path(),
            "pop_hist.csv",
            "date,POP\n2019-Q3,100.0\n2019-Q4,101.0\n2020-Q1,102.0\n",
        );
        let fcast = write_csv(
            dir.path(),
            "pop_fcast.csv",
            "date,POP\n2020-Q2,103.0\n2020-Q3,104.0\n",
        );
        let pop = load_population_growth(&hist, &fcast, Some("POP"), GrowthHorizon::OneQuarter)
            .unwrap();

        // First history quarter has no lag partner.
        assert!(pop.history.get(&q("2019-Q3")).is_none());
        assert_relative_eq!(
            *pop.history.get(&q("2019-Q4")).unwrap(),
            (101.0f64 / 100.0).ln()
        );
        // First forecast quarter differences against the history tail.
        assert_relative_eq!(
            *pop.forecast.get(&q("2020-Q2")).unwrap(),
            (103.0f64 / 102.0).ln()
        );
        assert_relative_eq!(
            *pop.forecast.get(&q("2020-Q3")).unwrap(),
            (104.0f64 / 103.0).ln()
        );
        // get() prefers history, falls through to forecast.
        assert!(pop.get(q("2020-Q2")).is_some());
        assert!(pop.get(q("1990-Q1")).is_none());
    }

    #[test]
    fn test_year_over_year_growth() {
        let dir = tempdir().unwrap();
        let hist = write_csv(
            dir.path(),
            "pop_hist.csv",
            "date,POP\n2019-Q1,100.0\n2019-Q2,100.5\n2019-Q3,101.0\n2019-Q4,101.5\n2020-Q1,102.0\n",
        );
        let fcast = write_csv(dir.path(), "pop_fcast.csv", "date,POP\n");
        let pop = load_population_growth(&hist, &fcast, Some("POP"), GrowthHorizon::FourQuarter)
            .unwrap();

        assert_eq!(pop.history.len(), 1);
        assert_relative_eq!(
            *pop.history.get(&q("2020-Q1")).unwrap(),
            (102.0f64 / 100.0).ln()
        );
    }

    #[test]
    fn test_missing_column_fatal() {
        let dir = tempdir().unwrap();
        let hist = write_csv(dir.path(), "pop_hist.csv", "date,OTHER\n2019-Q4,1.0\n");
        let fcast = write_csv(dir.path(), "pop_fcast.csv", "date,OTHER\n");
        let err =
            load_population_growth(&hist, &fcast, Some("POP"), GrowthHorizon::OneQuarter)
                .unwrap_err();
        assert!(err.to_string().contains("POP"));
    }

    #[test]
    fn test_non_positive_level_fatal() {
        let dir = tempdir().unwrap();
        let hist = write_csv(
            dir.path(),
            "pop_hist.csv",
            "date,POP\n2019-Q4,100.0\n2020-Q1,0.0\n",
        );
        let fcast = write_csv(dir.path(), "pop_fcast.csv", "date,POP\n");
        let err =
            load_population_growth(&hist, &fcast, Some("POP"), GrowthHorizon::OneQuarter)
                .unwrap_err();
        assert!(err.to_string().contains("Non-positive"));
    }

    #[test]
    fn test_missing_file_fatal() {
        let dir = tempdir().unwrap();
        let fcast = write_csv(dir.path(), "pop_fcast.csv", "date,POP\n");
        let err = load_population_growth(
            &dir.path().join("absent.csv"),
            &fcast,
            Some("POP"),
            GrowthHorizon::OneQuarter,
        )
        .unwrap_err();
        assert!(err.to_string().contains("absent.csv"));
    }
}
