//! End-to-end batch run over synthetic draw containers on disk.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use approx::assert_relative_eq;
use tempfile::tempdir;

use fanchart_compute::driver::{means_bands_all, RunPaths};
use fanchart_compute::ComputeError;
use fanchart_core::config::{GrowthHorizon, MeansBandsConfig};
use fanchart_data::{store, DataError, DrawFile};

const HIST_DATES: [&str; 6] = [
    "2023-Q1", "2023-Q2", "2023-Q3", "2023-Q4", "2024-Q1", "2024-Q2",
];
const FORECAST_DATES: [&str; 2] = ["2024-Q3", "2024-Q4"];

/// Constant one-quarter log population growth used throughout.
const POP_GROWTH: f64 = 0.001f64;

fn write_history(path: &Path) {
    let header = format!("variable,{}", HIST_DATES.join(","));
    let contents = format!(
        "{header}\nobs_gdp,0.1,0.2,0.3,0.4,0.5,0.6\nobs_cons,1.0,1.0,1.0,1.0,1.0,1.0\n"
    );
    fs::write(path, contents).unwrap();
}

fn write_population(history_path: &Path, forecast_path: &Path) {
    // Levels with constant log growth POP_GROWTH per quarter.
    let level = |n: i32| 100.0 * (POP_GROWTH * f64::from(n)).exp();
    let mut hist = String::from("date,POP100\n");
    for (n, date) in HIST_DATES.iter().enumerate() {
        hist.push_str(&format!("{date},{}\n", level(n as i32)));
    }
    fs::write(history_path, hist).unwrap();

    let mut fcast = String::from("date,POP100\n");
    for (n, date) in FORECAST_DATES.iter().enumerate() {
        fcast.push_str(&format!(
            "{date},{}\n",
            level(HIST_DATES.len() as i32 + n as i32)
        ));
    }
    fs::write(forecast_path, fcast).unwrap();
}

fn draw_container(arrays: HashMap<String, Vec<Vec<f64>>>) -> DrawFile {
    let mut file = DrawFile::default();
    for (idx, date) in FORECAST_DATES.iter().enumerate() {
        file.metadata.date_indices.insert((*date).to_string(), idx);
    }
    file.metadata.obs_indices.insert("obs_gdp".to_string(), 0);
    file.metadata.obs_indices.insert("obs_cons".to_string(), 1);
    file.metadata
        .obs_revtransforms
        .insert("obs_gdp".to_string(), "pct_annualized".to_string());
    file.metadata
        .obs_revtransforms
        .insert("obs_cons".to_string(), "pct_annualized_percapita".to_string());
    file.arrays = arrays;
    file
}

fn forecast_arrays() -> HashMap<String, Vec<Vec<f64>>> {
    let mut arrays = HashMap::new();
    arrays.insert(
        "obs_gdp".to_string(),
        vec![vec![1.0, 2.0], vec![2.0, 3.0], vec![3.0, 4.0]],
    );
    arrays.insert(
        "obs_cons".to_string(),
        vec![vec![0.5, 0.5], vec![1.0, 1.0], vec![1.5, 1.5]],
    );
    arrays
}

fn run_config() -> MeansBandsConfig {
    MeansBandsConfig::builder()
        .output_vars(vec![
            "obs.forecast".parse().unwrap(),
            "obs.forecast4q".parse().unwrap(),
        ])
        .density_bands(vec![0.5, 0.8])
        .population_mnemonic("POP100")
        .population_growth(GrowthHorizon::OneQuarter)
        .build()
        .unwrap()
}

fn setup(dir: &Path) -> RunPaths {
    let input_dir = dir.join("raw");
    fs::create_dir_all(&input_dir).unwrap();
    write_history(&dir.join("history.csv"));
    write_population(&dir.join("pop_hist.csv"), &dir.join("pop_fcast.csv"));

    draw_container(forecast_arrays())
        .write(input_dir.join("forecast_obs_full_none.json"))
        .unwrap();
    draw_container(forecast_arrays())
        .write(input_dir.join("forecast4q_obs_full_none.json"))
        .unwrap();

    RunPaths::new(input_dir, dir.join("summaries"))
        .with_history(dir.join("history.csv"))
        .with_population(dir.join("pop_hist.csv"), dir.join("pop_fcast.csv"))
}

#[test]
fn batch_run_writes_all_summaries() {
    let dir = tempdir().unwrap();
    let paths = setup(dir.path());
    let config = run_config();

    let written = means_bands_all(&config, &paths).unwrap();
    assert_eq!(written.len(), 2);
    assert!(written[0].ends_with("mb_forecast_obs_full_none.json"));
    assert!(written[1].ends_with("mb_forecast4q_obs_full_none.json"));

    let forecast = store::read_means_bands(&written[0]).unwrap();
    assert_eq!(forecast.metadata.subseries_order, vec!["obs_gdp", "obs_cons"]);
    assert_eq!(forecast.metadata.dates.len(), 2);

    // obs_gdp is pct_annualized: mean of the annualised draws.
    let annualize = |y: f64, g: f64| 100.0 * ((y / 100.0 + g).exp().powi(4) - 1.0);
    let expected =
        (annualize(1.0, 0.0) + annualize(2.0, 0.0) + annualize(3.0, 0.0)) / 3.0;
    assert_relative_eq!(forecast.means["obs_gdp"][0], expected, max_relative = 1e-10);

    // obs_cons is per-capita with constant population growth.
    let expected = (annualize(0.5, POP_GROWTH)
        + annualize(1.0, POP_GROWTH)
        + annualize(1.5, POP_GROWTH))
        / 3.0;
    assert_relative_eq!(forecast.means["obs_cons"][0], expected, max_relative = 1e-8);

    // Both coverage levels present, lower <= mean <= upper pointwise.
    for key in ["obs_gdp", "obs_cons"] {
        let bands = &forecast.bands[key];
        assert_eq!(bands.len(), 2);
        for level in [0.5, 0.8] {
            let band = bands.get(level).unwrap();
            for t in 0..2 {
                assert!(band.lower[t] <= forecast.means[key][t]);
                assert!(forecast.means[key][t] <= band.upper[t]);
            }
        }
    }

    // Four-quarter product seeds from the last three historical growths
    // of obs_gdp (0.4, 0.5, 0.6).
    let forecast4q = store::read_means_bands(&written[1]).unwrap();
    let cumulate = |s: f64| 100.0 * ((s / 100.0f64).exp() - 1.0);
    let expected = (cumulate(0.4 + 0.5 + 0.6 + 1.0)
        + cumulate(0.4 + 0.5 + 0.6 + 2.0)
        + cumulate(0.4 + 0.5 + 0.6 + 3.0))
        / 3.0;
    assert_relative_eq!(forecast4q.means["obs_gdp"][0], expected, max_relative = 1e-10);
}

#[test]
fn batch_run_fails_fast_but_keeps_earlier_summaries() {
    let dir = tempdir().unwrap();
    let paths = setup(dir.path());
    // Second output variable's container is absent.
    fs::remove_file(paths.input_dir.join("forecast4q_obs_full_none.json")).unwrap();
    let config = run_config();

    let err = means_bands_all(&config, &paths).unwrap_err();
    assert!(matches!(err, ComputeError::Data(DataError::Io { .. })));

    assert!(paths
        .output_dir
        .join("mb_forecast_obs_full_none.json")
        .is_file());
    assert!(!paths
        .output_dir
        .join("mb_forecast4q_obs_full_none.json")
        .exists());
}

#[test]
fn population_gap_aborts_the_affected_variable() {
    let dir = tempdir().unwrap();
    let paths = setup(dir.path());
    // Truncate the forecast population levels to one quarter; the axis
    // quarter 2024-Q4 is then uncovered.
    fs::write(
        dir.path().join("pop_fcast.csv"),
        format!("date,POP100\n{},{}\n", FORECAST_DATES[0], 101.0),
    )
    .unwrap();
    let config = run_config();

    let err = means_bands_all(&config, &paths).unwrap_err();
    match err {
        ComputeError::PopulationGap { date } => assert_eq!(date, "2024-Q4"),
        other => panic!("unexpected error: {other}"),
    }
}
