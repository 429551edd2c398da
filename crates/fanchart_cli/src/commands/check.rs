//! Check command implementation
//!
//! Validates the settings file and run inputs without computing anything.

use tracing::{info, warn};

use fanchart_compute::driver::missing_inputs;

use crate::settings::Settings;
use crate::{CliError, Result};

/// Run the check command
pub fn run(settings_path: &str) -> Result<()> {
    info!("Checking run configuration...");

    let settings = Settings::load(settings_path)?;
    let config = settings.config()?;
    info!("  Settings file: OK ({settings_path})");
    info!("  Output variables: {}", config.output_vars.len());
    info!("  Band levels: {:?}", config.effective_bands());

    if config.population_mnemonic.is_some()
        && (settings.population_history.is_none() || settings.population_forecast.is_none())
    {
        return Err(CliError::InvalidSetting(
            "population_mnemonic is set but population level files are not".to_string(),
        ));
    }

    let paths = settings.run_paths();
    let missing = missing_inputs(&config, &paths);
    if missing.is_empty() {
        info!("  Input files: OK");
        info!("Check complete");
        Ok(())
    } else {
        for path in &missing {
            warn!("  Missing: {}", path.display());
        }
        Err(CliError::FileNotFound(
            missing[0].display().to_string(),
        ))
    }
}
