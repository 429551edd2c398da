//! Summarize command implementation
//!
//! Runs the batch driver over every configured output variable.

use tracing::info;

use fanchart_compute::driver::means_bands_all;

use crate::settings::Settings;
use crate::Result;

/// Run the summarize command
pub fn run(settings_path: &str) -> Result<()> {
    let settings = Settings::load(settings_path)?;
    let config = settings.config()?;
    let paths = settings.run_paths();

    info!("Summarising {} output variable(s)...", config.output_vars.len());
    info!("  Input directory: {}", paths.input_dir.display());
    info!("  Output directory: {}", paths.output_dir.display());

    let written = means_bands_all(&config, &paths)?;
    for path in &written {
        info!("  Wrote {}", path.display());
    }

    info!("Summarisation complete: {} summaries written", written.len());
    Ok(())
}
