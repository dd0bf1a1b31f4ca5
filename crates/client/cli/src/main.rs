//! Simulation driver for the slowdown tracker.
//!
//! Loads the settings file, then runs a script against an in-memory host and
//! prints actor speeds as the script progresses.
mod config;
mod logging;
mod script;

use std::fs::File;
use std::io::{self, BufReader};

use anyhow::{Context, Result};
use config::CliConfig;
use script::ScriptRunner;
use slowdown_content::ConfigLoader;

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = CliConfig::from_env(std::env::args().skip(1));
    let config = ConfigLoader::load_or_default(&cli.config_path)
        .with_context(|| format!("Failed to load {}", cli.config_path.display()))?;

    let _guard = logging::setup_logging(config.log_level, cli.log_dir.as_deref())?;
    tracing::info!(
        config = %cli.config_path.display(),
        realization = %config.realization,
        "Slowdown driver starting"
    );

    let runner = ScriptRunner::new(config)?;
    let mut out = io::stdout().lock();
    match &cli.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open script {}", path.display()))?;
            runner.run(BufReader::new(file), &mut out)
        }
        None => runner.run(io::stdin().lock(), &mut out),
    }
}
