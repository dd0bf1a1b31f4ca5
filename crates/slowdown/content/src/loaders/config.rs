//! Slowdown configuration loader.

use std::path::Path;

use slowdown_core::SlowdownConfig;
use tracing::{info, warn};

use crate::loaders::{LoadResult, read_file, write_file};

/// Loader for slowdown configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys take their default values. The result is validated, so
    /// a returned config is always safe to hand to the engine.
    pub fn load(path: &Path) -> LoadResult<SlowdownConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse config data from a TOML string.
    pub fn parse(content: &str) -> LoadResult<SlowdownConfig> {
        let config: SlowdownConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid config: {}", e))?;

        Ok(config)
    }

    /// Write a config to a TOML file.
    pub fn save(path: &Path, config: &SlowdownConfig) -> LoadResult<()> {
        let content = toml::to_string_pretty(config)
            .map_err(|e| anyhow::anyhow!("Failed to serialize config TOML: {}", e))?;
        write_file(path, &content)
    }

    /// Load the config at `path`, writing the defaults there first if the
    /// file does not exist yet.
    pub fn load_or_default(path: &Path) -> LoadResult<SlowdownConfig> {
        if path.exists() {
            return Self::load(path);
        }

        let config = SlowdownConfig::default();
        match Self::save(path, &config) {
            Ok(()) => info!(path = %path.display(), "Wrote default slowdown config"),
            Err(e) => warn!(path = %path.display(), error = %e, "Could not write default config"),
        }
        Ok(config)
    }
}
