//! Driver configuration read from the process environment.
use std::env;
use std::path::PathBuf;

/// Where the driver finds its settings, logs and script.
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub config_path: PathBuf,
    pub log_dir: Option<PathBuf>,
    /// Script to run; stdin when absent.
    pub script: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(Self::DEFAULT_CONFIG_PATH),
            log_dir: None,
            script: None,
        }
    }
}

impl CliConfig {
    pub const DEFAULT_CONFIG_PATH: &'static str = "slowdown.toml";

    /// Construct configuration from environment variables and arguments.
    ///
    /// Environment variables:
    /// - `SLOWDOWN_CONFIG` - Settings file (default: `slowdown.toml`)
    /// - `SLOWDOWN_LOG_DIR` - Directory for a log file (default: stderr only)
    ///
    /// The first positional argument, if any, is the script path.
    pub fn from_env(mut args: impl Iterator<Item = String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = read_env::<PathBuf>("SLOWDOWN_CONFIG") {
            config.config_path = path;
        }
        config.log_dir = read_env::<PathBuf>("SLOWDOWN_LOG_DIR");
        config.script = args.next().filter(|arg| arg != "-").map(PathBuf::from);

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key)
        .ok()
        .filter(|value| !value.is_empty())?
        .parse()
        .ok()
}
