//! Error types for slowdown-core.
//!
//! The state machine itself never fails: invalid or untracked actors are
//! no-ops handled by the runtime. The only fallible surface in this crate is
//! configuration validation.

use thiserror::Error;

/// Rejected configuration values.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    #[error("{table}[{tier}] = {value} is outside (0, 1]")]
    MultiplierOutOfRange {
        table: &'static str,
        tier: usize,
        value: f32,
    },

    #[error("log level {0} is not in 0..=5")]
    UnknownLogLevel(u8),
}
