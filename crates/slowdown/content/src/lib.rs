//! Settings persistence for the slowdown tracker.
//!
//! The tracker reads its [`SlowdownConfig`](slowdown_core::SlowdownConfig)
//! from a TOML file next to the host's other settings. This crate only moves
//! the value between disk and memory; validation rules live in
//! `slowdown-core`.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, LoadResult};
