//! Deterministic slowdown rules shared by the runtime and tooling.
//!
//! `slowdown-core` defines what it means for an actor to be slowed by an
//! action: the categories, the skill tiers and multiplier tables, the speed
//! arithmetic and the per-actor state machine. It has no notion of locks or
//! hosts; [`state::ActorSlowState`] is a plain value that the runtime guards
//! and drives.
pub mod category;
pub mod config;
pub mod error;
pub mod speed;
pub mod state;
pub mod tier;

pub use category::{ActorId, EffectKind, Hand, RangedKind, SlowdownCategory};
pub use config::{EffectIds, Realization, SlowdownConfig};
pub use error::ConfigError;
pub use state::{ActorSlowState, Governing, Removal, SlowFlags, SlowPhase};
pub use tier::{MultiplierTable, SkillTier, tier};
