//! Runtime for the action slowdown tracker.
//!
//! This crate owns the mutable side of slowdowns: the per-actor state store,
//! the engine that turns apply/remove/clear operations into host calls, and
//! the trigger router that decides which notifications matter. Consumers
//! build one [`SlowdownEngine`] over a [`HostPlatform`] and drive it through
//! [`SlowdownService`] or, for raw action notifications, a [`TriggerRouter`].
//!
//! Modules are organized by responsibility:
//! - [`engine`] hosts the state machine and its locking discipline
//! - [`host`] defines the host boundary and the in-memory host
//! - [`realization`] carries multipliers to the host
//! - [`router`] maps triggers onto service operations
//! - [`store`] and [`effects`] hold the engine's shared data
pub mod effects;
pub mod engine;
pub mod error;
pub mod host;
pub mod realization;
pub mod router;
pub mod service;
pub mod store;

pub use effects::EffectRegistry;
pub use engine::SlowdownEngine;
pub use error::{HostError, InitError, MissingEffect, ParseTriggerError};
pub use host::{
    ActorInfo, ActorQuery, Attribute, EffectHandle, HostPlatform, InMemoryHost, SimActor,
    SpellInfo,
};
pub use realization::{AttributeDelta, Realizer, ScriptedEffect};
pub use router::{AnimationTrigger, TriggerRouter};
pub use service::SlowdownService;
pub use store::{StateStore, StoreGuard};
