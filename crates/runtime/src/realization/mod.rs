//! Strategies that carry a computed multiplier to the host.
//!
//! The engine decides *what* magnitude an actor should have; a [`Realizer`]
//! decides *how* the host is told:
//!
//! - [`AttributeDelta`] modifies the speed attribute directly, steering it to
//!   an absolute target derived from the captured baseline.
//! - [`ScriptedEffect`] casts one of the four effect definitions with an
//!   overridden magnitude and dispels the others.
//!
//! The choice is made once, from [`Realization`](slowdown_core::Realization)
//! in the configuration.
mod attribute;
mod scripted;

pub use attribute::AttributeDelta;
pub use scripted::ScriptedEffect;

use slowdown_core::{ActorId, ActorSlowState, Governing, Realization};

use crate::effects::EffectRegistry;
use crate::error::HostError;
use crate::host::HostPlatform;

/// Applies and withdraws slowdowns on the host.
pub trait Realizer: Send + Sync {
    /// Returns a human-readable name for logging.
    fn name(&self) -> &'static str;

    /// Moves the actor onto the slowdown described by `governing` at
    /// `multiplier`, replacing whatever this realizer applied before.
    fn engage(
        &self,
        host: &dyn HostPlatform,
        actor: ActorId,
        state: &ActorSlowState,
        governing: Governing,
        multiplier: f32,
    ) -> Result<(), HostError>;

    /// Withdraws every slowdown from an actor whose record is being dropped.
    fn release(
        &self,
        host: &dyn HostPlatform,
        actor: ActorId,
        state: &ActorSlowState,
    ) -> Result<(), HostError>;
}

/// Builds the realizer selected by configuration.
pub fn for_config(realization: Realization, effects: EffectRegistry) -> Box<dyn Realizer> {
    match realization {
        Realization::AttributeDelta => Box::new(AttributeDelta),
        Realization::ScriptedEffect => Box::new(ScriptedEffect::new(effects)),
    }
}
