use slowdown_core::{ActorId, ActorSlowState, Governing, speed};
use tracing::{trace, warn};

use super::Realizer;
use crate::effects::EffectRegistry;
use crate::error::HostError;
use crate::host::HostPlatform;

/// Casts the effect definition of the governing category with a magnitude
/// override.
///
/// Exactly one of the four definitions is on a slowed actor at a time; the
/// others are dispelled first.
#[derive(Clone, Copy, Debug)]
pub struct ScriptedEffect {
    effects: EffectRegistry,
}

impl ScriptedEffect {
    pub fn new(effects: EffectRegistry) -> Self {
        Self { effects }
    }
}

impl Realizer for ScriptedEffect {
    fn name(&self) -> &'static str {
        "scripted_effect"
    }

    fn engage(
        &self,
        host: &dyn HostPlatform,
        actor: ActorId,
        _state: &ActorSlowState,
        governing: Governing,
        multiplier: f32,
    ) -> Result<(), HostError> {
        let wanted = governing.category.effect();
        for (kind, handle) in self.effects.iter().filter(|(kind, _)| *kind != wanted) {
            trace!(target: "runtime::realization", %actor, effect = %kind, "dispel");
            if let Err(error) = host.dispel_effect(actor, handle) {
                warn!(
                    target: "runtime::realization",
                    %actor,
                    effect = %kind,
                    error = %error,
                    "Dispel failed, casting governing effect anyway"
                );
            }
        }

        let magnitude = speed::magnitude(multiplier);
        trace!(target: "runtime::realization", %actor, effect = %wanted, magnitude, "cast");
        host.apply_effect(actor, self.effects.get(wanted), magnitude)
    }

    fn release(
        &self,
        host: &dyn HostPlatform,
        actor: ActorId,
        _state: &ActorSlowState,
    ) -> Result<(), HostError> {
        let mut first_error = None;
        for (_, handle) in self.effects.iter() {
            if let Err(error) = host.dispel_effect(actor, handle) {
                first_error.get_or_insert(error);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
