use slowdown_core::{ActorId, ActorSlowState, Governing, speed};

use super::Realizer;
use crate::error::HostError;
use crate::host::{Attribute, HostPlatform};

/// Steers the speed attribute to an absolute target with one relative
/// modifier per transition.
///
/// Targets are recomputed from the captured baseline every time rather than
/// accumulated, so any number of transitions lands on the same value.
#[derive(Clone, Copy, Debug, Default)]
pub struct AttributeDelta;

impl AttributeDelta {
    fn steer(host: &dyn HostPlatform, actor: ActorId, target: f32) -> Result<(), HostError> {
        let current = host.attribute(actor, Attribute::SpeedMult)?;
        if let Some(delta) = speed::delta_to(target, current) {
            host.modify_attribute(actor, Attribute::SpeedMult, delta)?;
        }
        Ok(())
    }
}

impl Realizer for AttributeDelta {
    fn name(&self) -> &'static str {
        "attribute_delta"
    }

    fn engage(
        &self,
        host: &dyn HostPlatform,
        actor: ActorId,
        state: &ActorSlowState,
        _governing: Governing,
        multiplier: f32,
    ) -> Result<(), HostError> {
        let target = speed::slowed_target(multiplier, state.baseline_offset());
        Self::steer(host, actor, target)
    }

    fn release(
        &self,
        host: &dyn HostPlatform,
        actor: ActorId,
        state: &ActorSlowState,
    ) -> Result<(), HostError> {
        let target = speed::restored_target(state.baseline_offset());
        Self::steer(host, actor, target)
    }
}
