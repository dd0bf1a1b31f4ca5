//! Resolution of the four host effect definitions.

use slowdown_core::{EffectKind, SlowdownConfig};
use strum::IntoEnumIterator;
use tracing::{error, info};

use crate::error::{InitError, MissingEffect};
use crate::host::{EffectHandle, HostPlatform};

/// Effect definitions resolved against the host at initialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectRegistry {
    ranged: EffectHandle,
    casting: EffectHandle,
    dual_casting: EffectHandle,
    crossbow: EffectHandle,
}

impl EffectRegistry {
    /// Resolves every definition named by `config`.
    ///
    /// Each unresolved definition is logged on its own and listed in the
    /// returned error.
    pub fn resolve(host: &dyn HostPlatform, config: &SlowdownConfig) -> Result<Self, InitError> {
        let mut missing = Vec::new();
        let mut lookup = |kind: EffectKind| {
            let id = config.effects.get(kind);
            let handle = host.resolve_effect(&config.plugin_name, id);
            if handle.is_none() {
                error!(
                    target: "runtime::effects",
                    effect = %kind,
                    id = format_args!("{:#X}", id),
                    plugin = %config.plugin_name,
                    "Failed to load slowdown effect definition"
                );
                missing.push(MissingEffect { kind, id });
            }
            handle
        };

        let ranged = lookup(EffectKind::Ranged);
        let casting = lookup(EffectKind::Casting);
        let dual_casting = lookup(EffectKind::DualCasting);
        let crossbow = lookup(EffectKind::Crossbow);

        match (ranged, casting, dual_casting, crossbow) {
            (Some(ranged), Some(casting), Some(dual_casting), Some(crossbow)) => {
                info!(target: "runtime::effects", "All slowdown effect definitions loaded");
                Ok(Self {
                    ranged,
                    casting,
                    dual_casting,
                    crossbow,
                })
            }
            _ => Err(InitError::MissingEffects {
                plugin: config.plugin_name.clone(),
                missing,
            }),
        }
    }

    pub fn get(&self, kind: EffectKind) -> EffectHandle {
        match kind {
            EffectKind::Ranged => self.ranged,
            EffectKind::Casting => self.casting,
            EffectKind::DualCasting => self.dual_casting,
            EffectKind::Crossbow => self.crossbow,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (EffectKind, EffectHandle)> + '_ {
        EffectKind::iter().map(|kind| (kind, self.get(kind)))
    }
}
