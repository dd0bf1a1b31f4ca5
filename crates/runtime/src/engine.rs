//! Slowdown engine: the apply/remove/clear state machine over the store.
//!
//! Every public operation takes the store lock once and holds it until the
//! host has been told about the transition, so the visible state of an actor
//! (flags, baseline and host-side magnitude) changes atomically with respect
//! to other callers.
//!
//! Host failures are logged and swallowed after the bookkeeping has been
//! updated: a missed visual effect must not leave the state machine behind.

use std::sync::Arc;

use slowdown_core::{
    ActorId, ActorSlowState, Governing, Removal, SkillTier, SlowdownCategory, SlowdownConfig,
    speed,
};
use tracing::{debug, info, trace, warn};

use crate::effects::EffectRegistry;
use crate::error::{HostError, InitError};
use crate::host::{Attribute, HostPlatform};
use crate::realization::{self, Realizer};
use crate::service::SlowdownService;
use crate::store::StateStore;

/// Tracks and applies action slowdowns for every actor.
///
/// Built once by the composition root and shared by reference (usually
/// `Arc<SlowdownEngine>`) with whatever delivers action notifications.
pub struct SlowdownEngine {
    host: Arc<dyn HostPlatform>,
    config: Arc<SlowdownConfig>,
    effects: EffectRegistry,
    realizer: Box<dyn Realizer>,
    store: StateStore,
}

impl SlowdownEngine {
    /// Validates the configuration and resolves the four effect definitions.
    ///
    /// No engine exists if any definition is missing; each missing one is
    /// logged individually.
    pub fn initialize(
        host: Arc<dyn HostPlatform>,
        config: Arc<SlowdownConfig>,
    ) -> Result<Self, InitError> {
        config.validate()?;
        let effects = EffectRegistry::resolve(host.as_ref(), &config)?;
        let realizer = realization::for_config(config.realization, effects);

        info!(
            target: "runtime::engine",
            realization = realizer.name(),
            plugin = %config.plugin_name,
            "Slowdown engine initialized"
        );

        Ok(Self {
            host,
            config,
            effects,
            realizer,
            store: StateStore::new(),
        })
    }

    pub fn config(&self) -> &SlowdownConfig {
        &self.config
    }

    pub fn effects(&self) -> &EffectRegistry {
        &self.effects
    }

    /// Copy of an actor's current record, if tracked.
    pub fn snapshot(&self, actor: ActorId) -> Option<ActorSlowState> {
        self.store.lock().get(actor).cloned()
    }

    /// Number of actors currently tracked.
    pub fn tracked_actors(&self) -> usize {
        self.store.lock().len()
    }

    /// Multiplier for the governing overlay at its own recorded skill.
    fn multiplier(&self, governing: Governing) -> f32 {
        self.config
            .table(governing.category)
            .for_skill(governing.skill)
    }

    fn is_resolvable(&self, actor: ActorId, operation: &'static str) -> bool {
        if self.host.resolve_actor(actor).is_some() {
            return true;
        }
        debug!(
            target: "runtime::engine",
            %actor,
            operation,
            "Actor no longer resolves, ignoring"
        );
        false
    }

    fn engage(&self, actor: ActorId, state: &ActorSlowState, governing: Governing) {
        let multiplier = self.multiplier(governing);
        debug!(
            target: "runtime::engine",
            %actor,
            category = %governing.category,
            skill = governing.skill,
            tier = %SkillTier::from_skill(governing.skill),
            multiplier,
            phase = %state.phase(),
            "Engaging slowdown"
        );

        if let Err(error) =
            self.realizer
                .engage(self.host.as_ref(), actor, state, governing, multiplier)
        {
            self.report(actor, "engage", &error);
        }
    }

    fn release(&self, actor: ActorId, state: &ActorSlowState) {
        if let Err(error) = self.realizer.release(self.host.as_ref(), actor, state) {
            self.report(actor, "release", &error);
        }
    }

    fn report(&self, actor: ActorId, step: &'static str, error: &HostError) {
        warn!(
            target: "runtime::engine",
            %actor,
            step,
            realization = self.realizer.name(),
            error = %error,
            "Host call failed, state bookkeeping kept"
        );
    }
}

impl SlowdownService for SlowdownEngine {
    fn apply(&self, actor: ActorId, category: SlowdownCategory, skill: f32) {
        if !category.is_applicable() {
            warn!(
                target: "runtime::engine",
                %actor,
                %category,
                "Category is derived and cannot be applied directly"
            );
            return;
        }
        if !self.is_resolvable(actor, "apply") {
            return;
        }

        let mut states = self.store.lock();
        let host = self.host.as_ref();
        let state = states.get_or_try_insert_with(actor, || {
            match host.attribute(actor, Attribute::SpeedMult) {
                Ok(current) => Some(ActorSlowState::new(speed::baseline_offset(current))),
                Err(error) => {
                    warn!(
                        target: "runtime::engine",
                        %actor,
                        error = %error,
                        "Cannot capture speed baseline, slowdown skipped"
                    );
                    None
                }
            }
        });
        let Some(state) = state else {
            return;
        };

        if let Some(governing) = state.apply(category, skill, self.config.enable_dual_cast) {
            if governing.category == SlowdownCategory::CastDual {
                debug!(target: "runtime::engine", %actor, "Dual casting detected");
            }
            self.engage(actor, state, governing);
        }
    }

    fn remove(&self, actor: ActorId, category: SlowdownCategory) {
        let mut states = self.store.lock();
        let Some(state) = states.get_mut(actor) else {
            return;
        };
        if !self.is_resolvable(actor, "remove") {
            return;
        }

        match state.remove(category, self.config.enable_dual_cast) {
            Removal::Remaining(governing) => self.engage(actor, state, governing),
            Removal::Cleared => {
                self.release(actor, state);
                states.erase(actor);
                debug!(target: "runtime::engine", %actor, "Removed all slowdowns for actor");
            }
            Removal::Unchanged => {
                trace!(target: "runtime::engine", %actor, %category, "Category was not active");
            }
        }
    }

    fn clear_one(&self, actor: ActorId) {
        let mut states = self.store.lock();
        if states.get(actor).is_none() || !self.is_resolvable(actor, "clear_one") {
            return;
        }

        if let Some(state) = states.erase(actor) {
            self.release(actor, &state);
            debug!(target: "runtime::engine", %actor, "Cleared all slowdowns for actor");
        }
    }

    fn clear_all(&self) {
        let mut states = self.store.lock();
        let drained = states.drain();
        let count = drained.len();

        for (actor, state) in drained {
            if self.host.resolve_actor(actor).is_some() {
                self.release(actor, &state);
            } else {
                debug!(target: "runtime::engine", %actor, "Dropping record of unloaded actor");
            }
        }

        debug!(target: "runtime::engine", count, "Cleared all slowdowns for all actors");
    }

    fn is_actor_slowed(&self, actor: ActorId) -> bool {
        self.store
            .lock()
            .get(actor)
            .is_some_and(ActorSlowState::is_active)
    }
}
