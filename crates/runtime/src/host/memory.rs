//! In-memory host platform for tests and local simulation.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use slowdown_core::speed::NOMINAL_SPEED;
use slowdown_core::{ActorId, Hand, RangedKind, SlowdownConfig};
use strum::IntoEnumIterator;

use super::{ActorInfo, ActorQuery, Attribute, EffectHandle, HostError, HostPlatform, SpellInfo};

/// Actor as the in-memory host sees it.
///
/// Active effects reduce `speed_mult` by their magnitude, mirroring how a
/// scripted slow effect behaves in a real host.
#[derive(Clone, Debug, PartialEq)]
pub struct SimActor {
    pub is_player: bool,
    pub in_combat: bool,
    pub attributes: HashMap<Attribute, f32>,
    pub ranged: Option<RangedKind>,
    pub left_spell: Option<SpellInfo>,
    pub right_spell: Option<SpellInfo>,
    /// False simulates an actor whose instant caster is unavailable.
    pub has_caster: bool,
    effects: HashMap<EffectHandle, f32>,
}

impl SimActor {
    /// Actor at nominal speed with every skill at 0.
    pub fn new() -> Self {
        let mut attributes: HashMap<Attribute, f32> =
            Attribute::iter().map(|attribute| (attribute, 0.0)).collect();
        attributes.insert(Attribute::SpeedMult, NOMINAL_SPEED);

        Self {
            is_player: false,
            in_combat: false,
            attributes,
            ranged: None,
            left_spell: None,
            right_spell: None,
            has_caster: true,
            effects: HashMap::new(),
        }
    }

    pub fn player() -> Self {
        Self {
            is_player: true,
            ..Self::new()
        }
    }

    pub fn in_combat(mut self) -> Self {
        self.in_combat = true;
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute, value: f32) -> Self {
        self.attributes.insert(attribute, value);
        self
    }

    pub fn with_ranged(mut self, kind: RangedKind) -> Self {
        self.ranged = Some(kind);
        self
    }

    pub fn with_spell(mut self, hand: Hand, spell: SpellInfo) -> Self {
        *self.spell_slot(hand) = Some(spell);
        self
    }

    pub fn without_caster(mut self) -> Self {
        self.has_caster = false;
        self
    }

    fn spell_slot(&mut self, hand: Hand) -> &mut Option<SpellInfo> {
        match hand {
            Hand::Left => &mut self.left_spell,
            Hand::Right => &mut self.right_spell,
        }
    }

    fn shift_speed(&mut self, delta: f32) {
        *self
            .attributes
            .entry(Attribute::SpeedMult)
            .or_insert(NOMINAL_SPEED) += delta;
    }
}

impl Default for SimActor {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe in-memory implementation of [`HostPlatform`] and
/// [`ActorQuery`].
#[derive(Default)]
pub struct InMemoryHost {
    actors: Mutex<HashMap<ActorId, SimActor>>,
    definitions: Mutex<HashSet<(String, u32)>>,
}

impl InMemoryHost {
    /// Creates a host with no actors and no effect definitions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a host that knows the four effect definitions named by
    /// `config`.
    pub fn with_config_effects(config: &SlowdownConfig) -> Self {
        let host = Self::new();
        for id in [
            config.effects.ranged,
            config.effects.casting,
            config.effects.dual_casting,
            config.effects.crossbow,
        ] {
            host.register_effect(&config.plugin_name, id);
        }
        host
    }

    pub fn register_effect(&self, plugin: &str, id: u32) {
        lock(&self.definitions).insert((plugin.to_owned(), id));
    }

    pub fn spawn(&self, id: ActorId, actor: SimActor) {
        lock(&self.actors).insert(id, actor);
    }

    /// Removes an actor, returning its last state.
    pub fn despawn(&self, id: ActorId) -> Option<SimActor> {
        lock(&self.actors).remove(&id)
    }

    pub fn actor(&self, id: ActorId) -> Option<SimActor> {
        lock(&self.actors).get(&id).cloned()
    }

    pub fn actor_ids(&self) -> Vec<ActorId> {
        let mut ids: Vec<_> = lock(&self.actors).keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Current movement speed, if the actor exists.
    pub fn speed(&self, id: ActorId) -> Option<f32> {
        self.attribute(id, Attribute::SpeedMult).ok()
    }

    /// Magnitude of an active effect on an actor.
    pub fn effect_magnitude(&self, id: ActorId, effect: EffectHandle) -> Option<f32> {
        lock(&self.actors)
            .get(&id)
            .and_then(|actor| actor.effects.get(&effect).copied())
    }

    /// Number of effects currently on an actor.
    pub fn effect_count(&self, id: ActorId) -> usize {
        lock(&self.actors)
            .get(&id)
            .map_or(0, |actor| actor.effects.len())
    }

    /// Mutates an actor in place. Returns false if it does not exist.
    pub fn update(&self, id: ActorId, f: impl FnOnce(&mut SimActor)) -> bool {
        match lock(&self.actors).get_mut(&id) {
            Some(actor) => {
                f(actor);
                true
            }
            None => false,
        }
    }

    /// Sets an attribute to an absolute value, as another game system would.
    pub fn set_attribute(&self, id: ActorId, attribute: Attribute, value: f32) -> bool {
        self.update(id, |actor| {
            actor.attributes.insert(attribute, value);
        })
    }

    pub fn select_spell(&self, id: ActorId, hand: Hand, spell: Option<SpellInfo>) -> bool {
        self.update(id, |actor| *actor.spell_slot(hand) = spell)
    }
}

impl HostPlatform for InMemoryHost {
    fn resolve_actor(&self, actor: ActorId) -> Option<ActorInfo> {
        lock(&self.actors).get(&actor).map(|sim| ActorInfo {
            id: actor,
            is_player: sim.is_player,
            in_combat: sim.in_combat,
        })
    }

    fn attribute(&self, actor: ActorId, attribute: Attribute) -> Result<f32, HostError> {
        let actors = lock(&self.actors);
        let sim = actors.get(&actor).ok_or(HostError::ActorNotFound(actor))?;
        sim.attributes
            .get(&attribute)
            .copied()
            .ok_or(HostError::AttributeUnavailable { actor, attribute })
    }

    fn modify_attribute(
        &self,
        actor: ActorId,
        attribute: Attribute,
        delta: f32,
    ) -> Result<(), HostError> {
        let mut actors = lock(&self.actors);
        let sim = actors
            .get_mut(&actor)
            .ok_or(HostError::ActorNotFound(actor))?;
        let value = sim
            .attributes
            .get_mut(&attribute)
            .ok_or(HostError::AttributeUnavailable { actor, attribute })?;
        *value += delta;
        Ok(())
    }

    fn resolve_effect(&self, plugin: &str, id: u32) -> Option<EffectHandle> {
        lock(&self.definitions)
            .contains(&(plugin.to_owned(), id))
            .then_some(EffectHandle(id))
    }

    fn apply_effect(
        &self,
        actor: ActorId,
        effect: EffectHandle,
        magnitude: f32,
    ) -> Result<(), HostError> {
        let known = lock(&self.definitions).iter().any(|(_, id)| *id == effect.0);
        if !known {
            return Err(HostError::UnknownEffect(effect));
        }

        let mut actors = lock(&self.actors);
        let sim = actors
            .get_mut(&actor)
            .ok_or(HostError::ActorNotFound(actor))?;
        if !sim.has_caster {
            return Err(HostError::NoCaster(actor));
        }

        let previous = sim.effects.insert(effect, magnitude).unwrap_or(0.0);
        sim.shift_speed(previous - magnitude);
        Ok(())
    }

    fn dispel_effect(&self, actor: ActorId, effect: EffectHandle) -> Result<(), HostError> {
        let mut actors = lock(&self.actors);
        let sim = actors
            .get_mut(&actor)
            .ok_or(HostError::ActorNotFound(actor))?;
        if let Some(magnitude) = sim.effects.remove(&effect) {
            sim.shift_speed(magnitude);
        }
        Ok(())
    }
}

impl ActorQuery for InMemoryHost {
    fn equipped_ranged(&self, actor: ActorId) -> Option<RangedKind> {
        lock(&self.actors).get(&actor).and_then(|sim| sim.ranged)
    }

    fn selected_spell(&self, actor: ActorId, hand: Hand) -> Option<SpellInfo> {
        lock(&self.actors).get(&actor).and_then(|sim| match hand {
            Hand::Left => sim.left_spell.clone(),
            Hand::Right => sim.right_spell.clone(),
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
