//! Host platform boundary.
//!
//! The tracker never owns actors or effects. Everything it does to the world
//! goes through [`HostPlatform`], which the embedding application implements
//! over its engine. [`InMemoryHost`] is a complete implementation used by the
//! tests and the simulation binary.
//!
//! [`ActorQuery`] is a second, narrower capability used only by the trigger
//! front end to look at an actor's loadout.
mod memory;

pub use memory::{InMemoryHost, SimActor};

use slowdown_core::{ActorId, RangedKind};

use crate::error::HostError;

/// Numeric actor attributes the tracker reads or modifies.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Attribute {
    /// Movement speed in percent of nominal.
    SpeedMult,
    Archery,
    Destruction,
    Restoration,
    Alteration,
    Conjuration,
    Illusion,
}

impl Attribute {
    /// The five magic schools, averaged for spells without a school.
    pub const MAGIC_SCHOOLS: [Self; 5] = [
        Self::Destruction,
        Self::Restoration,
        Self::Alteration,
        Self::Conjuration,
        Self::Illusion,
    ];
}

/// Host-side handle of a resolved effect definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EffectHandle(pub u32);

/// What the host knows about a live actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActorInfo {
    pub id: ActorId,
    pub is_player: bool,
    pub in_combat: bool,
}

/// Capabilities the slowdown engine needs from the host.
///
/// Implementations must be callable from any thread. The engine calls them
/// while holding its state lock, so they must not call back into the engine.
pub trait HostPlatform: Send + Sync {
    /// Resolves a stable id to a live actor, or `None` if it is gone.
    fn resolve_actor(&self, actor: ActorId) -> Option<ActorInfo>;

    /// Reads the current value of an attribute.
    fn attribute(&self, actor: ActorId, attribute: Attribute) -> Result<f32, HostError>;

    /// Applies a signed modifier to an attribute.
    ///
    /// This is a relative change so that concurrent modifications by other
    /// systems are kept.
    fn modify_attribute(
        &self,
        actor: ActorId,
        attribute: Attribute,
        delta: f32,
    ) -> Result<(), HostError>;

    /// Resolves an effect definition owned by `plugin`.
    fn resolve_effect(&self, plugin: &str, id: u32) -> Option<EffectHandle>;

    /// Applies an effect definition with an overridden magnitude, replacing
    /// any instance of the same definition already on the actor.
    fn apply_effect(
        &self,
        actor: ActorId,
        effect: EffectHandle,
        magnitude: f32,
    ) -> Result<(), HostError>;

    /// Dispels an effect definition. Dispelling an absent effect succeeds.
    fn dispel_effect(&self, actor: ActorId, effect: EffectHandle) -> Result<(), HostError>;
}

/// Spell selected in one hand.
#[derive(Clone, Debug, PartialEq)]
pub struct SpellInfo {
    pub name: String,
    /// Skill the spell trains, or `None` for school-less spells.
    pub school: Option<Attribute>,
    /// True if one of the spell's effects already changes movement speed.
    pub modifies_speed: bool,
}

impl SpellInfo {
    pub fn new(name: impl Into<String>, school: Option<Attribute>) -> Self {
        Self {
            name: name.into(),
            school,
            modifies_speed: false,
        }
    }

    pub fn modifying_speed(mut self) -> Self {
        self.modifies_speed = true;
        self
    }
}

/// Loadout lookups used by the trigger front end.
pub trait ActorQuery: Send + Sync {
    /// Ranged weapon currently equipped, if any.
    fn equipped_ranged(&self, actor: ActorId) -> Option<RangedKind>;

    /// Spell selected in `hand`, if any.
    fn selected_spell(&self, actor: ActorId, hand: slowdown_core::Hand) -> Option<SpellInfo>;
}
