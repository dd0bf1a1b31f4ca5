//! Front end that turns action notifications into slowdown operations.
//!
//! The host reports what an actor is doing as an [`AnimationTrigger`]; the
//! [`TriggerRouter`] decides whether the trigger concerns the tracker at all,
//! gathers the skill that governs the slowdown, and forwards a single
//! operation to the [`SlowdownService`].

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use slowdown_core::{ActorId, Hand, SlowdownCategory, SlowdownConfig};
use tracing::{debug, trace, warn};

use crate::error::{HostError, ParseTriggerError};
use crate::host::{ActorInfo, ActorQuery, Attribute, HostPlatform, SpellInfo};
use crate::service::SlowdownService;

/// Semantic action notifications the tracker reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationTrigger {
    /// A ranged weapon reached full draw.
    BowDrawn,
    /// The drawn projectile was released.
    BowReleased,
    /// A hand started casting.
    BeginCast(Hand),
    /// Casting finished normally.
    CastStopped,
    /// Casting was cut short or released early.
    CastInterrupted,
    AttackStopped,
    WeaponSheathed,
}

impl AnimationTrigger {
    pub const ALL: [Self; 8] = [
        Self::BowDrawn,
        Self::BowReleased,
        Self::BeginCast(Hand::Left),
        Self::BeginCast(Hand::Right),
        Self::CastStopped,
        Self::CastInterrupted,
        Self::AttackStopped,
        Self::WeaponSheathed,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BowDrawn => "bow-drawn",
            Self::BowReleased => "bow-released",
            Self::BeginCast(Hand::Left) => "begin-cast-left",
            Self::BeginCast(Hand::Right) => "begin-cast-right",
            Self::CastStopped => "cast-stopped",
            Self::CastInterrupted => "cast-interrupted",
            Self::AttackStopped => "attack-stopped",
            Self::WeaponSheathed => "weapon-sheathed",
        }
    }
}

impl fmt::Display for AnimationTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnimationTrigger {
    type Err = ParseTriggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|trigger| trigger.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseTriggerError(s.to_owned()))
    }
}

/// Applies configuration gating and forwards triggers to the service.
pub struct TriggerRouter {
    service: Arc<dyn SlowdownService>,
    host: Arc<dyn HostPlatform>,
    query: Arc<dyn ActorQuery>,
    config: Arc<SlowdownConfig>,
}

impl TriggerRouter {
    pub fn new(
        service: Arc<dyn SlowdownService>,
        host: Arc<dyn HostPlatform>,
        query: Arc<dyn ActorQuery>,
        config: Arc<SlowdownConfig>,
    ) -> Self {
        Self {
            service,
            host,
            query,
            config,
        }
    }

    /// Handles one trigger for one actor.
    pub fn handle(&self, actor: ActorId, trigger: AnimationTrigger) {
        if !self.config.enabled {
            return;
        }
        let Some(info) = self.host.resolve_actor(actor) else {
            trace!(target: "runtime::router", %actor, %trigger, "Trigger for unknown actor");
            return;
        };
        if !info.is_player && !(self.config.apply_to_npcs && info.in_combat) {
            return;
        }

        trace!(
            target: "runtime::router",
            %actor,
            %trigger,
            player = info.is_player,
            "Routing trigger"
        );

        match trigger {
            AnimationTrigger::BowDrawn => self.on_bow_drawn(info),
            AnimationTrigger::BowReleased => {
                self.service.remove(actor, SlowdownCategory::RangedBow);
                self.service.remove(actor, SlowdownCategory::RangedCrossbow);
            }
            AnimationTrigger::BeginCast(hand) => self.on_begin_cast(info, hand),
            AnimationTrigger::CastStopped => self.release_casts(actor),
            AnimationTrigger::CastInterrupted => {
                if self.service.is_actor_slowed(actor) {
                    debug!(target: "runtime::router", %actor, "Cast interrupted");
                    self.release_casts(actor);
                }
            }
            AnimationTrigger::AttackStopped | AnimationTrigger::WeaponSheathed => {
                if self.service.is_actor_slowed(actor) {
                    debug!(target: "runtime::router", %actor, %trigger, "Clearing slowdowns");
                    self.service.clear_one(actor);
                }
            }
        }
    }

    /// Whether a slowdown may begin on this actor.
    ///
    /// With `casting_npcs_only` the player is never slowed; otherwise NPCs
    /// additionally need `apply_to_npcs`.
    fn admits(&self, info: ActorInfo) -> bool {
        if self.config.casting_npcs_only {
            !info.is_player
        } else {
            info.is_player || self.config.apply_to_npcs
        }
    }

    fn on_bow_drawn(&self, info: ActorInfo) {
        if !self.admits(info) {
            trace!(target: "runtime::router", actor = %info.id, "Ranged slowdown not admitted");
            return;
        }

        let kind = self.query.equipped_ranged(info.id).unwrap_or_default();
        let category = kind.category();
        if !self.config.is_category_enabled(category) {
            debug!(target: "runtime::router", %category, "Category disabled in config");
            return;
        }

        match self.host.attribute(info.id, Attribute::Archery) {
            Ok(skill) => {
                debug!(target: "runtime::router", actor = %info.id, %kind, skill, "Ranged draw");
                self.service.apply(info.id, category, skill);
            }
            Err(error) => self.skill_unavailable(info.id, category, &error),
        }
    }

    fn on_begin_cast(&self, info: ActorInfo, hand: Hand) {
        let category = hand.category();
        if !self.config.is_category_enabled(category) || !self.admits(info) {
            return;
        }

        let Some(spell) = self.query.selected_spell(info.id, hand) else {
            debug!(target: "runtime::router", actor = %info.id, %hand, "No spell in hand");
            return;
        };
        if spell.modifies_speed {
            debug!(
                target: "runtime::router",
                actor = %info.id,
                spell = %spell.name,
                "Spell modifies speed, slowdown skipped"
            );
            return;
        }

        match self.magic_skill(info.id, &spell) {
            Ok(skill) => {
                debug!(
                    target: "runtime::router",
                    actor = %info.id,
                    %hand,
                    spell = %spell.name,
                    skill,
                    "Cast began"
                );
                self.service.apply(info.id, category, skill);
            }
            Err(error) => self.skill_unavailable(info.id, category, &error),
        }
    }

    /// The spell's school skill, or the mean of every school for school-less
    /// spells.
    fn magic_skill(&self, actor: ActorId, spell: &SpellInfo) -> Result<f32, HostError> {
        match spell.school {
            Some(school) => self.host.attribute(actor, school),
            None => {
                let total = Attribute::MAGIC_SCHOOLS
                    .iter()
                    .map(|school| self.host.attribute(actor, *school))
                    .sum::<Result<f32, _>>()?;
                Ok(total / Attribute::MAGIC_SCHOOLS.len() as f32)
            }
        }
    }

    fn release_casts(&self, actor: ActorId) {
        self.service.remove(actor, SlowdownCategory::CastLeft);
        self.service.remove(actor, SlowdownCategory::CastRight);
        self.service.remove(actor, SlowdownCategory::CastDual);
    }

    fn skill_unavailable(&self, actor: ActorId, category: SlowdownCategory, error: &HostError) {
        warn!(
            target: "runtime::router",
            %actor,
            %category,
            error = %error,
            "Cannot read governing skill, slowdown skipped"
        );
    }
}

#[cfg(test)]
mod tests {
    use slowdown_core::RangedKind;

    use super::*;
    use crate::engine::SlowdownEngine;
    use crate::host::{InMemoryHost, SimActor};

    fn setup(config: SlowdownConfig) -> (Arc<InMemoryHost>, Arc<SlowdownEngine>, TriggerRouter) {
        let config = Arc::new(config);
        let host = Arc::new(InMemoryHost::with_config_effects(&config));
        let engine = Arc::new(SlowdownEngine::initialize(host.clone(), config.clone()).unwrap());
        let router = TriggerRouter::new(engine.clone(), host.clone(), host.clone(), config);
        (host, engine, router)
    }

    fn speed(host: &InMemoryHost, actor: ActorId) -> f32 {
        host.speed(actor).unwrap()
    }

    fn npc_config() -> SlowdownConfig {
        SlowdownConfig {
            apply_to_npcs: true,
            ..SlowdownConfig::default()
        }
    }

    #[test]
    fn triggers_parse_case_insensitively() {
        assert_eq!(
            "Begin-Cast-Left".parse::<AnimationTrigger>(),
            Ok(AnimationTrigger::BeginCast(Hand::Left))
        );
        for trigger in AnimationTrigger::ALL {
            assert_eq!(trigger.to_string().parse::<AnimationTrigger>(), Ok(trigger));
        }
        assert_eq!(
            "bowRelease".parse::<AnimationTrigger>(),
            Err(ParseTriggerError("bowRelease".to_owned()))
        );
    }

    #[test]
    fn player_bow_draw_and_release() {
        let (host, engine, router) = setup(SlowdownConfig::default());
        let player = ActorId::PLAYER;
        host.spawn(
            player,
            SimActor::player().with_attribute(Attribute::Archery, 40.0),
        );

        router.handle(player, AnimationTrigger::BowDrawn);
        assert!((speed(&host, player) - 60.0).abs() < 1e-4);

        router.handle(player, AnimationTrigger::BowReleased);
        assert!((speed(&host, player) - 100.0).abs() < 1e-4);
        assert!(!engine.is_actor_slowed(player));
    }

    #[test]
    fn crossbow_uses_crossbow_category_and_flag() {
        let config = SlowdownConfig {
            enable_crossbow: false,
            ..SlowdownConfig::default()
        };
        let (host, engine, router) = setup(config);
        let player = ActorId::PLAYER;
        host.spawn(
            player,
            SimActor::player()
                .with_ranged(RangedKind::Crossbow)
                .with_attribute(Attribute::Archery, 90.0),
        );

        router.handle(player, AnimationTrigger::BowDrawn);
        assert!(!engine.is_actor_slowed(player));

        host.update(player, |actor| actor.ranged = Some(RangedKind::Bow));
        router.handle(player, AnimationTrigger::BowDrawn);
        assert_eq!(
            engine.snapshot(player).map(|state| state.ranged_kind()),
            Some(RangedKind::Bow)
        );
    }

    #[test]
    fn npcs_need_opt_in_and_combat() {
        let (host, engine, router) = setup(SlowdownConfig::default());
        let npc = ActorId(0x100);
        host.spawn(npc, SimActor::new().in_combat());
        router.handle(npc, AnimationTrigger::BowDrawn);
        assert!(!engine.is_actor_slowed(npc));

        let (host, engine, router) = setup(npc_config());
        host.spawn(npc, SimActor::new());
        router.handle(npc, AnimationTrigger::BowDrawn);
        assert!(!engine.is_actor_slowed(npc));

        host.update(npc, |actor| actor.in_combat = true);
        router.handle(npc, AnimationTrigger::BowDrawn);
        assert!(engine.is_actor_slowed(npc));
    }

    #[test]
    fn casting_npcs_only_skips_player() {
        let config = SlowdownConfig {
            casting_npcs_only: true,
            ..npc_config()
        };
        let (host, engine, router) = setup(config);
        let spell = SpellInfo::new("Flames", Some(Attribute::Destruction));
        host.spawn(
            ActorId::PLAYER,
            SimActor::player().with_spell(Hand::Left, spell.clone()),
        );
        host.spawn(
            ActorId(0x200),
            SimActor::new().in_combat().with_spell(Hand::Left, spell),
        );

        router.handle(ActorId::PLAYER, AnimationTrigger::BeginCast(Hand::Left));
        router.handle(ActorId(0x200), AnimationTrigger::BeginCast(Hand::Left));

        assert!(!engine.is_actor_slowed(ActorId::PLAYER));
        assert!(engine.is_actor_slowed(ActorId(0x200)));
    }

    #[test]
    fn speed_modifying_spells_are_skipped() {
        let (host, engine, router) = setup(SlowdownConfig::default());
        let player = ActorId::PLAYER;
        host.spawn(
            player,
            SimActor::player().with_spell(
                Hand::Right,
                SpellInfo::new("Slow Time", Some(Attribute::Alteration)).modifying_speed(),
            ),
        );

        router.handle(player, AnimationTrigger::BeginCast(Hand::Right));
        router.handle(player, AnimationTrigger::BeginCast(Hand::Left));
        assert!(!engine.is_actor_slowed(player));
    }

    #[test]
    fn schoolless_spell_uses_mean_of_schools() {
        let (host, _engine, router) = setup(SlowdownConfig::default());
        let player = ActorId::PLAYER;
        // Mean of 100, 100, 100, 0, 0 is 60: expert tier, multiplier 0.7.
        host.spawn(
            player,
            SimActor::player()
                .with_attribute(Attribute::Destruction, 100.0)
                .with_attribute(Attribute::Restoration, 100.0)
                .with_attribute(Attribute::Alteration, 100.0)
                .with_spell(Hand::Left, SpellInfo::new("Power", None)),
        );

        router.handle(player, AnimationTrigger::BeginCast(Hand::Left));
        assert!((speed(&host, player) - 70.0).abs() < 1e-4);
    }

    #[test]
    fn cast_stop_releases_dual_cast() {
        let (host, engine, router) = setup(SlowdownConfig::default());
        let player = ActorId::PLAYER;
        let spell = SpellInfo::new("Healing", Some(Attribute::Restoration));
        host.spawn(
            player,
            SimActor::player()
                .with_spell(Hand::Left, spell.clone())
                .with_spell(Hand::Right, spell),
        );

        router.handle(player, AnimationTrigger::BeginCast(Hand::Left));
        router.handle(player, AnimationTrigger::BeginCast(Hand::Right));
        assert!(engine.snapshot(player).unwrap().is_dual_active());
        assert!((speed(&host, player) - 40.0).abs() < 1e-4);

        router.handle(player, AnimationTrigger::CastStopped);
        assert!(!engine.is_actor_slowed(player));
        assert!((speed(&host, player) - 100.0).abs() < 1e-4);
    }

    #[test]
    fn stop_triggers_only_act_on_slowed_actors() {
        let (host, engine, router) = setup(SlowdownConfig::default());
        let player = ActorId::PLAYER;
        host.spawn(player, SimActor::player());

        router.handle(player, AnimationTrigger::AttackStopped);
        router.handle(player, AnimationTrigger::CastInterrupted);
        assert_eq!(engine.tracked_actors(), 0);

        router.handle(player, AnimationTrigger::BowDrawn);
        assert!(engine.is_actor_slowed(player));
        router.handle(player, AnimationTrigger::WeaponSheathed);
        assert!(!engine.is_actor_slowed(player));
        assert!((speed(&host, player) - 100.0).abs() < 1e-4);
    }

    #[test]
    fn master_switch_disables_everything() {
        let config = SlowdownConfig {
            enabled: false,
            ..SlowdownConfig::default()
        };
        let (host, engine, router) = setup(config);
        host.spawn(ActorId::PLAYER, SimActor::player());

        router.handle(ActorId::PLAYER, AnimationTrigger::BowDrawn);
        assert!(!engine.is_actor_slowed(ActorId::PLAYER));
    }
}
