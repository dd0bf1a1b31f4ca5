//! Per-actor slowdown state machine.
//!
//! Every actor under at least one slowdown has an [`ActorSlowState`]. It
//! records which overlays are active, the skill each overlay was applied with
//! and the speed baseline captured when tracking started.
//!
//! # Phases
//!
//! ```text
//! Idle ──apply──▶ SingleActive ──apply other hand──▶ DualCastActive
//!  ▲                  │  ▲                                  │
//!  └────remove last───┘  └──────────remove a hand───────────┘
//! ```
//!
//! Ranged and casting overlays are independent; only the two hands combine
//! into the dual overlay. The governing overlay after a removal is chosen in
//! priority order ranged → dual → left hand → right hand and always uses that
//! overlay's own recorded skill.

mod flags;

pub use flags::SlowFlags;

use crate::category::{RangedKind, SlowdownCategory};

/// Coarse phase of an actor's slowdown, used for logging and assertions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum SlowPhase {
    Idle,
    SingleActive,
    DualCastActive,
}

/// The overlay that decides the magnitude, with the skill it was applied at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Governing {
    pub category: SlowdownCategory,
    pub skill: f32,
}

/// Outcome of clearing a category.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Removal {
    /// Some overlay is still active; its magnitude must be recomputed.
    Remaining(Governing),
    /// Nothing is left; the actor must be restored and forgotten.
    Cleared,
    /// The category was not active; nothing changed and the host must not
    /// be touched.
    Unchanged,
}

/// Skill values recorded per overlay at their latest apply.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct OverlaySkills {
    ranged: f32,
    left: f32,
    right: f32,
    dual: f32,
}

/// Slowdown bookkeeping for one actor.
#[derive(Clone, Debug, PartialEq)]
pub struct ActorSlowState {
    flags: SlowFlags,
    ranged_kind: RangedKind,
    baseline_offset: f32,
    skills: OverlaySkills,
}

impl ActorSlowState {
    /// Creates an idle record with the baseline captured from the actor's
    /// speed at the moment tracking begins.
    pub fn new(baseline_offset: f32) -> Self {
        Self {
            flags: SlowFlags::empty(),
            ranged_kind: RangedKind::default(),
            baseline_offset,
            skills: OverlaySkills::default(),
        }
    }

    pub fn flags(&self) -> SlowFlags {
        self.flags
    }

    pub fn baseline_offset(&self) -> f32 {
        self.baseline_offset
    }

    /// Ranged weapon of the latest ranged apply.
    pub fn ranged_kind(&self) -> RangedKind {
        self.ranged_kind
    }

    /// Returns true if any overlay is active.
    pub fn is_active(&self) -> bool {
        !self.flags.is_empty()
    }

    pub fn is_ranged_active(&self) -> bool {
        self.flags.contains(SlowFlags::RANGED)
    }

    pub fn is_cast_left_active(&self) -> bool {
        self.flags.contains(SlowFlags::CAST_LEFT)
    }

    pub fn is_cast_right_active(&self) -> bool {
        self.flags.contains(SlowFlags::CAST_RIGHT)
    }

    pub fn is_dual_active(&self) -> bool {
        self.flags.contains(SlowFlags::DUAL)
    }

    pub fn phase(&self) -> SlowPhase {
        if self.is_dual_active() {
            SlowPhase::DualCastActive
        } else if self.is_active() {
            SlowPhase::SingleActive
        } else {
            SlowPhase::Idle
        }
    }

    /// Activates `category` at `skill` and returns the overlay that now
    /// decides the magnitude.
    ///
    /// When both hands end up casting, the result is `CastDual` at the
    /// triggering skill, overriding the caller's category. With
    /// `dual_enabled` off the caller's category stands. Returns `None` for
    /// `CastDual`, which callers cannot apply.
    ///
    /// The result depends on the order of applies, not only on the flags:
    /// the latest apply decides the magnitude even when a higher-priority
    /// overlay is active. [`governing`](Self::governing) is only consulted
    /// after a removal.
    pub fn apply(
        &mut self,
        category: SlowdownCategory,
        skill: f32,
        dual_enabled: bool,
    ) -> Option<Governing> {
        match category {
            SlowdownCategory::RangedBow => {
                self.ranged_kind = RangedKind::Bow;
                self.skills.ranged = skill;
            }
            SlowdownCategory::RangedCrossbow => {
                self.ranged_kind = RangedKind::Crossbow;
                self.skills.ranged = skill;
            }
            SlowdownCategory::CastLeft => self.skills.left = skill,
            SlowdownCategory::CastRight => self.skills.right = skill,
            SlowdownCategory::CastDual => return None,
        }

        self.flags = (self.flags | category.flags()).with_derived_dual();

        if self.is_dual_active() && !category.is_ranged() {
            self.skills.dual = skill;
            if dual_enabled {
                return Some(Governing {
                    category: SlowdownCategory::CastDual,
                    skill,
                });
            }
        }

        Some(Governing { category, skill })
    }

    /// Clears `category` and reports what remains.
    ///
    /// Either ranged category clears the shared ranged overlay. `CastDual`
    /// clears both hands. Removing an inactive category returns
    /// [`Removal::Unchanged`].
    pub fn remove(&mut self, category: SlowdownCategory, dual_enabled: bool) -> Removal {
        if !self.flags.intersects(category.flags()) {
            return Removal::Unchanged;
        }
        self.flags = self.flags.difference(category.flags()).with_derived_dual();

        match self.governing(dual_enabled) {
            Some(governing) => Removal::Remaining(governing),
            None => Removal::Cleared,
        }
    }

    /// Overlay that takes over after a removal, in priority order
    /// ranged → dual → left hand → right hand.
    ///
    /// This can differ from the overlay the latest apply engaged, since an
    /// apply always governs with the caller's category.
    pub fn governing(&self, dual_enabled: bool) -> Option<Governing> {
        if self.is_ranged_active() {
            return Some(Governing {
                category: self.ranged_kind.category(),
                skill: self.skills.ranged,
            });
        }
        if self.is_dual_active() && dual_enabled {
            return Some(Governing {
                category: SlowdownCategory::CastDual,
                skill: self.skills.dual,
            });
        }
        if self.is_cast_left_active() {
            return Some(Governing {
                category: SlowdownCategory::CastLeft,
                skill: self.skills.left,
            });
        }
        if self.is_cast_right_active() {
            return Some(Governing {
                category: SlowdownCategory::CastRight,
                skill: self.skills.right,
            });
        }
        None
    }
}
