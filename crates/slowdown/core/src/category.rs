//! Slowdown categories and the effect definitions they map to.
//!
//! A category names the action that slows an actor down. Bow and crossbow
//! share a single state flag but keep separate multiplier tables and effect
//! definitions, so the category is kept distinct all the way to the host.

use std::fmt;

use crate::state::SlowFlags;

/// Unique identifier for an actor known to the host platform.
///
/// The value is opaque to the tracker; it only needs to be stable for as long
/// as the actor exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorId(pub u32);

impl ActorId {
    /// Conventional identifier the in-memory host uses for the player.
    pub const PLAYER: Self = Self(0x14);
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#X}", self.0)
    }
}

/// The action type that triggered a slowdown.
///
/// `CastDual` is never applied by callers. It is derived whenever both hands
/// are casting and supersedes the single-hand categories for magnitude.
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
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum SlowdownCategory {
    RangedBow,
    RangedCrossbow,
    CastLeft,
    CastRight,
    CastDual,
}

impl SlowdownCategory {
    /// Returns true for the two ranged categories.
    pub const fn is_ranged(self) -> bool {
        matches!(self, Self::RangedBow | Self::RangedCrossbow)
    }

    /// Returns true for the categories a caller may apply directly.
    pub const fn is_applicable(self) -> bool {
        !matches!(self, Self::CastDual)
    }

    /// State flags governed by this category.
    ///
    /// Both ranged categories share [`SlowFlags::RANGED`]. Clearing
    /// `CastDual` clears both hands, since dual casting cannot outlive either
    /// of them.
    pub const fn flags(self) -> SlowFlags {
        match self {
            Self::RangedBow | Self::RangedCrossbow => SlowFlags::RANGED,
            Self::CastLeft => SlowFlags::CAST_LEFT,
            Self::CastRight => SlowFlags::CAST_RIGHT,
            Self::CastDual => SlowFlags::CAST_LEFT
                .union(SlowFlags::CAST_RIGHT)
                .union(SlowFlags::DUAL),
        }
    }

    /// Host effect definition used when this category governs the slowdown.
    pub const fn effect(self) -> EffectKind {
        match self {
            Self::RangedBow => EffectKind::Ranged,
            Self::RangedCrossbow => EffectKind::Crossbow,
            Self::CastLeft | Self::CastRight => EffectKind::Casting,
            Self::CastDual => EffectKind::DualCasting,
        }
    }
}

/// Which ranged weapon is drawn.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RangedKind {
    #[default]
    Bow,
    Crossbow,
}

impl RangedKind {
    pub const fn category(self) -> SlowdownCategory {
        match self {
            Self::Bow => SlowdownCategory::RangedBow,
            Self::Crossbow => SlowdownCategory::RangedCrossbow,
        }
    }
}

/// Casting hand.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub const fn category(self) -> SlowdownCategory {
        match self {
            Self::Left => SlowdownCategory::CastLeft,
            Self::Right => SlowdownCategory::CastRight,
        }
    }
}

/// The four effect definitions the host must provide.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EffectKind {
    Ranged,
    Casting,
    DualCasting,
    Crossbow,
}
