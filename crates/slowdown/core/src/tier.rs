//! Skill tiers and multiplier tables.
//!
//! A continuous skill value is bucketed into one of four tiers with inclusive
//! upper thresholds:
//!
//! | skill        | tier | name       |
//! |--------------|------|------------|
//! | `<= 25`      | 0    | Novice     |
//! | `<= 50`      | 1    | Apprentice |
//! | `<= 75`      | 2    | Expert     |
//! | `> 75`       | 3    | Master     |
//!
//! The tier indexes a 4-entry multiplier table supplied by configuration.
//! Everything here is a pure function of its inputs.

/// Skill band used to pick a multiplier.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum SkillTier {
    Novice = 0,
    Apprentice = 1,
    Expert = 2,
    Master = 3,
}

impl SkillTier {
    const NOVICE_MAX: f32 = 25.0;
    const APPRENTICE_MAX: f32 = 50.0;
    const EXPERT_MAX: f32 = 75.0;

    /// Buckets a skill value. NaN lands in the lowest tier.
    pub fn from_skill(skill: f32) -> Self {
        if skill.is_nan() || skill <= Self::NOVICE_MAX {
            Self::Novice
        } else if skill <= Self::APPRENTICE_MAX {
            Self::Apprentice
        } else if skill <= Self::EXPERT_MAX {
            Self::Expert
        } else {
            Self::Master
        }
    }

    /// Table index of this tier (0..=3).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Numeric tier of a skill value (0..=3).
pub fn tier(skill: f32) -> usize {
    SkillTier::from_skill(skill).index()
}

/// Speed multipliers per skill tier, Novice first.
///
/// A multiplier of `0.6` means the actor moves at 60% of its baseline speed.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MultiplierTable(pub [f32; 4]);

impl MultiplierTable {
    /// Bow, crossbow and single-hand casting defaults.
    pub const SINGLE: Self = Self([0.5, 0.6, 0.7, 0.8]);

    /// Dual-casting defaults.
    pub const DUAL: Self = Self([0.4, 0.5, 0.6, 0.7]);

    #[inline]
    pub const fn get(&self, tier: SkillTier) -> f32 {
        self.0[tier.index()]
    }

    /// Multiplier for a raw skill value.
    #[inline]
    pub fn for_skill(&self, skill: f32) -> f32 {
        self.get(SkillTier::from_skill(skill))
    }

    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.0.iter().copied()
    }
}

impl Default for MultiplierTable {
    fn default() -> Self {
        Self::SINGLE
    }
}
