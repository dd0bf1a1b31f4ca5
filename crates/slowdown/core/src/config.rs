//! Slowdown configuration: feature switches, multiplier tables and the host
//! effect definitions to use.
//!
//! The engine treats this as read-only. Loading and saving live in
//! `slowdown-content`.
use crate::category::{EffectKind, SlowdownCategory};
use crate::error::ConfigError;
use crate::tier::{MultiplierTable, SkillTier};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SlowdownConfig {
    /// Master switch for the trigger front end.
    pub enabled: bool,
    /// Whether non-player actors in combat are slowed at all.
    pub apply_to_npcs: bool,
    /// When set, ranged and casting slowdowns skip the player and apply to
    /// NPCs only.
    pub casting_npcs_only: bool,
    /// 0 = trace, 1 = debug, 2 = info, 3 = warn, 4 = error, 5 = critical.
    pub log_level: u8,

    pub enable_bow: bool,
    pub enable_crossbow: bool,
    pub enable_cast: bool,
    /// When off, two casting hands keep the single-hand casting table and
    /// effect instead of switching to dual casting.
    pub enable_dual_cast: bool,

    pub bow_multipliers: MultiplierTable,
    pub crossbow_multipliers: MultiplierTable,
    pub cast_multipliers: MultiplierTable,
    pub dual_cast_multipliers: MultiplierTable,

    /// Plugin that owns the effect definitions.
    pub plugin_name: String,
    pub effects: EffectIds,
    pub realization: Realization,
}

/// Host identifiers of the four effect definitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EffectIds {
    pub ranged: u32,
    pub casting: u32,
    pub dual_casting: u32,
    pub crossbow: u32,
}

impl EffectIds {
    pub const fn get(&self, kind: EffectKind) -> u32 {
        match kind {
            EffectKind::Ranged => self.ranged,
            EffectKind::Casting => self.casting,
            EffectKind::DualCasting => self.dual_casting,
            EffectKind::Crossbow => self.crossbow,
        }
    }
}

impl Default for EffectIds {
    fn default() -> Self {
        Self {
            ranged: 0x801,
            casting: 0x805,
            dual_casting: 0x806,
            crossbow: 0x807,
        }
    }
}

/// How a computed multiplier reaches the host platform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum Realization {
    /// Modify the speed attribute directly by a tracked delta.
    #[default]
    AttributeDelta,
    /// Cast a scripted effect definition with an overridden magnitude.
    ScriptedEffect,
}

impl SlowdownConfig {
    pub const DEFAULT_PLUGIN: &'static str = "SigaNG.esp";
    pub const DEFAULT_LOG_LEVEL: u8 = 2;
    pub const MAX_LOG_LEVEL: u8 = 5;

    pub fn new() -> Self {
        Self {
            enabled: true,
            apply_to_npcs: false,
            casting_npcs_only: false,
            log_level: Self::DEFAULT_LOG_LEVEL,
            enable_bow: true,
            enable_crossbow: true,
            enable_cast: true,
            enable_dual_cast: true,
            bow_multipliers: MultiplierTable::SINGLE,
            crossbow_multipliers: MultiplierTable::SINGLE,
            cast_multipliers: MultiplierTable::SINGLE,
            dual_cast_multipliers: MultiplierTable::DUAL,
            plugin_name: Self::DEFAULT_PLUGIN.to_owned(),
            effects: EffectIds::default(),
            realization: Realization::default(),
        }
    }

    pub fn with_realization(mut self, realization: Realization) -> Self {
        self.realization = realization;
        self
    }

    /// Multiplier table for a category.
    pub const fn table(&self, category: SlowdownCategory) -> &MultiplierTable {
        match category {
            SlowdownCategory::RangedBow => &self.bow_multipliers,
            SlowdownCategory::RangedCrossbow => &self.crossbow_multipliers,
            SlowdownCategory::CastLeft | SlowdownCategory::CastRight => &self.cast_multipliers,
            SlowdownCategory::CastDual => &self.dual_cast_multipliers,
        }
    }

    /// `multiplier(category, tier)`.
    pub const fn multiplier(&self, category: SlowdownCategory, tier: SkillTier) -> f32 {
        self.table(category).get(tier)
    }

    /// Whether the front end should react to a category at all.
    pub const fn is_category_enabled(&self, category: SlowdownCategory) -> bool {
        match category {
            SlowdownCategory::RangedBow => self.enable_bow,
            SlowdownCategory::RangedCrossbow => self.enable_crossbow,
            SlowdownCategory::CastLeft | SlowdownCategory::CastRight => self.enable_cast,
            SlowdownCategory::CastDual => self.enable_dual_cast,
        }
    }

    /// Checks every multiplier is finite and within `(0, 1]` and the log
    /// level is known.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tables = [
            ("bow_multipliers", &self.bow_multipliers),
            ("crossbow_multipliers", &self.crossbow_multipliers),
            ("cast_multipliers", &self.cast_multipliers),
            ("dual_cast_multipliers", &self.dual_cast_multipliers),
        ];
        for (table, values) in tables {
            for (tier, value) in values.iter().enumerate() {
                if !value.is_finite() || value <= 0.0 || value > 1.0 {
                    return Err(ConfigError::MultiplierOutOfRange { table, tier, value });
                }
            }
        }

        if self.log_level > Self::MAX_LOG_LEVEL {
            return Err(ConfigError::UnknownLogLevel(self.log_level));
        }

        Ok(())
    }
}

impl Default for SlowdownConfig {
    fn default() -> Self {
        Self::new()
    }
}
