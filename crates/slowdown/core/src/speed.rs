//! Speed arithmetic shared by every realization.
//!
//! Speed is expressed in percent of nominal, so an unmodified actor sits at
//! [`NOMINAL_SPEED`]. The baseline offset captured when tracking starts is
//! carried through every formula so that other systems' changes to the same
//! attribute survive a slowdown cycle.
//!
//! Formulas:
//! - target while slowed = NOMINAL × multiplier + baseline_offset
//! - target on clearance = NOMINAL + baseline_offset
//! - scripted magnitude  = NOMINAL − NOMINAL × multiplier

/// Nominal speed attribute value.
pub const NOMINAL_SPEED: f32 = 100.0;

/// Differences below this are treated as already restored.
pub const RESTORE_EPSILON: f32 = 1e-4;

/// Offset of the current speed from nominal, captured on the first slowdown.
#[inline]
pub fn baseline_offset(current_speed: f32) -> f32 {
    current_speed - NOMINAL_SPEED
}

/// Absolute speed an actor should have while slowed by `multiplier`.
#[inline]
pub fn slowed_target(multiplier: f32, baseline_offset: f32) -> f32 {
    NOMINAL_SPEED * multiplier + baseline_offset
}

/// Absolute speed an actor returns to once every slowdown ends.
#[inline]
pub fn restored_target(baseline_offset: f32) -> f32 {
    NOMINAL_SPEED + baseline_offset
}

/// Scripted-effect magnitude for a multiplier.
///
/// A multiplier of 0.5 halves speed, so the effect must reduce it by 50.
#[inline]
pub fn magnitude(multiplier: f32) -> f32 {
    NOMINAL_SPEED - multiplier * NOMINAL_SPEED
}

/// Delta that moves `current` onto `target`, or `None` if it is already
/// there.
#[inline]
pub fn delta_to(target: f32, current: f32) -> Option<f32> {
    let delta = target - current;
    (delta.abs() > RESTORE_EPSILON).then_some(delta)
}
