//! End-to-end slowdown scenarios against the in-memory host.

mod common;

use std::sync::Arc;
use std::thread;

use common::Fixture;
use slowdown_core::{ActorId, Realization, SlowdownCategory, SlowdownConfig};
use slowdown_runtime::{InMemoryHost, SimActor, SlowdownEngine, SlowdownService};

/// Full ranged-then-cast session for one actor with a non-zero baseline.
///
/// 1. Bow drawn at skill 40 (apprentice, 0.6)
/// 2. Left hand starts casting at skill 80 while the bow is still drawn,
///    the latest apply decides the magnitude
/// 3. Bow released, the cast keeps governing
/// 4. Right hand joins, dual casting takes over
/// 5. Both hands released, baseline restored
#[test]
fn mixed_session_restores_baseline() {
    let fx = Fixture::new(SlowdownConfig::default());
    let actor = ActorId(0x42);
    fx.spawn_with_offset(actor, 10.0);

    // Ranged governs at 100 * 0.6 + 10.
    fx.engine.apply(actor, SlowdownCategory::RangedBow, 40.0);
    fx.assert_speed(actor, 70.0);

    fx.engine.apply(actor, SlowdownCategory::CastLeft, 80.0);
    fx.assert_speed(actor, 90.0);

    fx.engine.remove(actor, SlowdownCategory::RangedBow);
    fx.assert_speed(actor, 90.0);

    // Dual at the triggering skill: 100 * 0.6 + 10.
    fx.engine.apply(actor, SlowdownCategory::CastRight, 60.0);
    fx.assert_speed(actor, 70.0);

    // Right hand alone at its own skill: 100 * 0.7 + 10.
    fx.engine.remove(actor, SlowdownCategory::CastLeft);
    fx.assert_speed(actor, 80.0);
    fx.engine.remove(actor, SlowdownCategory::CastRight);
    fx.assert_speed(actor, 110.0);
    assert!(!fx.engine.is_actor_slowed(actor));
}

#[test]
fn clear_one_is_idempotent() {
    let fx = Fixture::new(SlowdownConfig::default());
    let actor = ActorId(7);
    fx.spawn_with_offset(actor, -20.0);

    fx.engine.apply(actor, SlowdownCategory::RangedCrossbow, 100.0);
    fx.assert_speed(actor, 60.0);

    fx.engine.clear_one(actor);
    fx.engine.clear_one(actor);
    fx.assert_speed(actor, 80.0);
    assert_eq!(fx.engine.tracked_actors(), 0);
}

#[test]
fn clear_all_restores_every_actor() {
    for realization in [Realization::AttributeDelta, Realization::ScriptedEffect] {
        let fx = Fixture::new(SlowdownConfig::default().with_realization(realization));
        let actors: Vec<_> = (1..=5).map(ActorId).collect();
        for (i, actor) in actors.iter().enumerate() {
            fx.spawn_with_offset(*actor, i as f32 * 5.0);
            fx.engine.apply(*actor, SlowdownCategory::CastLeft, 30.0);
            fx.engine.apply(*actor, SlowdownCategory::CastRight, 30.0);
        }
        assert_eq!(fx.engine.tracked_actors(), 5);

        fx.engine.clear_all();

        assert_eq!(fx.engine.tracked_actors(), 0);
        for (i, actor) in actors.iter().enumerate() {
            assert!(!fx.engine.is_actor_slowed(*actor));
            fx.assert_speed(*actor, 100.0 + i as f32 * 5.0);
            assert_eq!(fx.host.effect_count(*actor), 0);
        }
    }
}

#[test]
fn unloaded_actors_are_dropped_by_clear_all() {
    let fx = Fixture::new(SlowdownConfig::default());
    let actor = ActorId(9);
    fx.spawn_with_offset(actor, 0.0);
    fx.engine.apply(actor, SlowdownCategory::RangedBow, 10.0);

    fx.host.despawn(actor);
    fx.engine.remove(actor, SlowdownCategory::RangedBow);
    fx.engine.clear_one(actor);
    // The record survives until a sweep; the query never touches the host.
    assert!(fx.engine.is_actor_slowed(actor));

    fx.engine.clear_all();
    assert!(!fx.engine.is_actor_slowed(actor));
    assert_eq!(fx.engine.tracked_actors(), 0);
}

#[test]
fn operations_on_unknown_actors_are_silent() {
    let fx = Fixture::new(SlowdownConfig::default());
    let ghost = ActorId(0xDEAD);

    fx.engine.remove(ghost, SlowdownCategory::CastLeft);
    fx.engine.clear_one(ghost);
    fx.engine.apply(ghost, SlowdownCategory::CastLeft, 50.0);
    fx.engine.clear_all();

    assert!(!fx.engine.is_actor_slowed(ghost));
    assert_eq!(fx.engine.tracked_actors(), 0);
}

#[test]
fn reapplying_retargets_without_stacking() {
    let fx = Fixture::new(SlowdownConfig::default());
    let actor = ActorId(3);
    fx.spawn_with_offset(actor, 0.0);

    fx.engine.apply(actor, SlowdownCategory::RangedBow, 10.0);
    fx.assert_speed(actor, 50.0);
    fx.engine.apply(actor, SlowdownCategory::RangedBow, 90.0);
    fx.assert_speed(actor, 80.0);
    fx.engine.apply(actor, SlowdownCategory::RangedBow, 90.0);
    fx.assert_speed(actor, 80.0);

    fx.engine.remove(actor, SlowdownCategory::RangedBow);
    fx.assert_speed(actor, 100.0);
}

#[test]
fn concurrent_callers_leave_no_residue() {
    let config = Arc::new(SlowdownConfig::default());
    let host = Arc::new(InMemoryHost::with_config_effects(&config));
    let engine = Arc::new(SlowdownEngine::initialize(host.clone(), config).unwrap());

    let shared = ActorId(1);
    host.spawn(shared, SimActor::new());
    let owned: Vec<_> = (10..18).map(ActorId).collect();
    for actor in &owned {
        host.spawn(*actor, SimActor::new());
    }

    let categories = [
        SlowdownCategory::RangedBow,
        SlowdownCategory::RangedCrossbow,
        SlowdownCategory::CastLeft,
        SlowdownCategory::CastRight,
    ];

    let mut workers = Vec::new();
    for (i, actor) in owned.iter().copied().enumerate() {
        let engine = engine.clone();
        let category = categories[i % categories.len()];
        workers.push(thread::spawn(move || {
            for round in 0..200 {
                let skill = (round % 100) as f32;
                engine.apply(actor, category, skill);
                engine.apply(shared, category, skill);
                let _ = engine.is_actor_slowed(shared);
                engine.remove(shared, category);
                engine.remove(actor, category);
            }
        }));
    }
    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(engine.tracked_actors(), 0);
    assert!((host.speed(shared).unwrap() - 100.0).abs() < 1e-3);
    for actor in owned {
        assert!((host.speed(actor).unwrap() - 100.0).abs() < 1e-3);
    }
}

#[test]
fn removing_inactive_category_leaves_speed_alone() {
    for realization in [Realization::AttributeDelta, Realization::ScriptedEffect] {
        let fx = Fixture::new(SlowdownConfig::default().with_realization(realization));
        let actor = ActorId(0x50);
        fx.spawn_with_offset(actor, 0.0);

        fx.engine.apply(actor, SlowdownCategory::RangedBow, 40.0);
        fx.engine.apply(actor, SlowdownCategory::CastLeft, 80.0);
        fx.assert_speed(actor, 80.0);
        let before = fx.engine.snapshot(actor);

        fx.engine.remove(actor, SlowdownCategory::CastRight);

        fx.assert_speed(actor, 80.0);
        assert_eq!(fx.engine.snapshot(actor), before);
    }
}

#[test]
fn apply_order_decides_magnitude() {
    let fx = Fixture::new(SlowdownConfig::default());
    let (ranged_first, cast_first) = (ActorId(0x60), ActorId(0x61));
    fx.spawn_with_offset(ranged_first, 0.0);
    fx.spawn_with_offset(cast_first, 0.0);

    fx.engine.apply(ranged_first, SlowdownCategory::RangedBow, 40.0);
    fx.engine.apply(ranged_first, SlowdownCategory::CastLeft, 80.0);
    fx.engine.apply(cast_first, SlowdownCategory::CastLeft, 80.0);
    fx.engine.apply(cast_first, SlowdownCategory::RangedBow, 40.0);

    // Same flags and skills, latest apply governs.
    assert_eq!(
        fx.engine.snapshot(ranged_first).map(|s| s.flags()),
        fx.engine.snapshot(cast_first).map(|s| s.flags())
    );
    fx.assert_speed(ranged_first, 80.0);
    fx.assert_speed(cast_first, 60.0);
}
