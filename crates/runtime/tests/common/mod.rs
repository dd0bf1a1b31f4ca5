//! Shared fixtures for the runtime integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use slowdown_core::speed::NOMINAL_SPEED;
use slowdown_core::{ActorId, SlowdownConfig};
use slowdown_runtime::{Attribute, InMemoryHost, SimActor, SlowdownEngine, TriggerRouter};

pub const TOLERANCE: f32 = 1e-4;

pub struct Fixture {
    pub host: Arc<InMemoryHost>,
    pub engine: Arc<SlowdownEngine>,
    pub router: TriggerRouter,
}

impl Fixture {
    pub fn new(config: SlowdownConfig) -> Self {
        let config = Arc::new(config);
        let host = Arc::new(InMemoryHost::with_config_effects(&config));
        let engine = Arc::new(
            SlowdownEngine::initialize(host.clone(), config.clone())
                .expect("engine should initialize with every definition registered"),
        );
        let router = TriggerRouter::new(engine.clone(), host.clone(), host.clone(), config);
        Self {
            host,
            engine,
            router,
        }
    }

    /// Spawns a non-player actor running at `100 + offset`.
    pub fn spawn_with_offset(&self, actor: ActorId, offset: f32) {
        self.host.spawn(
            actor,
            SimActor::new().with_attribute(Attribute::SpeedMult, NOMINAL_SPEED + offset),
        );
    }

    pub fn speed(&self, actor: ActorId) -> f32 {
        self.host.speed(actor).expect("actor should be spawned")
    }

    pub fn assert_speed(&self, actor: ActorId, expected: f32) {
        let actual = self.speed(actor);
        assert!(
            (actual - expected).abs() < TOLERANCE,
            "speed of {actor} is {actual}, expected {expected}"
        );
    }
}
