//! Error types surfaced by the slowdown runtime.
//!
//! Only initialization can fail from a caller's point of view. Host call
//! failures are reported to the engine, logged, and never cross the
//! [`SlowdownService`](crate::SlowdownService) boundary.
use std::fmt;

use slowdown_core::{ActorId, EffectKind};
use thiserror::Error;

use crate::host::{Attribute, EffectHandle};

/// Failures reported by a [`HostPlatform`](crate::HostPlatform).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    #[error("actor {0} is not loaded")]
    ActorNotFound(ActorId),

    #[error("actor {actor} has no {attribute} attribute")]
    AttributeUnavailable {
        actor: ActorId,
        attribute: Attribute,
    },

    #[error("actor {0} has no instant caster")]
    NoCaster(ActorId),

    #[error("effect {0:?} is not a known definition")]
    UnknownEffect(EffectHandle),
}

/// Effect definition that could not be resolved during initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingEffect {
    pub kind: EffectKind,
    pub id: u32,
}

impl fmt::Display for MissingEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#X})", self.kind, self.id)
    }
}

/// Initialization failures. The engine cannot be constructed after one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InitError {
    #[error("failed to resolve effect definitions from {plugin}: {}", list(.missing))]
    MissingEffects {
        plugin: String,
        missing: Vec<MissingEffect>,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] slowdown_core::ConfigError),
}

fn list(missing: &[MissingEffect]) -> String {
    missing
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Text that names no [`AnimationTrigger`](crate::AnimationTrigger).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown trigger `{0}`")]
pub struct ParseTriggerError(pub String);
