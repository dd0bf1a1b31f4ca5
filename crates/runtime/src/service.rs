//! Narrow interface the front end drives.

use slowdown_core::{ActorId, SlowdownCategory};

/// The five slowdown operations.
///
/// Every operation is total: invalid or untracked actors are documented
/// no-ops and nothing is returned to the caller except the query result.
/// [`SlowdownEngine`](crate::SlowdownEngine) is the single-lock
/// implementation; a sharded store can implement this trait without
/// touching callers.
pub trait SlowdownService: Send + Sync {
    /// Starts (or re-targets) a slowdown for `category` at `skill`.
    fn apply(&self, actor: ActorId, category: SlowdownCategory, skill: f32);

    /// Ends a slowdown category, recomputing whatever remains.
    fn remove(&self, actor: ActorId, category: SlowdownCategory);

    /// Ends every slowdown on one actor and restores its speed.
    fn clear_one(&self, actor: ActorId);

    /// Ends every slowdown on every actor.
    fn clear_all(&self);

    /// Returns true if any slowdown is active on `actor`.
    fn is_actor_slowed(&self, actor: ActorId) -> bool;
}
