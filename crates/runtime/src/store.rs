//! Lock-guarded map from actor id to slowdown state.
//!
//! One coarse mutex covers the whole map. Engine operations take the lock
//! once, for their full duration, through [`StateStore::lock`], so a
//! transition on one actor is never observed half-done and sweeps such as
//! clear-all need no lock ordering.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Mutex, MutexGuard, PoisonError};

use slowdown_core::{ActorId, ActorSlowState};
use tracing::warn;

/// Concurrency-safe store of per-actor slowdown records.
#[derive(Default)]
pub struct StateStore {
    states: Mutex<HashMap<ActorId, ActorSlowState>>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the store lock.
    ///
    /// A poisoned lock is recovered: every mutation through [`StoreGuard`]
    /// is a single map operation, so the map is consistent even if a holder
    /// panicked.
    pub fn lock(&self) -> StoreGuard<'_> {
        let states = self.states.lock().unwrap_or_else(|poisoned| {
            warn!(target: "runtime::store", "slowdown state lock was poisoned, recovering");
            PoisonError::into_inner(poisoned)
        });
        StoreGuard { states }
    }
}

/// Exclusive access to the store until dropped.
pub struct StoreGuard<'a> {
    states: MutexGuard<'a, HashMap<ActorId, ActorSlowState>>,
}

impl StoreGuard<'_> {
    pub fn get(&self, actor: ActorId) -> Option<&ActorSlowState> {
        self.states.get(&actor)
    }

    pub fn get_mut(&mut self, actor: ActorId) -> Option<&mut ActorSlowState> {
        self.states.get_mut(&actor)
    }

    /// Returns the record for `actor`, creating it with `init` if absent.
    ///
    /// If `init` returns `None` nothing is inserted and `None` is returned.
    pub fn get_or_try_insert_with(
        &mut self,
        actor: ActorId,
        init: impl FnOnce() -> Option<ActorSlowState>,
    ) -> Option<&mut ActorSlowState> {
        match self.states.entry(actor) {
            Entry::Occupied(entry) => Some(entry.into_mut()),
            Entry::Vacant(entry) => init().map(|state| entry.insert(state)),
        }
    }

    /// Removes and returns the record for `actor`.
    pub fn erase(&mut self, actor: ActorId) -> Option<ActorSlowState> {
        self.states.remove(&actor)
    }

    /// Removes every record, in ascending actor order.
    pub fn drain(&mut self) -> Vec<(ActorId, ActorSlowState)> {
        let mut drained: Vec<_> = self.states.drain().collect();
        drained.sort_unstable_by_key(|(actor, _)| *actor);
        drained
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ActorId, &ActorSlowState)> {
        self.states.iter()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
