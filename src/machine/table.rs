//! The two lookup structures built before a machine runs.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use crate::core::Event;
use crate::machine::registry::StateId;

/// Specific `(event, from) -> to` routes plus the lower-priority re-entry
/// sets consulted when no route matches.
///
/// Re-entry sets are keyed per event and act as a from-state filter: the
/// event is only accepted while the current state is a member, and the
/// resulting transition targets the current state itself (exit then enter on
/// the same instance).
pub(crate) struct TransitionTable<E: Event> {
    routes: HashMap<(E, StateId), StateId>,
    reentries: HashMap<E, HashSet<StateId>>,
}

impl<E: Event> TransitionTable<E> {
    pub(crate) fn new() -> Self {
        Self {
            routes: HashMap::new(),
            reentries: HashMap::new(),
        }
    }

    /// Registers `(event, from) -> to`. On a duplicate key the table is left
    /// untouched and the already-registered target is returned.
    pub(crate) fn add_route(&mut self, event: E, from: StateId, to: StateId) -> Result<(), StateId> {
        match self.routes.entry((event, from)) {
            Entry::Occupied(existing) => Err(*existing.get()),
            Entry::Vacant(slot) => {
                slot.insert(to);
                Ok(())
            }
        }
    }

    /// Adds `state` to the re-entry set for `event`. Returns `false` if it
    /// was already a member.
    pub(crate) fn add_reentry(&mut self, event: E, state: StateId) -> bool {
        self.reentries.entry(event).or_default().insert(state)
    }

    pub(crate) fn route(&self, event: &E, from: StateId) -> Option<StateId> {
        self.routes.get(&(event.clone(), from)).copied()
    }

    pub(crate) fn has_reentry(&self, event: &E, state: StateId) -> bool {
        self.reentries
            .get(event)
            .is_some_and(|members| members.contains(&state))
    }
}
