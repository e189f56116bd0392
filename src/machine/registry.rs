//! Type-keyed arena of state instances.

use std::any::TypeId;
use std::collections::HashMap;

use crate::core::{Event, State};

/// Stable handle to a state slot. Table entries and the machine's
/// current/pending slots all speak in these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct StateId(pub(crate) usize);

struct Slot<C: 'static, E: Event> {
    state: Option<Box<dyn State<C, E>>>,
    name: &'static str,
}

/// One instance per concrete state type, default-constructed on first
/// reference and kept for the machine's lifetime.
pub(crate) struct StateRegistry<C: 'static, E: Event> {
    slots: Vec<Slot<C, E>>,
    ids: HashMap<TypeId, StateId>,
}

impl<C: 'static, E: Event> StateRegistry<C, E> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            ids: HashMap::new(),
        }
    }

    /// Returns the id for `S`, constructing and caching the instance on
    /// first reference.
    pub(crate) fn intern<S>(&mut self) -> StateId
    where
        S: State<C, E> + Default + 'static,
    {
        let key = TypeId::of::<S>();
        if let Some(&id) = self.ids.get(&key) {
            return id;
        }
        let id = StateId(self.slots.len());
        self.slots.push(Slot {
            state: Some(Box::new(S::default())),
            name: short_type_name::<S>(),
        });
        self.ids.insert(key, id);
        id
    }

    /// Id of `S` if it has been interned, without constructing it.
    pub(crate) fn id_of<S: 'static>(&self) -> Option<StateId> {
        self.ids.get(&TypeId::of::<S>()).copied()
    }

    pub(crate) fn name(&self, id: StateId) -> &'static str {
        self.slots[id.0].name
    }

    /// Removes the instance from its slot for the duration of a hook call,
    /// so the machine can be borrowed by the hook's [`Control`] handle.
    ///
    /// [`Control`]: crate::machine::Control
    pub(crate) fn take(&mut self, id: StateId) -> Box<dyn State<C, E>> {
        self.slots[id.0]
            .state
            .take()
            .expect("state slot vacated while its own hook is on the stack")
    }

    pub(crate) fn restore(&mut self, id: StateId, state: Box<dyn State<C, E>>) {
        self.slots[id.0].state = Some(state);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }
}

fn short_type_name<S>() -> &'static str {
    let full = std::any::type_name::<S>();
    full.rsplit("::").next().unwrap_or(full)
}
