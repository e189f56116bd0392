//! Opt-in diagnostic trace of completed transitions.
//!
//! Enabled per machine via
//! [`StateMachine::enable_trace`](crate::StateMachine::enable_trace). The
//! trace is a bounded ring: machines are driven every frame for the process
//! lifetime, so old records are evicted rather than accumulated. Recording
//! never changes engine behavior.

use std::collections::VecDeque;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Why a transition happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(bound(serialize = "E: Serialize"))]
pub enum TransitionCause<E> {
    /// The cold-start entry into the initial state.
    Initial,
    /// A specific route accepted this event.
    Event(E),
    /// The event's re-entry set accepted this event; the state exited and
    /// re-entered itself.
    Reentry(E),
    /// A forced transition bypassed the table.
    Forced,
}

/// One completed transition: the enter hook of `to` ran to completion.
///
/// `from` is `None` for the cold-start record. Names are the concrete state
/// type names, which keeps records serializable without constraining the
/// embedder's state types.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(bound(serialize = "E: Serialize"))]
pub struct TransitionRecord<E> {
    pub from: Option<&'static str>,
    pub to: &'static str,
    pub cause: TransitionCause<E>,
    pub at: DateTime<Utc>,
}

/// Bounded ring of [`TransitionRecord`]s, oldest evicted first.
///
/// ```rust
/// use flywheel::{State, StateMachine};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Ev {
///     Next,
/// }
///
/// #[derive(Default)]
/// struct A;
/// #[derive(Default)]
/// struct B;
/// impl State<(), Ev> for A {}
/// impl State<(), Ev> for B {}
///
/// let mut machine = StateMachine::new(());
/// machine.add_transition::<A, B>(Ev::Next).unwrap();
/// machine.set_init_state::<A>().unwrap();
/// machine.enable_trace(16);
///
/// machine.update().unwrap();
/// let _ = machine.transition(Ev::Next).unwrap();
/// machine.update().unwrap();
///
/// let trace = machine.trace().unwrap();
/// assert_eq!(trace.path(), vec!["A", "B"]);
/// ```
#[derive(Clone, Debug)]
pub struct TraceBuffer<E> {
    records: VecDeque<TransitionRecord<E>>,
    capacity: usize,
    dropped: u64,
}

impl<E> TraceBuffer<E> {
    /// A ring holding at most `capacity` records (minimum one).
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::new(),
            capacity: capacity.max(1),
            dropped: 0,
        }
    }

    pub(crate) fn push(&mut self, record: TransitionRecord<E>) {
        if self.records.len() == self.capacity {
            self.records.pop_front();
            self.dropped += 1;
        }
        self.records.push_back(record);
    }

    /// Records in order, oldest first.
    pub fn records(&self) -> impl Iterator<Item = &TransitionRecord<E>> {
        self.records.iter()
    }

    /// The most recent record.
    pub fn latest(&self) -> Option<&TransitionRecord<E>> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// How many records have been evicted since the trace was enabled.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// The sequence of state names traversed, reconstructed from the
    /// retained records: the first record's origin (when still retained),
    /// then each destination in order.
    pub fn path(&self) -> Vec<&'static str> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.front() {
            if let Some(from) = first.from {
                path.push(from);
            }
        }
        for record in &self.records {
            path.push(record.to);
        }
        path
    }

    /// Wall-clock span between the oldest and newest retained records.
    /// `None` until at least one record exists.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.front()?, self.records.back()?);
        last.at.signed_duration_since(first.at).to_std().ok()
    }
}
