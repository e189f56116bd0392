//! The handle a state hook drives its own machine through.

use crate::core::{Event, State};
use crate::machine::{RequestError, RequestOutcome, StateMachine};

/// Borrow of the owning machine handed to every lifecycle hook.
///
/// This is how a state reaches the shared context and the request API
/// without holding a pointer back into the machine that owns it: the engine
/// lends the machine to the hook for the duration of the call. Requests made
/// here follow the same rules as external ones: deferred until the next
/// drive call, `Waiting` while another request is queued, rejected while the
/// current state is exiting.
pub struct Control<'m, C: 'static, E: Event> {
    machine: &'m mut StateMachine<C, E>,
}

impl<'m, C: 'static, E: Event> Control<'m, C, E> {
    pub(crate) fn new(machine: &'m mut StateMachine<C, E>) -> Self {
        Self { machine }
    }

    /// Shared context, read-only.
    pub fn context(&self) -> &C {
        self.machine.context()
    }

    /// Shared context, mutable. Hooks run strictly one at a time, so this
    /// is the only mutation path while a hook is on the stack.
    pub fn context_mut(&mut self) -> &mut C {
        self.machine.context_mut()
    }

    /// Requests a transition by event. See [`StateMachine::transition`].
    ///
    /// Calling this from within `enter` is the chaining idiom: the freshly
    /// entered state queues its successor, and the same drive call walks
    /// straight into it.
    pub fn transition(&mut self, event: E) -> Result<RequestOutcome, RequestError> {
        self.machine.transition(event)
    }

    /// Queues `S` unconditionally, table ignored. See
    /// [`StateMachine::force_transition`].
    pub fn force_transition<S>(&mut self) -> Result<(), RequestError>
    where
        S: State<C, E> + Default + 'static,
    {
        self.machine.force_transition::<S>()
    }

    /// Whether the machine's current state is `S`. During `enter`, the
    /// state being entered is already current.
    pub fn is_current_state<S: 'static>(&self) -> Result<bool, RequestError> {
        self.machine.is_current_state::<S>()
    }

    /// Always `true` from inside a hook; exposed for parity with the
    /// machine's own surface.
    pub fn is_processing(&self) -> bool {
        self.machine.is_processing()
    }

    /// The event most recently accepted by a `transition` call.
    pub fn last_event(&self) -> Option<&E> {
        self.machine.last_event()
    }
}
