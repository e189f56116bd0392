//! Fluent construction of state machines.
//!
//! Sugar over the machine's own build API. The builder owns a machine that
//! has never run, so registrations cannot hit the started-machine guard;
//! duplicate registrations still surface as [`BuildError`]s through the
//! fluent chain.

pub mod macros;

use crate::core::{Event, State};
use crate::machine::{BuildError, StateMachine};

/// Builds a [`StateMachine`] with a fluent API.
///
/// The initial state is required and validated at [`build`](Self::build).
///
/// ```rust
/// use flywheel::{State, StateMachineBuilder};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Ev {
///     Advance,
///     Reset,
/// }
///
/// #[derive(Default)]
/// struct Ready;
/// #[derive(Default)]
/// struct Running;
///
/// impl State<(), Ev> for Ready {}
/// impl State<(), Ev> for Running {}
///
/// let mut machine = StateMachineBuilder::new(())
///     .transition::<Ready, Running>(Ev::Advance)
///     .unwrap()
///     .transition::<Running, Ready>(Ev::Reset)
///     .unwrap()
///     .initial::<Ready>()
///     .build()
///     .unwrap();
///
/// machine.update().unwrap();
/// assert!(machine.is_current_state::<Ready>().unwrap());
/// ```
pub struct StateMachineBuilder<C: 'static, E: Event> {
    machine: StateMachine<C, E>,
    has_initial: bool,
}

impl<C: 'static, E: Event> StateMachineBuilder<C, E> {
    /// Starts a builder for a machine owning `context`.
    pub fn new(context: C) -> Self {
        Self {
            machine: StateMachine::new(context),
            has_initial: false,
        }
    }

    /// Registers the route `(event, F) -> T`.
    pub fn transition<F, T>(mut self, event: E) -> Result<Self, BuildError<E>>
    where
        F: State<C, E> + Default + 'static,
        T: State<C, E> + Default + 'static,
    {
        self.machine.add_transition::<F, T>(event)?;
        Ok(self)
    }

    /// Adds `S` to the re-entry set for `event`.
    pub fn reentry<S>(mut self, event: E) -> Result<Self, BuildError<E>>
    where
        S: State<C, E> + Default + 'static,
    {
        self.machine.add_reentry::<S>(event)?;
        Ok(self)
    }

    /// Chooses the state the first `update()` enters (required).
    pub fn initial<S>(mut self) -> Self
    where
        S: State<C, E> + Default + 'static,
    {
        self.machine
            .set_init_state::<S>()
            .expect("builder machine has not started");
        self.has_initial = true;
        self
    }

    /// Opts the machine in to forced transitions.
    pub fn allow_forced(mut self, allowed: bool) -> Self {
        self.machine.allow_forced_transitions(allowed);
        self
    }

    /// Enables the diagnostic trace with the given ring capacity.
    pub fn trace_capacity(mut self, capacity: usize) -> Self {
        self.machine.enable_trace(capacity);
        self
    }

    /// Finishes the build. Fails with [`BuildError::MissingInitialState`]
    /// if [`initial`](Self::initial) was never called.
    pub fn build(self) -> Result<StateMachine<C, E>, BuildError<E>> {
        if !self.has_initial {
            return Err(BuildError::MissingInitialState);
        }
        Ok(self.machine)
    }
}
