//! The state machine: build API, request API, and drive API.

mod control;
mod error;
mod registry;
mod table;

pub use control::Control;
pub use error::{BuildError, DriveError, RequestError};

use chrono::Utc;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::core::{Event, HookKind, Phase, State};
use crate::trace::{TraceBuffer, TransitionCause, TransitionRecord};
use registry::{StateId, StateRegistry};
use table::TransitionTable;

/// What a [`StateMachine::transition`] request resolved to.
///
/// None of these are errors: a rejected request simply means no rule covers
/// the event from the current state, and nothing was scheduled.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestOutcome {
    /// A rule matched; the target is queued and the next `update()` call
    /// performs the change.
    Accepted,
    /// An earlier request is still queued and has not been consumed by an
    /// `update()` yet; this request was ignored. Retry on a later frame.
    Waiting,
    /// No rule covers this event from the current state.
    Rejected,
}

impl RequestOutcome {
    /// Convenience for call sites that only care whether something was
    /// scheduled.
    pub fn is_accepted(self) -> bool {
        matches!(self, RequestOutcome::Accepted)
    }
}

struct Pending<E> {
    target: StateId,
    cause: TransitionCause<E>,
}

/// A table-driven state machine with deferred transitions.
///
/// The machine is built while idle (routes, re-entries, initial state), then
/// driven every frame with [`update`](Self::update). Transition requests made
/// between or during drive calls take effect at the *next* `update()`; a
/// state entered during that call may immediately request another
/// transition, chaining several exit/enter pairs inside the same call.
///
/// One machine owns one shared context value, visible to every state hook;
/// each concrete state type is instantiated once per machine and reused.
///
/// ```rust
/// use flywheel::{RequestOutcome, State, StateMachine};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Sig {
///     Go,
///     Stop,
/// }
///
/// #[derive(Default)]
/// struct Halted;
/// #[derive(Default)]
/// struct Rolling;
///
/// impl State<u32, Sig> for Halted {}
/// impl State<u32, Sig> for Rolling {}
///
/// let mut machine = StateMachine::new(0u32);
/// machine.add_transition::<Halted, Rolling>(Sig::Go).unwrap();
/// machine.add_transition::<Rolling, Halted>(Sig::Stop).unwrap();
/// machine.set_init_state::<Halted>().unwrap();
///
/// machine.update().unwrap(); // enters Halted
/// let outcome = machine.transition(Sig::Go).unwrap();
/// assert_eq!(outcome, RequestOutcome::Accepted);
/// assert!(machine.is_current_state::<Halted>().unwrap()); // deferred
///
/// machine.update().unwrap(); // Halted exits, Rolling enters
/// assert!(machine.is_current_state::<Rolling>().unwrap());
/// ```
pub struct StateMachine<C: 'static, E: Event> {
    id: Uuid,
    context: C,
    registry: StateRegistry<C, E>,
    table: TransitionTable<E>,
    current: Option<StateId>,
    pending: Option<Pending<E>>,
    last_event: Option<E>,
    phase: Phase,
    forced_allowed: bool,
    trace: Option<TraceBuffer<E>>,
}

impl<C: 'static, E: Event> StateMachine<C, E> {
    /// Creates an idle machine owning `context`. Nothing runs until routes
    /// and an initial state are registered and `update()` is driven.
    pub fn new(context: C) -> Self {
        Self {
            id: Uuid::new_v4(),
            context,
            registry: StateRegistry::new(),
            table: TransitionTable::new(),
            current: None,
            pending: None,
            last_event: None,
            phase: Phase::Idle,
            forced_allowed: false,
            trace: None,
        }
    }

    // --- build API ------------------------------------------------------

    /// Registers the route `(event, F) -> T`, instantiating either state on
    /// first reference.
    ///
    /// Each `(event, from)` pair may be routed at most once; a duplicate
    /// registration fails with [`BuildError::DuplicateTransition`] naming
    /// the offending entry and leaves the table unchanged. Rejected with
    /// [`BuildError::AlreadyStarted`] once the machine has run.
    pub fn add_transition<F, T>(&mut self, event: E) -> Result<(), BuildError<E>>
    where
        F: State<C, E> + Default + 'static,
        T: State<C, E> + Default + 'static,
    {
        if self.current.is_some() {
            return Err(BuildError::AlreadyStarted);
        }
        let from = self.registry.intern::<F>();
        let to = self.registry.intern::<T>();
        self.table
            .add_route(event.clone(), from, to)
            .map_err(|existing| BuildError::DuplicateTransition {
                event,
                from: self.registry.name(from),
                existing: self.registry.name(existing),
                requested: self.registry.name(to),
            })
    }

    /// Adds `S` to the re-entry set for `event`: while `S` is current and no
    /// specific route covers the event, a request for it self-transitions:
    /// `S` exits and re-enters the same instance.
    ///
    /// The set is a curated from-state filter, not a universal wildcard:
    /// the event is only accepted while the current state is a member.
    /// Specific routes always win when both could apply.
    pub fn add_reentry<S>(&mut self, event: E) -> Result<(), BuildError<E>>
    where
        S: State<C, E> + Default + 'static,
    {
        if self.current.is_some() {
            return Err(BuildError::AlreadyStarted);
        }
        let state = self.registry.intern::<S>();
        if self.table.add_reentry(event.clone(), state) {
            Ok(())
        } else {
            Err(BuildError::DuplicateReentry {
                event,
                state: self.registry.name(state),
            })
        }
    }

    /// Queues `S` as the state the first `update()` call enters. Rejected
    /// with [`BuildError::AlreadyStarted`] once the machine has run.
    pub fn set_init_state<S>(&mut self) -> Result<(), BuildError<E>>
    where
        S: State<C, E> + Default + 'static,
    {
        if self.current.is_some() {
            return Err(BuildError::AlreadyStarted);
        }
        let target = self.registry.intern::<S>();
        self.pending = Some(Pending {
            target,
            cause: TransitionCause::Initial,
        });
        Ok(())
    }

    /// Opts this machine in or out of
    /// [`force_transition`](Self::force_transition). Denied by default;
    /// while denied, forced requests are silent no-ops.
    pub fn allow_forced_transitions(&mut self, allowed: bool) {
        self.forced_allowed = allowed;
    }

    /// Starts recording completed transitions into a bounded ring of
    /// `capacity` records. Purely diagnostic; engine behavior is unchanged.
    pub fn enable_trace(&mut self, capacity: usize) {
        self.trace = Some(TraceBuffer::new(capacity));
    }

    // --- request API ----------------------------------------------------

    /// Requests a transition by event, to take effect at the next
    /// `update()` call.
    ///
    /// Resolution order: a queued-but-unconsumed earlier request wins
    /// ([`RequestOutcome::Waiting`]); then the specific `(event, current)`
    /// route; then the event's re-entry set filtered by the current state;
    /// otherwise [`RequestOutcome::Rejected`] with nothing scheduled.
    ///
    /// May be called from within a hook of the current state, including the
    /// `enter` of a state that just became current, which is how chains are
    /// built. Fails with [`RequestError::NotStarted`] before the first
    /// `update()` and [`RequestError::ExitInProgress`] while the current
    /// state's `exit` hook is on the stack.
    pub fn transition(&mut self, event: E) -> Result<RequestOutcome, RequestError> {
        let Some(current) = self.current else {
            return Err(RequestError::NotStarted);
        };
        if self.phase == Phase::Exiting {
            return Err(RequestError::ExitInProgress);
        }
        if self.pending.is_some() {
            trace!(machine = %self.id, event = ?event, "request ignored; a transition is already queued");
            return Ok(RequestOutcome::Waiting);
        }
        if let Some(target) = self.table.route(&event, current) {
            debug!(
                machine = %self.id,
                event = ?event,
                from = self.registry.name(current),
                to = self.registry.name(target),
                "transition queued"
            );
            self.pending = Some(Pending {
                target,
                cause: TransitionCause::Event(event.clone()),
            });
            self.last_event = Some(event);
            return Ok(RequestOutcome::Accepted);
        }
        if self.table.has_reentry(&event, current) {
            debug!(
                machine = %self.id,
                event = ?event,
                state = self.registry.name(current),
                "re-entry queued"
            );
            self.pending = Some(Pending {
                target: current,
                cause: TransitionCause::Reentry(event.clone()),
            });
            self.last_event = Some(event);
            return Ok(RequestOutcome::Accepted);
        }
        trace!(
            machine = %self.id,
            event = ?event,
            from = self.registry.name(current),
            "no rule for event; request rejected"
        );
        Ok(RequestOutcome::Rejected)
    }

    /// Queues `S` as the next state, bypassing the table entirely.
    ///
    /// Only acts when the machine has been opted in via
    /// [`allow_forced_transitions`](Self::allow_forced_transitions);
    /// otherwise a silent no-op. When allowed it overwrites any queued
    /// request (there is no `Waiting` here) and may reference a state type
    /// the table never mentioned, instantiating it on first use.
    /// Fails with [`RequestError::ExitInProgress`] while the current state
    /// is exiting.
    pub fn force_transition<S>(&mut self) -> Result<(), RequestError>
    where
        S: State<C, E> + Default + 'static,
    {
        if self.phase == Phase::Exiting {
            return Err(RequestError::ExitInProgress);
        }
        if !self.forced_allowed {
            return Ok(());
        }
        let target = self.registry.intern::<S>();
        debug!(machine = %self.id, to = self.registry.name(target), "forced transition queued");
        self.pending = Some(Pending {
            target,
            cause: TransitionCause::Forced,
        });
        Ok(())
    }

    /// Whether the current state's concrete type is `S`. Fails with
    /// [`RequestError::NotStarted`] before the first `update()`.
    pub fn is_current_state<S: 'static>(&self) -> Result<bool, RequestError> {
        let Some(current) = self.current else {
            return Err(RequestError::NotStarted);
        };
        Ok(self.registry.id_of::<S>() == Some(current))
    }

    /// `true` once the machine has entered its first state. Never fails.
    pub fn is_processing(&self) -> bool {
        self.current.is_some()
    }

    // --- drive API ------------------------------------------------------

    /// Drives one frame.
    ///
    /// On the first call, enters the queued initial state; the entered
    /// state's `update` hook does NOT run in the same call. On later calls,
    /// runs the current state's `update` hook (unless a transition is
    /// already queued), then consumes queued transitions in a loop of exit,
    /// move, enter until no hook queues another one.
    ///
    /// Failure semantics: if the very first `enter` fails, the machine
    /// rolls back to not-started and the failed state stays queued, so a
    /// later `update()` retries it. If any hook fails after that, nothing
    /// is rolled back: the machine keeps whatever current/queued shape it
    /// had at the failure point, the sub-phase resets to idle, and the
    /// error propagates for the embedder to decide on recovery.
    pub fn update(&mut self) -> Result<(), DriveError> {
        match self.current {
            None => self.cold_start()?,
            Some(current) if self.pending.is_none() => {
                self.phase = Phase::Updating;
                if let Err(err) = self.run_hook(current, HookKind::Update) {
                    self.phase = Phase::Idle;
                    return Err(err);
                }
            }
            Some(_) => {}
        }
        self.drain_pending()
    }

    /// Forwards the embedder's fixed tick to the current state's
    /// `fixed_update` hook. A no-op before the machine has started.
    pub fn fixed_update(&mut self) -> Result<(), DriveError> {
        let Some(current) = self.current else {
            return Ok(());
        };
        self.run_hook(current, HookKind::FixedUpdate)
    }

    /// Forwards the embedder's post-update pass to the current state's
    /// `late_update` hook. A no-op before the machine has started.
    pub fn late_update(&mut self) -> Result<(), DriveError> {
        let Some(current) = self.current else {
            return Ok(());
        };
        self.run_hook(current, HookKind::LateUpdate)
    }

    // --- accessors ------------------------------------------------------

    /// Shared context, read-only.
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Shared context, mutable.
    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    /// Identity of this machine instance, for log correlation.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The drive sub-phase at this moment.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The event most recently accepted by [`transition`](Self::transition).
    pub fn last_event(&self) -> Option<&E> {
        self.last_event.as_ref()
    }

    /// Name of the current state's concrete type, if started.
    pub fn current_state_name(&self) -> Option<&'static str> {
        self.current.map(|id| self.registry.name(id))
    }

    /// The diagnostic trace, if enabled.
    pub fn trace(&self) -> Option<&TraceBuffer<E>> {
        self.trace.as_ref()
    }

    // --- internals ------------------------------------------------------

    fn cold_start(&mut self) -> Result<(), DriveError> {
        let Some(seed) = self.pending.take() else {
            return Err(DriveError::NoInitialState);
        };
        let target = seed.target;
        self.current = Some(target);
        self.phase = Phase::Entering;
        if let Err(err) = self.run_hook(target, HookKind::Enter) {
            // leave the machine not-started with the same seed queued, so a
            // later update() retries entering the same state
            self.pending = Some(seed);
            self.current = None;
            self.phase = Phase::Idle;
            return Err(err);
        }
        self.record(None, target, seed.cause);
        Ok(())
    }

    fn drain_pending(&mut self) -> Result<(), DriveError> {
        while self.pending.is_some() {
            let Some(from) = self.current else { break };
            self.phase = Phase::Exiting;
            if let Err(err) = self.run_hook(from, HookKind::Exit) {
                self.phase = Phase::Idle;
                return Err(err);
            }
            let Some(next) = self.pending.take() else { break };
            self.current = Some(next.target);
            self.phase = Phase::Entering;
            if let Err(err) = self.run_hook(next.target, HookKind::Enter) {
                self.phase = Phase::Idle;
                return Err(err);
            }
            self.record(Some(from), next.target, next.cause);
        }
        self.phase = Phase::Idle;
        Ok(())
    }

    fn run_hook(&mut self, id: StateId, hook: HookKind) -> Result<(), DriveError> {
        let mut state = self.registry.take(id);
        let result = {
            let mut mx = Control::new(self);
            match hook {
                HookKind::Enter => state.enter(&mut mx),
                HookKind::Update => state.update(&mut mx),
                HookKind::FixedUpdate => state.fixed_update(&mut mx),
                HookKind::LateUpdate => state.late_update(&mut mx),
                HookKind::Exit => state.exit(&mut mx),
            }
        };
        self.registry.restore(id, state);
        result.map_err(|source| DriveError::Hook {
            state: self.registry.name(id),
            hook,
            source,
        })
    }

    fn record(&mut self, from: Option<StateId>, to: StateId, cause: TransitionCause<E>) {
        let from_name = from.map(|id| self.registry.name(id));
        let to_name = self.registry.name(to);
        debug!(
            machine = %self.id,
            from = from_name.unwrap_or("-"),
            to = to_name,
            cause = ?cause,
            "entered state"
        );
        if let Some(buffer) = self.trace.as_mut() {
            buffer.push(TransitionRecord {
                from: from_name,
                to: to_name,
                cause,
                at: Utc::now(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::HookResult;

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    enum GateEvent {
        Open,
        Close,
    }

    #[derive(Default)]
    struct Log {
        lines: Vec<&'static str>,
    }

    #[derive(Default)]
    struct Closed;

    impl State<Log, GateEvent> for Closed {
        fn enter(&mut self, mx: &mut Control<'_, Log, GateEvent>) -> HookResult {
            mx.context_mut().lines.push("Closed.enter");
            Ok(())
        }

        fn update(&mut self, mx: &mut Control<'_, Log, GateEvent>) -> HookResult {
            mx.context_mut().lines.push("Closed.update");
            Ok(())
        }

        fn exit(&mut self, mx: &mut Control<'_, Log, GateEvent>) -> HookResult {
            mx.context_mut().lines.push("Closed.exit");
            Ok(())
        }
    }

    #[derive(Default)]
    struct Open;

    impl State<Log, GateEvent> for Open {
        fn enter(&mut self, mx: &mut Control<'_, Log, GateEvent>) -> HookResult {
            mx.context_mut().lines.push("Open.enter");
            Ok(())
        }
    }

    fn gate() -> StateMachine<Log, GateEvent> {
        let mut machine = StateMachine::new(Log::default());
        machine
            .add_transition::<Closed, Open>(GateEvent::Open)
            .unwrap();
        machine
            .add_transition::<Open, Closed>(GateEvent::Close)
            .unwrap();
        machine.set_init_state::<Closed>().unwrap();
        machine
    }

    #[test]
    fn first_update_enters_without_updating() {
        let mut machine = gate();
        machine.update().unwrap();
        assert_eq!(machine.context().lines, vec!["Closed.enter"]);

        machine.update().unwrap();
        assert_eq!(
            machine.context().lines,
            vec!["Closed.enter", "Closed.update"]
        );
    }

    #[test]
    fn accepted_request_runs_exit_then_enter_on_next_update() {
        let mut machine = gate();
        machine.update().unwrap();

        let outcome = machine.transition(GateEvent::Open).unwrap();
        assert!(outcome.is_accepted());
        machine.update().unwrap();

        assert_eq!(
            machine.context().lines,
            vec!["Closed.enter", "Closed.exit", "Open.enter"]
        );
        assert!(machine.is_current_state::<Open>().unwrap());
        assert_eq!(machine.current_state_name(), Some("Open"));
    }

    #[test]
    fn last_event_tracks_accepted_requests_only() {
        let mut machine = gate();
        machine.update().unwrap();
        assert_eq!(machine.last_event(), None);

        let _ = machine.transition(GateEvent::Close).unwrap(); // rejected
        assert_eq!(machine.last_event(), None);

        let _ = machine.transition(GateEvent::Open).unwrap();
        assert_eq!(machine.last_event(), Some(&GateEvent::Open));
    }

    #[test]
    fn forced_transitions_are_denied_by_default() {
        let mut machine = gate();
        machine.update().unwrap();
        machine.force_transition::<Open>().unwrap();
        machine.update().unwrap();
        assert!(machine.is_current_state::<Closed>().unwrap());
    }

    #[test]
    fn machines_have_independent_state_and_identity() {
        let mut first = gate();
        let mut second = gate();
        assert_ne!(first.id(), second.id());

        first.update().unwrap();
        let _ = first.transition(GateEvent::Open).unwrap();
        first.update().unwrap();
        second.update().unwrap();

        assert!(first.is_current_state::<Open>().unwrap());
        assert!(second.is_current_state::<Closed>().unwrap());
    }
}
