//! Errors surfaced by the build, request, and drive APIs.

use thiserror::Error;

use crate::core::{Event, HookError, HookKind};

/// Errors from table construction and machine configuration.
///
/// All of these are caller bugs surfaced synchronously at the call site,
/// before the machine ever runs a hook.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError<E: Event> {
    /// The table and initial state freeze once the machine has started.
    #[error("machine already started; the table and initial state are frozen after the first update")]
    AlreadyStarted,

    /// The `(event, from)` pair is already routed. The table is unchanged.
    #[error("duplicate transition for {event:?}: {from} -> {existing} already registered, rejected {from} -> {requested}")]
    DuplicateTransition {
        event: E,
        from: &'static str,
        existing: &'static str,
        requested: &'static str,
    },

    /// The state is already in the re-entry set for this event.
    #[error("duplicate re-entry for {event:?} on {state}")]
    DuplicateReentry { event: E, state: &'static str },

    /// Builder finished without an initial state.
    #[error("no initial state chosen; call initial() before build()")]
    MissingInitialState,
}

/// Errors from the request API (`transition`, `force_transition`,
/// `is_current_state`).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RequestError {
    /// The machine has no current state yet; drive `update()` first.
    #[error("machine has not started; drive update() at least once first")]
    NotStarted,

    /// The current state's `exit` hook is on the stack. Safe to retry once
    /// the drive call returns.
    #[error("transition requested while the current state is exiting")]
    ExitInProgress,
}

/// Errors from the drive API (`update`, `fixed_update`, `late_update`).
#[derive(Debug, Error)]
pub enum DriveError {
    /// `update()` was called with nothing to enter: no initial state was
    /// queued.
    #[error("nothing to enter; queue an initial state before the first update")]
    NoInitialState,

    /// A state hook failed. The error carries the state name and hook kind;
    /// the underlying failure is the source.
    #[error("{state} {hook} hook failed: {source}")]
    Hook {
        state: &'static str,
        hook: HookKind,
        source: HookError,
    },
}
