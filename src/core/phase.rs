//! Update sub-phase tracking.

use std::fmt;

/// Where the machine is inside (or between) drive calls.
///
/// The phase guards re-entrant requests: `transition` and `force_transition`
/// are rejected while the machine is `Exiting`, because a teardown that
/// re-routes itself has no well-defined destination. Every drive call
/// returns the machine to `Idle`, including on hook failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Between drive calls.
    Idle,
    /// An `enter` hook is on the stack.
    Entering,
    /// An `update` hook is on the stack.
    Updating,
    /// An `exit` hook is on the stack.
    Exiting,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Entering => "entering",
            Phase::Updating => "updating",
            Phase::Exiting => "exiting",
        };
        f.write_str(name)
    }
}
