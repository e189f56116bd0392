//! The lifecycle trait implemented by concrete states.

use std::fmt;

use crate::core::Event;
use crate::machine::Control;

/// Error raised from inside a state hook.
///
/// Hook failures are the embedder's errors, not the engine's: the engine
/// attaches the state name and hook kind and propagates them out of the
/// drive call that was running the hook.
pub type HookError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type returned by every lifecycle hook.
pub type HookResult = Result<(), HookError>;

/// Which lifecycle hook was executing. Carried on hook failures for
/// diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookKind {
    Enter,
    Update,
    FixedUpdate,
    LateUpdate,
    Exit,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HookKind::Enter => "enter",
            HookKind::Update => "update",
            HookKind::FixedUpdate => "fixed_update",
            HookKind::LateUpdate => "late_update",
            HookKind::Exit => "exit",
        };
        f.write_str(name)
    }
}

/// A unit of behavior owned by a [`StateMachine`](crate::StateMachine).
///
/// The machine constructs exactly one instance of each concrete state type
/// (via [`Default`]) and reuses it every time that state becomes current, so
/// private fields persist across re-entries. Hooks receive a [`Control`]
/// handle through which the state reaches the shared context and can request
/// further transitions on its own machine, including from within `enter`,
/// which lets a freshly entered state chain straight into its successor.
///
/// All hooks default to no-ops; implement only the ones the state needs.
/// Hooks run synchronously to completion: the engine never suspends or
/// re-enters a hook.
///
/// ```rust
/// use flywheel::{Control, HookResult, State};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum DoorEvent {
///     Unlock,
/// }
///
/// struct Inventory {
///     keys: u32,
/// }
///
/// #[derive(Default)]
/// struct Locked;
///
/// impl State<Inventory, DoorEvent> for Locked {
///     fn update(&mut self, mx: &mut Control<'_, Inventory, DoorEvent>) -> HookResult {
///         if mx.context().keys > 0 {
///             mx.context_mut().keys -= 1;
///             let _ = mx.transition(DoorEvent::Unlock)?;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait State<C: 'static, E: Event>: Send {
    /// Runs once each time this state becomes current.
    fn enter(&mut self, _mx: &mut Control<'_, C, E>) -> HookResult {
        Ok(())
    }

    /// Runs every driven frame while this state is current.
    fn update(&mut self, _mx: &mut Control<'_, C, E>) -> HookResult {
        Ok(())
    }

    /// Secondary per-frame hook, driven on the embedder's fixed tick.
    fn fixed_update(&mut self, _mx: &mut Control<'_, C, E>) -> HookResult {
        Ok(())
    }

    /// Secondary per-frame hook, driven after the main update pass.
    fn late_update(&mut self, _mx: &mut Control<'_, C, E>) -> HookResult {
        Ok(())
    }

    /// Runs once each time this state stops being current.
    ///
    /// Transition requests are rejected while `exit` is on the stack.
    fn exit(&mut self, _mx: &mut Control<'_, C, E>) -> HookResult {
        Ok(())
    }
}
