//! Flywheel: a table-driven lifecycle state machine engine.
//!
//! Flywheel backs frame-driven behavior (gameplay AI, scene and dialog
//! lifecycles, service startup flows) with one small engine: a typed
//! transition table built once, a deferred request protocol, and a phased
//! per-frame drive loop.
//!
//! # Core Concepts
//!
//! - **States**: one type per behavior, implementing [`State`]'s lifecycle
//!   hooks (`enter`, `update`, `fixed_update`, `late_update`, `exit`), each
//!   instantiated once per machine and reused on every re-entry
//! - **Events**: hashable keys ([`Event`]) resolved against the table
//! - **Deferred transitions**: requests queue a target; the next
//!   [`StateMachine::update`] call performs the exit/enter, and a freshly
//!   entered state may immediately queue another, chaining several
//!   transitions inside a single drive call
//! - **Context**: one caller-supplied value shared by every hook
//!
//! # Example
//!
//! ```rust
//! use flywheel::{Control, HookResult, State, StateMachine};
//!
//! #[derive(Clone, PartialEq, Eq, Hash, Debug)]
//! enum AiEvent {
//!     PlayerSpotted,
//!     PlayerLost,
//! }
//!
//! #[derive(Default)]
//! struct Blackboard {
//!     alert: bool,
//! }
//!
//! #[derive(Default)]
//! struct Patrol;
//!
//! impl State<Blackboard, AiEvent> for Patrol {
//!     fn enter(&mut self, mx: &mut Control<'_, Blackboard, AiEvent>) -> HookResult {
//!         mx.context_mut().alert = false;
//!         Ok(())
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Chase;
//!
//! impl State<Blackboard, AiEvent> for Chase {
//!     fn enter(&mut self, mx: &mut Control<'_, Blackboard, AiEvent>) -> HookResult {
//!         mx.context_mut().alert = true;
//!         Ok(())
//!     }
//! }
//!
//! let mut machine = StateMachine::new(Blackboard::default());
//! machine.add_transition::<Patrol, Chase>(AiEvent::PlayerSpotted).unwrap();
//! machine.add_transition::<Chase, Patrol>(AiEvent::PlayerLost).unwrap();
//! machine.set_init_state::<Patrol>().unwrap();
//!
//! machine.update().unwrap(); // enters Patrol
//! let _ = machine.transition(AiEvent::PlayerSpotted).unwrap();
//! machine.update().unwrap(); // Patrol exits, Chase enters
//! assert!(machine.context().alert);
//! ```
//!
//! The engine is single-threaded and cooperative: hooks run synchronously
//! to completion, the engine performs no I/O and never yields, and a given
//! machine must be driven from one thread at a time. Re-entrant requests
//! from inside a hook are the intended usage; concurrent drive calls are
//! not supported.

pub mod builder;
pub mod core;
pub mod machine;
pub mod trace;

pub use crate::builder::StateMachineBuilder;
pub use crate::core::{Event, HookError, HookKind, HookResult, Phase, State};
pub use crate::machine::{
    BuildError, Control, DriveError, RequestError, RequestOutcome, StateMachine,
};
pub use crate::trace::{TraceBuffer, TransitionCause, TransitionRecord};
