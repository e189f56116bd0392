//! Declarative table registration.

/// Registers a whole transition table in one block.
///
/// Each entry is either a route, `(event) From => To`, or a re-entry,
/// `(event) @ Member`. Entries are applied in order against the given
/// machine; the macro evaluates to the first [`BuildError`] hit, or
/// `Ok(())`.
///
/// [`BuildError`]: crate::BuildError
///
/// ```rust
/// use flywheel::{transitions, State, StateMachine};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum AiEvent {
///     Spotted,
///     Lost,
///     Bored,
/// }
///
/// #[derive(Default)]
/// struct Patrol;
/// #[derive(Default)]
/// struct Chase;
///
/// impl State<(), AiEvent> for Patrol {}
/// impl State<(), AiEvent> for Chase {}
///
/// let mut machine = StateMachine::new(());
/// transitions!(machine, {
///     (AiEvent::Spotted) Patrol => Chase,
///     (AiEvent::Lost) Chase => Patrol,
///     (AiEvent::Bored) @ Patrol,
/// })
/// .unwrap();
/// machine.set_init_state::<Patrol>().unwrap();
/// ```
#[macro_export]
macro_rules! transitions {
    ($machine:expr, { $($entries:tt)* }) => {{
        let machine = &mut $machine;
        'table: {
            $crate::transitions!(@entry machine, 'table, $($entries)*);
            Ok(())
        }
    }};

    (@entry $m:ident, $lbl:lifetime, ) => {};

    (@entry $m:ident, $lbl:lifetime, ($event:expr) @ $state:ty , $($rest:tt)*) => {
        if let Err(err) = $m.add_reentry::<$state>($event) {
            break $lbl Err(err);
        }
        $crate::transitions!(@entry $m, $lbl, $($rest)*);
    };

    (@entry $m:ident, $lbl:lifetime, ($event:expr) @ $state:ty) => {
        if let Err(err) = $m.add_reentry::<$state>($event) {
            break $lbl Err(err);
        }
    };

    (@entry $m:ident, $lbl:lifetime, ($event:expr) $from:ty => $to:ty , $($rest:tt)*) => {
        if let Err(err) = $m.add_transition::<$from, $to>($event) {
            break $lbl Err(err);
        }
        $crate::transitions!(@entry $m, $lbl, $($rest)*);
    };

    (@entry $m:ident, $lbl:lifetime, ($event:expr) $from:ty => $to:ty) => {
        if let Err(err) = $m.add_transition::<$from, $to>($event) {
            break $lbl Err(err);
        }
    };
}
