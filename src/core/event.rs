//! Event keys for transition requests.

use std::fmt::Debug;
use std::hash::Hash;

/// Key identifying a requested transition.
///
/// Events are opaque to the engine: they are only cloned, compared, and
/// hashed to look up table entries. Canonically an enum, but any type
/// meeting the bounds works.
///
/// The trait is implemented automatically: deriving the usual traits on an
/// enum is all that is required:
///
/// ```rust
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum EnemyEvent {
///     PlayerSpotted,
///     PlayerLost,
/// }
///
/// fn assert_event<E: flywheel::Event>() {}
/// assert_event::<EnemyEvent>();
/// ```
pub trait Event: Clone + Eq + Hash + Debug + Send + 'static {}

impl<T> Event for T where T: Clone + Eq + Hash + Debug + Send + 'static {}
