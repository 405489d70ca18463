//! Route identity types.
//!
//! A [`RouteEntry`] pairs a user-defined route value with a [`RouteId`] that is
//! generated once and never reused. The same route value may sit on the stack
//! more than once; the id is what tells those entries apart.

use std::fmt;
use std::hash::{Hash, Hasher};

use uuid::Uuid;

/// Bound for route values held by a [`Pilot`](crate::Pilot).
///
/// Routes are cloned into snapshots for observers, compared by value for
/// `pop_to`, and formatted for diagnostics.
///
/// Route enums whose variants carry callbacks cannot derive `PartialEq`. Give
/// them a key and compare by key only:
///
/// ```
/// use std::rc::Rc;
///
/// #[derive(Clone)]
/// enum AppRoute {
///     Home,
///     Profile { on_sign_out: Rc<dyn Fn()> },
/// }
///
/// impl AppRoute {
///     fn key(&self) -> &'static str {
///         match self {
///             Self::Home => "Home",
///             Self::Profile { .. } => "Profile",
///         }
///     }
/// }
///
/// impl PartialEq for AppRoute {
///     fn eq(&self, other: &Self) -> bool {
///         self.key() == other.key()
///     }
/// }
///
/// impl std::fmt::Debug for AppRoute {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         f.write_str(self.key())
///     }
/// }
///
/// fn assert_route<T: pilot_core::Route>() {}
/// assert_route::<AppRoute>();
/// ```
pub trait Route: Clone + PartialEq + fmt::Debug + 'static {}

impl<T> Route for T where T: Clone + PartialEq + fmt::Debug + 'static {}

/// Opaque unique identity of a [`RouteEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(Uuid);

impl RouteId {
    /// Generate a fresh id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RouteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// One position on the navigation stack.
///
/// Immutable after creation. Two entries are equal only when both the id and
/// the route value match; hashing uses the id alone.
#[derive(Debug, Clone)]
pub struct RouteEntry<T> {
    id: RouteId,
    route: T,
}

impl<T> RouteEntry<T> {
    /// Wrap a route value under a freshly generated id.
    pub fn new(route: T) -> Self {
        Self {
            id: RouteId::new(),
            route,
        }
    }

    /// Identity of this entry.
    #[must_use]
    pub fn id(&self) -> RouteId {
        self.id
    }

    /// The wrapped route value.
    pub fn route(&self) -> &T {
        &self.route
    }

    /// Consume the entry, returning the route value.
    pub fn into_route(self) -> T {
        self.route
    }
}

impl<T: PartialEq> PartialEq for RouteEntry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.route == other.route
    }
}

impl<T: Eq> Eq for RouteEntry<T> {}

impl<T> Hash for RouteEntry<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
