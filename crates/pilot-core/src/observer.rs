//! Navigation observers.
//!
//! Observers are identified by [`RouteObserver::id`] alone: two handles
//! reporting the same id are the same registration, whatever their hooks do.
//! The registry only holds weak references, so the owner decides how long an
//! observer lives.

use std::rc::{Rc, Weak};

/// Reactions to stack mutations. Every hook defaults to a no-op.
pub trait RouteObserver<T> {
    /// Identity used for registration and removal.
    fn id(&self) -> &str;

    /// A route was pushed on top of the stack.
    fn on_push(&self, _route: &T) {}

    /// The topmost route was popped.
    fn on_pop(&self, _route: &T) {}

    /// The stack was unwound to `route`.
    fn on_pop_to(&self, _route: &T, _inclusive: bool) {}

    /// The stack changed; both snapshots list route values root first.
    fn on_route_change(&self, _old_routes: &[T], _new_routes: &[T]) {}
}

struct Registration<T> {
    id: String,
    observer: Weak<dyn RouteObserver<T>>,
}

impl<T> Registration<T> {
    fn is_live(&self) -> bool {
        self.observer.strong_count() > 0
    }
}

/// Set of observers keyed by id.
pub struct ObserverRegistry<T> {
    registrations: Vec<Registration<T>>,
}

impl<T> Default for ObserverRegistry<T> {
    fn default() -> Self {
        Self {
            registrations: Vec::new(),
        }
    }
}

impl<T> std::fmt::Debug for ObserverRegistry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.registrations.iter().map(|r| &r.id))
            .finish()
    }
}

impl<T: 'static> ObserverRegistry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `observer` unless its id is already present.
    ///
    /// Returns `true` when the observer was inserted.
    pub fn insert(&mut self, observer: Rc<dyn RouteObserver<T>>) -> bool {
        self.prune();
        if self.contains(observer.id()) {
            return false;
        }
        self.registrations.push(Registration {
            id: observer.id().to_string(),
            observer: Rc::downgrade(&observer),
        });
        true
    }

    /// Remove the registration with `id`.
    ///
    /// Returns `true` when a live registration was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        self.prune();
        let before = self.registrations.len();
        self.registrations.retain(|r| r.id != id);
        self.registrations.len() != before
    }

    /// Check whether a live observer with `id` is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.registrations
            .iter()
            .any(|r| r.id == id && r.is_live())
    }

    /// Number of live registrations.
    pub fn len(&self) -> usize {
        self.registrations.iter().filter(|r| r.is_live()).count()
    }

    /// Check whether no live observer is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Strong handles to every live observer, in registration order.
    ///
    /// Dispatch iterates this snapshot so hooks can add or remove observers
    /// without invalidating the iteration.
    pub fn snapshot(&mut self) -> Vec<Rc<dyn RouteObserver<T>>> {
        self.prune();
        self.registrations
            .iter()
            .filter_map(|r| r.observer.upgrade())
            .collect()
    }

    /// Drop registrations whose observer no longer exists.
    fn prune(&mut self) {
        let before = self.registrations.len();
        self.registrations.retain(Registration::is_live);
        let pruned = before - self.registrations.len();
        if pruned > 0 {
            tracing::trace!(pruned, "dropped observers released by their owners");
        }
    }
}
