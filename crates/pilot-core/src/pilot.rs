//! The navigation stack controller.
//!
//! # Threading
//!
//! A [`Pilot`] lives on the UI thread. Handles are reference counted without
//! atomics and are therefore neither `Send` nor `Sync`; every operation runs
//! synchronously and has delivered all of its notifications before it
//! returns.
//!
//! # Notifications
//!
//! Each mutation first updates the stack, then notifies observers: the
//! operation hook (`on_push`, `on_pop` or `on_pop_to`) followed by
//! `on_route_change` with the route values before and after. No internal
//! borrow is held while a hook runs, so hooks may read the pilot or mutate it
//! again. A mutation made from inside a hook is applied immediately, but its
//! notifications are queued behind the round being delivered. Observers
//! therefore see rounds in the order the mutations happened, and the last
//! `new` snapshot they receive matches the stack once the outermost call
//! returns.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::config::PilotConfig;
use crate::logger::RouteLogger;
use crate::observer::{ObserverRegistry, RouteObserver};
use crate::route::{Route, RouteEntry, RouteId};

struct PilotInner<T> {
    paths: RefCell<Vec<RouteEntry<T>>>,
    observers: RefCell<ObserverRegistry<T>>,
    logger: Box<dyn RouteLogger>,
    dispatching: Cell<bool>,
    pending: RefCell<VecDeque<Round<T>>>,
}

/// Operation hook of one mutation.
enum Hook<T> {
    Push(T),
    Pop(T),
    PopTo(T, bool),
}

/// Notifications owed for one mutation.
struct Round<T> {
    hook: Hook<T>,
    old: Vec<T>,
    new: Vec<T>,
}

/// Clears the dispatch state even if a hook panics.
struct DispatchGuard<'a, T> {
    inner: &'a PilotInner<T>,
}

impl<T> Drop for DispatchGuard<'_, T> {
    fn drop(&mut self) {
        self.inner.dispatching.set(false);
        self.inner.pending.borrow_mut().clear();
    }
}

/// Handle to a navigation stack.
///
/// Cloning the handle shares the stack.
pub struct Pilot<T> {
    inner: Rc<PilotInner<T>>,
}

/// Non-owning handle to a [`Pilot`].
pub struct WeakPilot<T> {
    inner: Weak<PilotInner<T>>,
}

impl<T> Clone for Pilot<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Clone for WeakPilot<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<T> WeakPilot<T> {
    /// Recover the pilot if it is still alive.
    pub fn upgrade(&self) -> Option<Pilot<T>> {
        self.inner.upgrade().map(|inner| Pilot { inner })
    }
}

impl<T: fmt::Debug> fmt::Debug for Pilot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pilot")
            .field("paths", &*self.inner.paths.borrow())
            .field("observers", &*self.inner.observers.borrow())
            .finish()
    }
}

impl<T: Route> Default for Pilot<T> {
    fn default() -> Self {
        Self::new(PilotConfig::default())
    }
}

impl<T: Route> Pilot<T> {
    /// Create an empty pilot.
    pub fn new(config: PilotConfig) -> Self {
        Self::with_logger(None, config.logger())
    }

    /// Create a pilot whose root is `initial`.
    pub fn with_initial(initial: T, config: PilotConfig) -> Self {
        Self::with_logger(Some(initial), config.logger())
    }

    /// Create a pilot reporting diagnostics to `logger`.
    pub fn with_logger(initial: Option<T>, logger: Box<dyn RouteLogger>) -> Self {
        let pilot = Self {
            inner: Rc::new(PilotInner {
                paths: RefCell::new(Vec::new()),
                observers: RefCell::new(ObserverRegistry::new()),
                logger,
                dispatching: Cell::new(false),
                pending: RefCell::new(VecDeque::new()),
            }),
        };
        pilot.log("pilot initialized");
        if let Some(initial) = initial {
            pilot.push(initial);
        }
        pilot
    }

    /// Non-owning handle for callbacks that must not keep the pilot alive.
    pub fn downgrade(&self) -> WeakPilot<T> {
        WeakPilot {
            inner: Rc::downgrade(&self.inner),
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Route values on the stack, root first.
    pub fn stack(&self) -> Vec<T> {
        routes_of(&self.inner.paths.borrow())
    }

    /// Entries on the stack, root first.
    pub fn paths(&self) -> Vec<RouteEntry<T>> {
        self.inner.paths.borrow().clone()
    }

    /// The topmost route.
    pub fn top(&self) -> Option<T> {
        self.inner.paths.borrow().last().map(|e| e.route().clone())
    }

    /// Number of entries on the stack.
    pub fn len(&self) -> usize {
        self.inner.paths.borrow().len()
    }

    /// Check whether the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.paths.borrow().is_empty()
    }

    /// Number of live observers.
    pub fn observer_count(&self) -> usize {
        self.inner.observers.borrow().len()
    }

    // =========================================================================
    // OBSERVERS
    // =========================================================================

    /// Register `observer`. The pilot keeps only a weak reference.
    ///
    /// Returns `false` (and changes nothing) when an observer with the same id
    /// is already registered.
    pub fn add_observer(&self, observer: Rc<dyn RouteObserver<T>>) -> bool {
        let inserted = self.inner.observers.borrow_mut().insert(observer);
        if inserted {
            self.log("observer added");
        } else {
            self.log("observer already exists");
        }
        inserted
    }

    /// Unregister the observer with `id`.
    ///
    /// Returns `false` (and changes nothing) when no such observer exists.
    pub fn remove_observer(&self, id: &str) -> bool {
        let removed = self.inner.observers.borrow_mut().remove(id);
        if removed {
            self.log("observer removed");
        } else {
            self.log("observer not found");
        }
        removed
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Push `route` on top of the stack.
    pub fn push(&self, route: T) {
        self.log(&format!("pushing {route:?} route"));
        let (old, new) = self.mutate(|paths| paths.push(RouteEntry::new(route.clone())));
        self.notify(Hook::Push(route), old, new);
    }

    /// Pop the topmost route. Does nothing on an empty stack.
    pub fn pop(&self) {
        if self.is_empty() {
            self.log("pop ignored, stack is empty");
            return;
        }
        self.log("route popped");
        let mut popped = None;
        let (old, new) = self.mutate(|paths| popped = paths.pop());
        if let Some(entry) = popped {
            self.notify(Hook::Pop(entry.into_route()), old, new);
        }
    }

    /// Unwind the stack to the first (lowest) entry equal to `route`.
    ///
    /// The match itself stays on the stack unless `inclusive` is set. When
    /// nothing matches, or the stack is empty, nothing happens. A match
    /// notifies observers even when nothing was removed (the match was already
    /// on top).
    pub fn pop_to(&self, route: &T, inclusive: bool) {
        self.log(&format!("popping to route {route:?}"));

        let found = {
            let paths = self.inner.paths.borrow();
            if paths.is_empty() {
                drop(paths);
                self.log("path is empty");
                return;
            }
            paths.iter().position(|e| e.route() == route)
        };
        let Some(found) = found else {
            self.log("route not found");
            return;
        };

        let boundary = if inclusive { found } else { found + 1 };
        let (old, new) = self.mutate(|paths| paths.truncate(boundary));
        self.log(&format!("popped {} routes", old.len() - new.len()));
        self.notify(Hook::PopTo(route.clone(), inclusive), old, new);
    }

    /// Pop in response to the platform dismissing the level above `id`.
    ///
    /// Only acts when `id` is the second-to-last entry, i.e. the parent of the
    /// topmost screen. Reports about entries that are no longer in that
    /// position are stale and ignored.
    pub fn system_pop(&self, id: RouteId) {
        let is_parent_of_top = {
            let paths = self.inner.paths.borrow();
            paths.len() > 1 && paths[paths.len() - 2].id() == id
        };
        if is_parent_of_top {
            self.pop();
        } else {
            self.log("system pop ignored, entry is not below the top");
        }
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    /// Apply `change` to the entries and return route snapshots from before
    /// and after.
    fn mutate(&self, change: impl FnOnce(&mut Vec<RouteEntry<T>>)) -> (Vec<T>, Vec<T>) {
        let mut paths = self.inner.paths.borrow_mut();
        let old = routes_of(&paths);
        change(&mut paths);
        let new = routes_of(&paths);
        (old, new)
    }

    /// Queue the round for a mutation and, unless a round is already being
    /// delivered further up the call stack, deliver everything queued.
    fn notify(&self, hook: Hook<T>, old: Vec<T>, new: Vec<T>) {
        self.inner
            .pending
            .borrow_mut()
            .push_back(Round { hook, old, new });
        if self.inner.dispatching.replace(true) {
            return;
        }
        let _guard = DispatchGuard { inner: &self.inner };
        loop {
            let Some(round) = self.inner.pending.borrow_mut().pop_front() else {
                break;
            };
            self.deliver(&round);
        }
    }

    fn deliver(&self, round: &Round<T>) {
        let observers = self.inner.observers.borrow_mut().snapshot();
        for observer in &observers {
            match &round.hook {
                Hook::Push(route) => observer.on_push(route),
                Hook::Pop(route) => observer.on_pop(route),
                Hook::PopTo(route, inclusive) => observer.on_pop_to(route, *inclusive),
            }
        }
        for observer in &observers {
            observer.on_route_change(&round.old, &round.new);
        }
    }

    fn log(&self, message: &str) {
        self.inner.logger.log(message);
    }
}

fn routes_of<T: Clone>(paths: &[RouteEntry<T>]) -> Vec<T> {
    paths.iter().map(|e| e.route().clone()).collect()
}
