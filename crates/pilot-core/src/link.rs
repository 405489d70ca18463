//! Nested presentation chain.
//!
//! A [`PresentationLink`] shows one screen and, while its active flag is set,
//! presents the next link as a deeper navigation level. The active flag depends
//! on the next link: setting a next link activates it, clearing it
//! deactivates it. When the platform dismisses the deeper level on its own
//! (a back gesture, the system back button), the flag drops while the next
//! link is still present. That transition fires the "came back" callback,
//! which is how a dismissal the pilot did not initiate finds its way back to
//! the stack.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Callback fired when the deeper level was dismissed by the platform.
pub type CameBack = Rc<dyn Fn()>;

/// Shared, mutable state of one link.
struct LinkState<S> {
    active: Cell<bool>,
    next: RefCell<Option<PresentationLink<S>>>,
    on_came_back: RefCell<CameBack>,
}

impl<S> LinkState<S> {
    fn new() -> Self {
        Self {
            active: Cell::new(false),
            next: RefCell::new(None),
            on_came_back: RefCell::new(Rc::new(|| {})),
        }
    }
}

/// One screen plus the state linking it to the deeper level.
///
/// Clones share state: deactivating one clone deactivates them all.
pub struct PresentationLink<S> {
    screen: S,
    state: Rc<LinkState<S>>,
}

// Unlinks the chain level by level; the default drop recurses once per level.
impl<S> Drop for LinkState<S> {
    fn drop(&mut self) {
        let mut next = self.next.get_mut().take();
        while let Some(link) = next {
            next = match Rc::try_unwrap(link.state) {
                Ok(mut state) => state.next.get_mut().take(),
                Err(_) => None,
            };
        }
    }
}

impl<S: Clone> Clone for PresentationLink<S> {
    fn clone(&self) -> Self {
        Self {
            screen: self.screen.clone(),
            state: Rc::clone(&self.state),
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for PresentationLink<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresentationLink")
            .field("screen", &self.screen)
            .field("active", &self.state.active.get())
            .field("has_next", &self.has_next())
            .finish()
    }
}

impl<S> PresentationLink<S> {
    /// Wrap `screen` in an inactive link with no deeper level.
    pub fn new(screen: S) -> Self {
        Self {
            screen,
            state: Rc::new(LinkState::new()),
        }
    }

    /// The screen rendered at this level.
    pub fn screen(&self) -> &S {
        &self.screen
    }

    /// Whether the deeper level is currently presented.
    pub fn is_active(&self) -> bool {
        self.state.active.get()
    }

    /// Check whether a deeper level is linked.
    pub fn has_next(&self) -> bool {
        self.state.next.borrow().is_some()
    }

    /// Replace the deeper level. The active flag follows: `Some` activates,
    /// `None` deactivates without firing the came-back callback.
    pub fn set_next(&self, next: Option<PresentationLink<S>>) {
        let active = next.is_some();
        self.state.next.replace(next);
        self.set_active(active);
    }

    /// Replace the callback fired on platform dismissal.
    pub fn set_on_came_back(&self, callback: CameBack) {
        self.state.on_came_back.replace(callback);
    }

    /// Set the active flag.
    ///
    /// A transition from active to inactive while a deeper level is still
    /// linked fires the came-back callback once.
    pub fn set_active(&self, active: bool) {
        let was_active = self.state.active.replace(active);
        if was_active && !active && self.has_next() {
            let callback = Rc::clone(&self.state.on_came_back.borrow());
            callback();
        }
    }

    /// The platform dismissed the deeper level.
    pub fn dismiss_deeper(&self) {
        self.set_active(false);
    }
}

impl<S: Clone> PresentationLink<S> {
    /// The deeper link, if any.
    pub fn next(&self) -> Option<PresentationLink<S>> {
        self.state.next.borrow().clone()
    }

    /// Number of levels presented, counting this one.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut current = self.active_next();
        while let Some(link) = current {
            depth += 1;
            current = link.active_next();
        }
        depth
    }

    /// Screens along the presented chain, this level first.
    pub fn active_screens(&self) -> Vec<S> {
        let mut screens = vec![self.screen.clone()];
        let mut current = self.active_next();
        while let Some(link) = current {
            screens.push(link.screen.clone());
            current = link.active_next();
        }
        screens
    }

    /// The deepest presented link.
    pub fn deepest(&self) -> PresentationLink<S> {
        let mut current = self.clone();
        while let Some(next) = current.active_next() {
            current = next;
        }
        current
    }

    fn active_next(&self) -> Option<PresentationLink<S>> {
        if self.is_active() { self.next() } else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(levels: u32) -> PresentationLink<u32> {
        let root = PresentationLink::new(0);
        let mut tail = root.clone();
        for level in 1..levels {
            let next = PresentationLink::new(level);
            tail.set_next(Some(next.clone()));
            tail = next;
        }
        root
    }

    #[test]
    fn test_deep_chain_drops() {
        let root = chain(100_000);
        assert_eq!(root.depth(), 100_000);
        assert_eq!(root.deepest().screen(), &99_999);
        drop(root);
    }

    #[test]
    fn test_shared_tail_survives_drop() {
        let root = chain(3);
        let tail = root.next().unwrap();
        drop(root);
        assert_eq!(tail.active_screens(), [1, 2]);
    }

    #[test]
    fn test_debug_stops_at_first_level() {
        let root = chain(2);
        assert_eq!(
            format!("{root:?}"),
            "PresentationLink { screen: 0, active: true, has_next: true }"
        );
    }

    fn counter() -> (Rc<Cell<usize>>, CameBack) {
        let count = Rc::new(Cell::new(0));
        let hits = Rc::clone(&count);
        (count, Rc::new(move || hits.set(hits.get() + 1)))
    }

    #[test]
    fn test_set_next_activates() {
        let root = PresentationLink::new("root");
        assert!(!root.is_active());
        root.set_next(Some(PresentationLink::new("child")));
        assert!(root.is_active());
        assert_eq!(root.depth(), 2);
    }

    #[test]
    fn test_clearing_next_does_not_fire() {
        let (count, callback) = counter();
        let root = PresentationLink::new("root");
        root.set_on_came_back(callback);
        root.set_next(Some(PresentationLink::new("child")));
        root.set_next(None);
        assert!(!root.is_active());
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_dismiss_fires_once_per_transition() {
        let (count, callback) = counter();
        let root = PresentationLink::new("root");
        root.set_on_came_back(callback);
        root.set_next(Some(PresentationLink::new("child")));

        root.dismiss_deeper();
        root.dismiss_deeper();
        assert_eq!(count.get(), 1);

        root.set_active(true);
        root.dismiss_deeper();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_dismiss_without_next_is_silent() {
        let (count, callback) = counter();
        let root = PresentationLink::new("root");
        root.set_on_came_back(callback);
        root.set_active(true);
        root.dismiss_deeper();
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_active_screens_stop_at_inactive_level() {
        let root = PresentationLink::new("a");
        let middle = PresentationLink::new("b");
        middle.set_next(Some(PresentationLink::new("c")));
        root.set_next(Some(middle.clone()));
        assert_eq!(root.active_screens(), ["a", "b", "c"]);
        assert_eq!(*root.deepest().screen(), "c");

        middle.dismiss_deeper();
        assert_eq!(root.active_screens(), ["a", "b"]);
        assert_eq!(root.depth(), 2);
    }
}
