//! Screen recycling.
//!
//! The [`ViewRecycler`] turns the pilot's entries into a [`PresentationLink`]
//! chain. Screens are built once per [`RouteId`] and reused for as long as
//! that entry stays on the stack, so screens further down the stack keep their
//! state across rebuilds. Screens of entries that left the stack are dropped
//! on the next build.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::link::{CameBack, PresentationLink};
use crate::pilot::Pilot;
use crate::route::{Route, RouteEntry, RouteId};

/// Forwards a platform dismissal, carrying the id of the entry whose deeper
/// level closed.
pub type SystemPopFn = Rc<dyn Fn(RouteId)>;

/// Counters describing how the screen cache behaved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Screens served from the cache.
    pub hits: u64,
    /// Screens built by the route map.
    pub misses: u64,
    /// Screens dropped because their entry left the stack.
    pub evictions: u64,
}

impl CacheStats {
    /// Fraction of lookups served from the cache (0.0 when nothing was built).
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Caches screens by entry identity and rebuilds the presentation chain.
pub struct ViewRecycler<S> {
    screens: HashMap<RouteId, S>,
    on_system_pop: SystemPopFn,
    stats: CacheStats,
}

impl<S> std::fmt::Debug for ViewRecycler<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewRecycler")
            .field("cached", &self.screens.len())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<S: Clone> ViewRecycler<S> {
    /// Create a recycler that reports platform dismissals to `on_system_pop`.
    pub fn new(on_system_pop: impl Fn(RouteId) + 'static) -> Self {
        Self {
            screens: HashMap::new(),
            on_system_pop: Rc::new(on_system_pop),
            stats: CacheStats::default(),
        }
    }

    /// Create a recycler that forwards platform dismissals to `pilot`.
    ///
    /// Only a weak handle is kept; dismissals arriving after the pilot is gone
    /// are ignored.
    pub fn attached<T: Route>(pilot: &Pilot<T>) -> Self {
        let pilot = pilot.downgrade();
        Self::new(move |id| {
            if let Some(pilot) = pilot.upgrade() {
                pilot.system_pop(id);
            }
        })
    }

    /// Reconcile the cache with `paths` and build the presentation chain.
    ///
    /// `paths` lists entries root first. The returned link presents the root
    /// entry; deeper entries hang off it one level each. An empty stack yields
    /// `None`.
    pub fn build<T>(
        &mut self,
        paths: &[RouteEntry<T>],
        mut route_map: impl FnMut(&T) -> S,
    ) -> Option<PresentationLink<S>> {
        self.recycle(paths);

        let mut current: Option<PresentationLink<S>> = None;
        for entry in paths.iter().rev() {
            let screen = match self.screens.get(&entry.id()) {
                Some(screen) => {
                    self.stats.hits += 1;
                    screen.clone()
                }
                None => {
                    self.stats.misses += 1;
                    let screen = route_map(entry.route());
                    self.screens.insert(entry.id(), screen.clone());
                    screen
                }
            };

            let link = PresentationLink::new(screen);
            if current.is_some() {
                link.set_on_came_back(self.came_back(entry.id()));
            }
            link.set_next(current.take());
            current = Some(link);
        }
        current
    }

    /// Cached screen for `id`, if its entry was built and is still on the stack.
    pub fn screen(&self, id: RouteId) -> Option<&S> {
        self.screens.get(&id)
    }

    /// Check whether a screen is cached for `id`.
    pub fn contains(&self, id: RouteId) -> bool {
        self.screens.contains_key(&id)
    }

    /// Number of cached screens.
    pub fn cached_len(&self) -> usize {
        self.screens.len()
    }

    /// Cache counters since creation.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Drop every screen whose entry is no longer in `paths`.
    fn recycle<T>(&mut self, paths: &[RouteEntry<T>]) {
        let before = self.screens.len();
        let live: HashSet<RouteId> = paths.iter().map(RouteEntry::id).collect();
        self.screens.retain(|id, _| live.contains(id));
        let evicted = before - self.screens.len();
        self.stats.evictions += evicted as u64;
        tracing::trace!(
            evicted,
            cached = self.screens.len(),
            depth = paths.len(),
            "recycled screens"
        );
    }

    fn came_back(&self, id: RouteId) -> CameBack {
        let on_system_pop = Rc::clone(&self.on_system_pop);
        Rc::new(move || on_system_pop(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    fn entries(routes: &[&'static str]) -> Vec<RouteEntry<&'static str>> {
        routes.iter().copied().map(RouteEntry::new).collect()
    }

    #[test]
    fn test_empty_stack_builds_nothing() {
        let mut recycler = ViewRecycler::new(|_| {});
        let paths: Vec<RouteEntry<&str>> = Vec::new();
        assert!(recycler.build(&paths, |r| r.to_string()).is_none());
        assert_eq!(recycler.cached_len(), 0);
    }

    #[test]
    fn test_chain_mirrors_stack() {
        let mut recycler = ViewRecycler::new(|_| {});
        let paths = entries(&["A", "B", "C"]);
        let root = recycler.build(&paths, |r| r.to_string()).unwrap();
        assert_eq!(root.active_screens(), ["A", "B", "C"]);
        assert!(!root.deepest().is_active());
    }

    #[test]
    fn test_screens_reused_across_builds() {
        let built = Cell::new(0);
        let mut recycler = ViewRecycler::new(|_| {});
        let mut paths = entries(&["A", "B"]);
        let map = |r: &&str| {
            built.set(built.get() + 1);
            Rc::new(r.to_string())
        };

        let first = recycler.build(&paths, map).unwrap();
        paths.push(RouteEntry::new("C"));
        let second = recycler.build(&paths, map).unwrap();

        assert_eq!(built.get(), 3);
        assert!(Rc::ptr_eq(first.screen(), second.screen()));
        assert_eq!(recycler.stats().hits, 2);
        assert_eq!(recycler.stats().misses, 3);
    }

    #[test]
    fn test_removed_entries_are_evicted() {
        let mut recycler = ViewRecycler::new(|_| {});
        let mut paths = entries(&["A", "B", "C"]);
        recycler.build(&paths, |r| r.to_string());
        let removed = paths.pop().unwrap();

        recycler.build(&paths, |r| r.to_string());
        assert!(!recycler.contains(removed.id()));
        assert_eq!(recycler.cached_len(), 2);
        assert_eq!(recycler.stats().evictions, 1);
    }

    #[test]
    fn test_deep_stack_builds_and_drops() {
        let mut recycler = ViewRecycler::new(|_| {});
        let paths: Vec<RouteEntry<u32>> = (0..100_000).map(RouteEntry::new).collect();
        let root = recycler.build(&paths, |r| *r).unwrap();
        assert_eq!(root.depth(), paths.len());
        drop(root);

        let root = recycler.build(&paths[..1], |r| *r).unwrap();
        assert_eq!(recycler.stats().evictions, 99_999);
        assert_eq!(root.depth(), 1);
    }

    #[test]
    fn test_came_back_reports_parent_entry() {
        let reported = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&reported);
        let mut recycler = ViewRecycler::new(move |id| sink.borrow_mut().push(id));
        let paths = entries(&["A", "B", "C"]);
        let root = recycler.build(&paths, |r| r.to_string()).unwrap();

        let middle = root.next().unwrap();
        middle.dismiss_deeper();
        assert_eq!(*reported.borrow(), [paths[1].id()]);

        // the topmost level has nothing deeper to dismiss
        middle.next().unwrap().dismiss_deeper();
        assert_eq!(reported.borrow().len(), 1);
    }
}
