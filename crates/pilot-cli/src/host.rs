//! Text rendering host.
//!
//! [`TextHost`] plays the part a UI toolkit plays for `pilot_core`: it
//! subscribes to the pilot once, rebuilds the presentation chain whenever the
//! stack changes, draws the presented levels as an indented tree, and reports
//! platform dismissals ("back") through the chain.

use std::cell::{Cell, RefCell};
use std::fmt::Write as _;
use std::rc::Rc;

use pilot_core::{
    CacheStats, Pilot, PresentationLink, Route, RouteObserver, ViewRecycler, WeakPilot,
};

use crate::config::RenderConfig;

/// Observer id the host registers under.
pub const HOST_OBSERVER_ID: &str = "text-host";

/// A rendered screen.
#[derive(Debug, PartialEq, Eq)]
pub struct TextScreen {
    /// Title drawn for the screen.
    pub title: String,
    /// Sequence number of the build that produced this screen.
    pub build: u64,
}

type Screen = Rc<TextScreen>;
type TitleFn<T> = Box<dyn Fn(&T) -> String>;

struct HostView<T> {
    pilot: WeakPilot<T>,
    recycler: RefCell<ViewRecycler<Screen>>,
    root: RefCell<Option<PresentationLink<Screen>>>,
    title: TitleFn<T>,
    builds: Cell<u64>,
}

impl<T: Route> HostView<T> {
    fn rebuild(&self) {
        let Some(pilot) = self.pilot.upgrade() else {
            return;
        };
        let paths = pilot.paths();
        let root = self.recycler.borrow_mut().build(&paths, |route| {
            let build = self.builds.get() + 1;
            self.builds.set(build);
            Rc::new(TextScreen {
                title: (self.title)(route),
                build,
            })
        });
        self.root.replace(root);
    }
}

impl<T: Route> RouteObserver<T> for HostView<T> {
    fn id(&self) -> &str {
        HOST_OBSERVER_ID
    }

    fn on_route_change(&self, _old_routes: &[T], _new_routes: &[T]) {
        self.rebuild();
    }
}

/// Draws a pilot's stack as text.
pub struct TextHost<T> {
    pilot: Pilot<T>,
    view: Rc<HostView<T>>,
    render: RenderConfig,
    attached: bool,
}

impl<T: Route> TextHost<T> {
    /// Attach a host to `pilot`, titling screens with `title`.
    ///
    /// A pilot drives one host. A second host is drawn once but never
    /// rebuilt; see [`TextHost::is_attached`].
    pub fn new(
        pilot: Pilot<T>,
        render: RenderConfig,
        title: impl Fn(&T) -> String + 'static,
    ) -> Self {
        let view = Rc::new(HostView {
            pilot: pilot.downgrade(),
            recycler: RefCell::new(ViewRecycler::attached(&pilot)),
            root: RefCell::new(None),
            title: Box::new(title),
            builds: Cell::new(0),
        });
        let attached = pilot.add_observer(view.clone());
        if !attached {
            tracing::warn!(
                observer = HOST_OBSERVER_ID,
                "pilot already has a host, this one will not follow stack changes"
            );
        }
        view.rebuild();
        Self {
            pilot,
            view,
            render,
            attached,
        }
    }

    /// Whether this host receives the pilot's stack changes.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// The pilot this host draws.
    pub fn pilot(&self) -> &Pilot<T> {
        &self.pilot
    }

    /// Root of the current presentation chain.
    pub fn root(&self) -> Option<PresentationLink<Screen>> {
        self.view.root.borrow().clone()
    }

    /// Simulate the platform dismissing the deepest presented level.
    ///
    /// Returns `false` when only the root is presented.
    pub fn back(&self) -> bool {
        let Some(root) = self.root() else {
            return false;
        };
        let mut parent = root;
        loop {
            let Some(next) = parent.next().filter(|_| parent.is_active()) else {
                return false;
            };
            if next.is_active() {
                parent = next;
            } else {
                parent.dismiss_deeper();
                return true;
            }
        }
    }

    /// Draw the presented levels, root first, one line each.
    pub fn render(&self) -> String {
        let Some(root) = self.root() else {
            return "(empty)".to_string();
        };
        let mut out = String::new();
        for (depth, screen) in root.active_screens().iter().enumerate() {
            if depth > 0 {
                out.push('\n');
            }
            let pad = " ".repeat(depth * self.render.indent);
            let _ = write!(out, "{pad}{}", screen.title);
            if self.render.show_builds {
                let _ = write!(out, " [#{}]", screen.build);
            }
        }
        out
    }

    /// Number of screens built so far.
    pub fn builds(&self) -> u64 {
        self.view.builds.get()
    }

    /// Screen cache counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.view.recycler.borrow().stats()
    }

    /// Number of screens currently cached.
    pub fn cached_screens(&self) -> usize {
        self.view.recycler.borrow().cached_len()
    }
}
