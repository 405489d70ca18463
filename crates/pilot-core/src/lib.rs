//! Navigation stack controller for declarative UIs.
//!
//! This crate keeps an ordered stack of routes, tells observers about every
//! change, and maps the stack onto a chain of nested presentation levels
//! without rebuilding screens that stay on the stack.
//!
//! # Overview
//!
//! - [`Pilot`] owns the stack and exposes `push`, `pop`, `pop_to` and
//!   `system_pop`.
//! - [`RouteObserver`] hooks are notified synchronously after each mutation.
//! - [`ViewRecycler`] builds the [`PresentationLink`] chain a rendering host
//!   displays, caching one screen per [`RouteEntry`].
//!
//! # Example
//!
//! ```
//! use pilot_core::{Pilot, PilotConfig, ViewRecycler};
//!
//! let pilot = Pilot::with_initial("Start", PilotConfig::default());
//! let mut recycler = ViewRecycler::attached(&pilot);
//!
//! pilot.push("Home");
//! pilot.push("SignIn");
//!
//! let root = recycler
//!     .build(&pilot.paths(), |route| route.to_uppercase())
//!     .expect("stack is not empty");
//! assert_eq!(root.active_screens(), ["START", "HOME", "SIGNIN"]);
//!
//! // The user swipes back from SignIn: the level below reports it.
//! root.next().unwrap().dismiss_deeper();
//! assert_eq!(pilot.stack(), ["Start", "Home"]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod link;
pub mod logger;
pub mod observer;
pub mod pilot;
pub mod recycler;
pub mod route;

pub use config::PilotConfig;
pub use link::{CameBack, PresentationLink};
pub use logger::{NoopLogger, RouteLogger, TraceLogger};
pub use observer::{ObserverRegistry, RouteObserver};
pub use pilot::{Pilot, WeakPilot};
pub use recycler::{CacheStats, SystemPopFn, ViewRecycler};
pub use route::{Route, RouteEntry, RouteId};
