//! Sign-in walkthrough used by `pilot demo`.

use std::fmt;
use std::mem;
use std::rc::Rc;

use pilot_core::{Pilot, WeakPilot};

/// Routes of the walkthrough app.
///
/// Routes compare by name only, so a `Profile` carrying any callback matches
/// every other `Profile`.
#[derive(Clone)]
pub enum AppRoute {
    Start,
    Home,
    SignIn,
    Profile { on_sign_out: Rc<dyn Fn()> },
}

impl AppRoute {
    /// A profile screen whose sign-out button unwinds `pilot` back to
    /// [`AppRoute::Start`].
    pub fn profile(pilot: WeakPilot<AppRoute>) -> Self {
        Self::Profile {
            on_sign_out: Rc::new(move || {
                if let Some(pilot) = pilot.upgrade() {
                    pilot.pop_to(&AppRoute::Start, false);
                }
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::Home => "Home",
            Self::SignIn => "SignIn",
            Self::Profile { .. } => "Profile",
        }
    }

    /// Press the sign-out button, if this screen has one.
    pub fn sign_out(&self) -> bool {
        match self {
            Self::Profile { on_sign_out } => {
                on_sign_out();
                true
            }
            _ => false,
        }
    }
}

impl PartialEq for AppRoute {
    fn eq(&self, other: &Self) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }
}

impl fmt::Debug for AppRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One user action of the walkthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoAction {
    /// "Let's Start" on the start screen.
    Begin,
    /// "Sign In" on the home screen.
    SignIn,
    /// "See your profile" after signing in.
    OpenProfile,
    /// "Profile again" on a profile screen.
    ProfileAgain,
    /// "Sign out" on the topmost profile.
    SignOut,
}

impl DemoAction {
    /// The full walkthrough in order.
    pub const SCRIPT: [DemoAction; 5] = [
        Self::Begin,
        Self::SignIn,
        Self::OpenProfile,
        Self::ProfileAgain,
        Self::SignOut,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Begin => "let's start",
            Self::SignIn => "sign in",
            Self::OpenProfile => "see your profile",
            Self::ProfileAgain => "profile again",
            Self::SignOut => "sign out",
        }
    }

    /// Perform the action against `pilot`.
    pub fn apply(self, pilot: &Pilot<AppRoute>) {
        match self {
            Self::Begin => pilot.push(AppRoute::Home),
            Self::SignIn => pilot.push(AppRoute::SignIn),
            Self::OpenProfile | Self::ProfileAgain => {
                pilot.push(AppRoute::profile(pilot.downgrade()));
            }
            Self::SignOut => {
                if let Some(top) = pilot.top() {
                    top.sign_out();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pilot_core::PilotConfig;

    fn pilot() -> Pilot<AppRoute> {
        Pilot::with_initial(AppRoute::Start, PilotConfig::with_debug(false))
    }

    #[test]
    fn test_routes_compare_by_name() {
        let pilot = pilot();
        assert_eq!(
            AppRoute::profile(pilot.downgrade()),
            AppRoute::profile(pilot.downgrade())
        );
        assert_ne!(AppRoute::Home, AppRoute::SignIn);
        assert_eq!(format!("{:?}", AppRoute::profile(pilot.downgrade())), "Profile");
    }

    #[test]
    fn test_walkthrough_ends_on_start() {
        let pilot = pilot();
        for action in &DemoAction::SCRIPT[..4] {
            action.apply(&pilot);
        }
        assert_eq!(
            pilot.stack(),
            [
                AppRoute::Start,
                AppRoute::Home,
                AppRoute::SignIn,
                AppRoute::profile(pilot.downgrade()),
                AppRoute::profile(pilot.downgrade()),
            ]
        );

        DemoAction::SignOut.apply(&pilot);
        assert_eq!(pilot.stack(), [AppRoute::Start]);
    }

    #[test]
    fn test_sign_out_after_pilot_dropped() {
        let pilot = pilot();
        let profile = AppRoute::profile(pilot.downgrade());
        drop(pilot);
        assert!(profile.sign_out());
        assert!(!AppRoute::Home.sign_out());
    }
}
