//! Pilot configuration.

use serde::{Deserialize, Serialize};

use crate::logger::{NoopLogger, RouteLogger, TraceLogger};

/// Construction settings for a [`Pilot`](crate::Pilot).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PilotConfig {
    /// Route diagnostics to `tracing` (TRACE level) instead of discarding them.
    pub debug: bool,
}

impl Default for PilotConfig {
    fn default() -> Self {
        Self { debug: true }
    }
}

impl PilotConfig {
    /// Create a config with diagnostics enabled or disabled.
    #[must_use]
    pub fn with_debug(debug: bool) -> Self {
        Self { debug }
    }

    /// Build the logger selected by this config.
    #[must_use]
    pub fn logger(&self) -> Box<dyn RouteLogger> {
        if self.debug {
            Box::new(TraceLogger)
        } else {
            Box::new(NoopLogger)
        }
    }
}
