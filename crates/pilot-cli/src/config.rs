//! CLI configuration file.
//!
//! ```toml
//! [pilot]
//! debug = true
//!
//! [render]
//! indent = 4
//! show_builds = false
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use pilot_core::PilotConfig;
use serde::{Deserialize, Serialize};

/// Settings loaded from `--config`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Navigation stack settings.
    pub pilot: PilotConfig,
    /// Text rendering settings.
    pub render: RenderConfig,
}

/// How the text host draws the presentation chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Spaces added per navigation level.
    pub indent: usize,
    /// Append the build number of each screen, showing which screens were reused.
    pub show_builds: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            indent: 2,
            show_builds: true,
        }
    }
}

impl CliConfig {
    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("parse config")
    }

    /// Load the config file at `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("load config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = CliConfig::load(None).unwrap();
        assert_eq!(config, CliConfig::default());
        assert!(config.pilot.debug);
        assert_eq!(config.render.indent, 2);
    }

    #[test]
    fn test_partial_document() {
        let config = CliConfig::from_toml("[render]\nshow_builds = false\n").unwrap();
        assert!(!config.render.show_builds);
        assert_eq!(config.render.indent, 2);
        assert!(config.pilot.debug);
    }

    #[test]
    fn test_invalid_document() {
        let err = CliConfig::from_toml("[render]\nindent = \"wide\"\n").unwrap_err();
        assert!(err.to_string().contains("parse config"));
    }
}
