//! Element controller configuration
//!
//! Loaded from a `tessel.toml`; every field is optional:
//!
//! ```toml
//! hover_out_debounce_ms = 50
//! playback_display = "block"
//! focus_class = "focused"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ElementError, Result};

/// Default grace window before a hover-out is requested
pub const DEFAULT_HOVER_OUT_DEBOUNCE_MS: u64 = 50;

/// Tunables shared by every mounted element
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementConfig {
    /// Delay between pointer-leave and the hover-out request
    pub hover_out_debounce_ms: u64,
    /// Display value handed to the playback engine; unset leaves it alone
    pub playback_display: Option<String>,
    /// Class of the focus-indicator wrapper
    pub focus_class: String,
}

impl Default for ElementConfig {
    fn default() -> Self {
        Self {
            hover_out_debounce_ms: DEFAULT_HOVER_OUT_DEBOUNCE_MS,
            playback_display: None,
            focus_class: default_focus_class(),
        }
    }
}

fn default_focus_class() -> String {
    "focused".to_string()
}

impl ElementConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ElementError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), ?config, "loaded element config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ElementConfig::from_toml_str("").unwrap();
        assert_eq!(config, ElementConfig::default());
        assert_eq!(config.hover_out_debounce_ms, 50);
        assert_eq!(config.playback_display, None);
        assert_eq!(config.focus_class, "focused");
    }

    #[test]
    fn test_partial_override() {
        let config = ElementConfig::from_toml_str(
            r#"
            hover_out_debounce_ms = 120
            playback_display = "block"
            "#,
        )
        .unwrap();
        assert_eq!(config.hover_out_debounce_ms, 120);
        assert_eq!(config.playback_display.as_deref(), Some("block"));
        assert_eq!(config.focus_class, "focused");
    }

    #[test]
    fn test_invalid_toml() {
        let err = ElementConfig::from_toml_str("hover_out_debounce_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, ElementError::Config(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = ElementConfig::load("/nonexistent/tessel.toml").unwrap_err();
        assert!(matches!(err, ElementError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/tessel.toml"));
    }
}
