//! Position resolution
//!
//! Maps an element's layout data and the current display mode to the style
//! patch that places its box. Pure and deterministic: the same record and
//! mode always give the same patch, so it is recomputed on every render.

use std::fmt;
use std::str::FromStr;

use tessel_core::{StylePatch, StyleValue};

use crate::record::{ElementRecord, LayoutData, LayoutSet};

/// Display mode the canvas is rendering for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DisplayMode {
    Desktop,
    Tablet,
    Mobile,
}

impl DisplayMode {
    /// Modes whose layout applies, widest first
    fn cascade(self) -> &'static [DisplayMode] {
        match self {
            DisplayMode::Desktop => &[DisplayMode::Desktop],
            DisplayMode::Tablet => &[DisplayMode::Desktop, DisplayMode::Tablet],
            DisplayMode::Mobile => &[DisplayMode::Desktop, DisplayMode::Tablet, DisplayMode::Mobile],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DisplayMode::Desktop => "desktop",
            DisplayMode::Tablet => "tablet",
            DisplayMode::Mobile => "mobile",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desktop" => Ok(DisplayMode::Desktop),
            "tablet" => Ok(DisplayMode::Tablet),
            "mobile" => Ok(DisplayMode::Mobile),
            _ => Err(()),
        }
    }
}

impl LayoutSet {
    pub fn for_mode(&self, mode: DisplayMode) -> Option<&LayoutData> {
        match mode {
            DisplayMode::Desktop => self.desktop.as_ref(),
            DisplayMode::Tablet => self.tablet.as_ref(),
            DisplayMode::Mobile => self.mobile.as_ref(),
        }
    }

    /// Effective layout for `mode` after cascading wider modes
    pub fn resolved(&self, mode: DisplayMode) -> LayoutData {
        mode.cascade()
            .iter()
            .filter_map(|m| self.for_mode(*m))
            .fold(LayoutData::default(), |acc, layer| acc.overlaid(layer))
    }
}

impl LayoutData {
    /// Style properties in a fixed order
    pub fn to_style_patch(&self) -> StylePatch {
        let mut patch = StylePatch::new();
        if let Some(position) = self.position {
            patch.set("position", StyleValue::keyword(position.as_str()));
        }
        let lengths = [
            ("top", self.top),
            ("right", self.right),
            ("bottom", self.bottom),
            ("left", self.left),
            ("width", self.width),
            ("height", self.height),
        ];
        for (property, length) in lengths {
            if let Some(length) = length {
                patch.set(property, length.to_style());
            }
        }
        patch
    }
}

/// Resolve the positional style patch for `element` in `display_mode`
///
/// An unknown display mode yields an empty patch.
pub fn resolve_position(element: &ElementRecord, display_mode: &str) -> StylePatch {
    match display_mode.parse::<DisplayMode>() {
        Ok(mode) => element.layout.resolved(mode).to_style_patch(),
        Err(()) => {
            tracing::trace!(element = %element.id, display_mode, "unknown display mode");
            StylePatch::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Length, PositionKind};

    fn record() -> ElementRecord {
        ElementRecord::new("hero", "Section").with_layout(LayoutSet {
            desktop: Some(LayoutData {
                position: Some(PositionKind::Absolute),
                top: Some(Length::Px(40.0)),
                left: Some(Length::Percent(10.0)),
                width: Some(Length::Px(600.0)),
                ..Default::default()
            }),
            tablet: Some(LayoutData {
                width: Some(Length::Px(400.0)),
                ..Default::default()
            }),
            mobile: Some(LayoutData {
                left: Some(Length::Px(0.0)),
                width: Some(Length::Percent(100.0)),
                ..Default::default()
            }),
        })
    }

    #[test]
    fn test_desktop() {
        let patch = resolve_position(&record(), "desktop");
        let props: Vec<_> = patch.iter().map(|(k, v)| (k, v.to_string())).collect();
        assert_eq!(
            props,
            vec![
                ("position", "absolute".to_string()),
                ("top", "40px".to_string()),
                ("left", "10%".to_string()),
                ("width", "600px".to_string()),
            ]
        );
    }

    #[test]
    fn test_cascade() {
        let tablet = resolve_position(&record(), "tablet");
        assert_eq!(tablet.get("width"), Some(&StyleValue::Px(400.0)));
        assert_eq!(tablet.get("left"), Some(&StyleValue::Percent(10.0)));

        let mobile = resolve_position(&record(), "Mobile");
        assert_eq!(mobile.get("width"), Some(&StyleValue::Percent(100.0)));
        assert_eq!(mobile.get("left"), Some(&StyleValue::Px(0.0)));
        assert_eq!(mobile.get("top"), Some(&StyleValue::Px(40.0)));
    }

    #[test]
    fn test_unknown_display_is_neutral() {
        assert!(resolve_position(&record(), "watch").is_empty());
        assert!(resolve_position(&record(), "").is_empty());
    }

    #[test]
    fn test_unknown_mode_with_trace_logging() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .finish();
        let patch = tracing::subscriber::with_default(subscriber, || {
            resolve_position(&record(), "watch")
        });
        assert!(patch.is_empty());
    }

    #[test]
    fn test_no_layout_is_empty() {
        let bare = ElementRecord::new("a", "TextBox");
        assert!(resolve_position(&bare, "desktop").is_empty());
    }

    #[test]
    fn test_idempotent() {
        let element = record();
        for display in ["desktop", "tablet", "mobile", "unknown"] {
            assert_eq!(
                resolve_position(&element, display),
                resolve_position(&element, display)
            );
        }
    }
}
