//! Element records
//!
//! An [`ElementRecord`] is one placeable unit of the canvas document. It is
//! owned by the external document model; the controller only reads it.
//!
//! Layout data is stored per display mode. Narrower modes only carry the
//! fields they override:
//!
//! ```json
//! {
//!   "id": "hero",
//!   "tag": "Section",
//!   "parent": "body",
//!   "layout": {
//!     "desktop": { "position": "absolute", "top": 40, "left": "10%", "width": 600 },
//!     "mobile": { "left": 0, "width": "100%" }
//!   }
//! }
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};
use tessel_core::StyleValue;

/// A length as written in layout data
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(try_from = "LengthRepr")]
pub enum Length {
    Px(f32),
    Percent(f32),
    Auto,
}

impl Length {
    pub fn to_style(self) -> StyleValue {
        match self {
            Length::Px(v) => StyleValue::Px(v),
            Length::Percent(v) => StyleValue::Percent(v),
            Length::Auto => StyleValue::keyword("auto"),
        }
    }
}

/// Error for a length string that is neither `auto`, `N`, `Npx` nor `N%`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseLengthError(String);

impl fmt::Display for ParseLengthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid length `{}`", self.0)
    }
}

impl std::error::Error for ParseLengthError {}

impl FromStr for Length {
    type Err = ParseLengthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Ok(Length::Auto);
        }

        let (number, percent) = match s.strip_suffix('%') {
            Some(number) => (number, true),
            None => (s.strip_suffix("px").unwrap_or(s), false),
        };
        let value: f32 = number
            .trim()
            .parse()
            .map_err(|_| ParseLengthError(s.to_string()))?;

        Ok(if percent {
            Length::Percent(value)
        } else {
            Length::Px(value)
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LengthRepr {
    Number(f32),
    Text(String),
}

impl TryFrom<LengthRepr> for Length {
    type Error = ParseLengthError;

    fn try_from(repr: LengthRepr) -> Result<Self, Self::Error> {
        match repr {
            LengthRepr::Number(v) => Ok(Length::Px(v)),
            LengthRepr::Text(s) => s.parse(),
        }
    }
}

impl Serialize for Length {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Length::Px(v) => serializer.serialize_f32(*v),
            other => serializer.collect_str(&other.to_style()),
        }
    }
}

/// Positioning scheme of an element box
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionKind {
    Static,
    Relative,
    Absolute,
    Fixed,
    Sticky,
}

impl PositionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PositionKind::Static => "static",
            PositionKind::Relative => "relative",
            PositionKind::Absolute => "absolute",
            PositionKind::Fixed => "fixed",
            PositionKind::Sticky => "sticky",
        }
    }
}

/// Layout fields for one display mode; unset fields inherit
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<PositionKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<Length>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<Length>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<Length>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<Length>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Length>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Length>,
}

impl LayoutData {
    /// Field-wise overlay: set fields of `over` win
    pub fn overlaid(&self, over: &LayoutData) -> LayoutData {
        LayoutData {
            position: over.position.or(self.position),
            top: over.top.or(self.top),
            right: over.right.or(self.right),
            bottom: over.bottom.or(self.bottom),
            left: over.left.or(self.left),
            width: over.width.or(self.width),
            height: over.height.or(self.height),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == LayoutData::default()
    }
}

/// Layout data for every display mode
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desktop: Option<LayoutData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tablet: Option<LayoutData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<LayoutData>,
}

/// One placeable unit of the canvas document
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    pub id: String,
    /// Element type, e.g. `Section` or `TextBox`
    pub tag: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub layout: LayoutSet,
}

impl ElementRecord {
    pub fn new(id: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag: tag.into(),
            parent: None,
            layout: LayoutSet::default(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_layout(mut self, layout: LayoutSet) -> Self {
        self.layout = layout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lengths() {
        assert_eq!("auto".parse::<Length>(), Ok(Length::Auto));
        assert_eq!("12".parse::<Length>(), Ok(Length::Px(12.0)));
        assert_eq!("12px".parse::<Length>(), Ok(Length::Px(12.0)));
        assert_eq!(" 50% ".parse::<Length>(), Ok(Length::Percent(50.0)));
        assert!("wide".parse::<Length>().is_err());
    }

    #[test]
    fn test_deserialize_record() {
        let record: ElementRecord = serde_json::from_str(
            r#"{
                "id": "hero",
                "tag": "Section",
                "parent": "body",
                "layout": {
                    "desktop": { "position": "absolute", "top": 40, "left": "10%" },
                    "mobile": { "left": 0 }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(record.parent.as_deref(), Some("body"));
        let desktop = record.layout.desktop.unwrap();
        assert_eq!(desktop.position, Some(PositionKind::Absolute));
        assert_eq!(desktop.top, Some(Length::Px(40.0)));
        assert_eq!(desktop.left, Some(Length::Percent(10.0)));
        assert!(record.layout.tablet.is_none());
    }

    #[test]
    fn test_bad_length_rejected() {
        let result: Result<LayoutData, _> = serde_json::from_str(r#"{"top":"far"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_overlay() {
        let base = LayoutData {
            top: Some(Length::Px(10.0)),
            width: Some(Length::Px(100.0)),
            ..Default::default()
        };
        let over = LayoutData {
            width: Some(Length::Percent(100.0)),
            ..Default::default()
        };
        let merged = base.overlaid(&over);
        assert_eq!(merged.top, Some(Length::Px(10.0)));
        assert_eq!(merged.width, Some(Length::Percent(100.0)));
    }
}
