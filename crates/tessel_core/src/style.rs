//! Style patches
//!
//! A [`StylePatch`] is an ordered set of style properties. Patches compose by
//! merging: properties set on the later patch override the earlier one, and
//! unset properties are left alone. Element rendering builds its final style
//! as `base.merged(position)` followed by any animation override.
//!
//! ```rust
//! use tessel_core::style::{StylePatch, StyleValue};
//!
//! let base = StylePatch::new()
//!     .with("color", StyleValue::keyword("red"))
//!     .with("top", StyleValue::Px(4.0));
//! let position = StylePatch::new().with("top", StyleValue::Px(20.0));
//!
//! let style = base.merged(&position);
//! assert_eq!(style.get("top"), Some(&StyleValue::Px(20.0)));
//! assert_eq!(style.get("color"), Some(&StyleValue::keyword("red")));
//! ```

use std::fmt;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// A single style property value
#[derive(Clone, Debug, PartialEq)]
pub enum StyleValue {
    /// Length in pixels
    Px(f32),
    /// Length relative to the containing block
    Percent(f32),
    /// Unitless number (opacity, z-order, flex factors)
    Number(f32),
    /// Keyword or any other raw value (`auto`, `absolute`, ...)
    Keyword(String),
}

impl StyleValue {
    pub fn keyword(value: impl Into<String>) -> Self {
        StyleValue::Keyword(value.into())
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Px(v) => write!(f, "{v}px"),
            StyleValue::Percent(v) => write!(f, "{v}%"),
            StyleValue::Number(v) => write!(f, "{v}"),
            StyleValue::Keyword(k) => f.write_str(k),
        }
    }
}

impl Serialize for StyleValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StyleValue::Number(v) => serializer.serialize_f32(*v),
            other => serializer.collect_str(other),
        }
    }
}

/// Ordered style properties
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StylePatch {
    properties: IndexMap<String, StyleValue>,
}

impl StylePatch {
    /// Create a new empty patch
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, builder style
    pub fn with(mut self, property: impl Into<String>, value: StyleValue) -> Self {
        self.set(property, value);
        self
    }

    /// Set a property, replacing any previous value in place
    pub fn set(&mut self, property: impl Into<String>, value: StyleValue) {
        self.properties.insert(property.into(), value);
    }

    pub fn get(&self, property: &str) -> Option<&StyleValue> {
        self.properties.get(property)
    }

    pub fn remove(&mut self, property: &str) -> Option<StyleValue> {
        self.properties.shift_remove(property)
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Merge another patch over this one
    ///
    /// Properties from `other` override; everything else is kept.
    pub fn merge(&mut self, other: &StylePatch) {
        for (property, value) in &other.properties {
            self.properties.insert(property.clone(), value.clone());
        }
    }

    /// Merge and return the result
    pub fn merged(&self, other: &StylePatch) -> StylePatch {
        let mut result = self.clone();
        result.merge(other);
        result
    }
}

impl<K: Into<String>> FromIterator<(K, StyleValue)> for StylePatch {
    fn from_iter<I: IntoIterator<Item = (K, StyleValue)>>(iter: I) -> Self {
        let mut patch = StylePatch::new();
        for (k, v) in iter {
            patch.set(k, v);
        }
        patch
    }
}
