//! Per-element settings
//!
//! Settings come from the element type's definition. The controller reads
//! the recognised drag/drop switches, and the boundaries receive every
//! option, recognised or not.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// Drag capability options
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragSettings {
    /// `Some(false)` forbids dragging the element while it is selected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drag_selected: Option<bool>,
    /// Options for the drag-and-drop engine
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl DragSettings {
    /// Whether selection disables dragging
    pub fn locks_when_selected(&self) -> bool {
        self.drag_selected == Some(false)
    }

    /// All options as handed to the draggable boundary, `dragSelected` included
    pub fn forwarded_options(&self) -> Map<String, Value> {
        let mut options = self.options.clone();
        if let Some(drag_selected) = self.drag_selected {
            options.insert("dragSelected".into(), Value::Bool(drag_selected));
        }
        options
    }
}

/// Drop capability options
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropSettings {
    /// The element renders its own drop area; children are not wrapped
    #[serde(default)]
    pub custom_drop_area: bool,
    /// Options for the drag-and-drop engine
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl DropSettings {
    /// All options as handed to the droppable boundary, `customDropArea` included
    pub fn forwarded_options(&self) -> Map<String, Value> {
        let mut options = self.options.clone();
        options.insert("customDropArea".into(), Value::Bool(self.custom_drop_area));
        options
    }
}

/// Configuration bundle for one element type
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drag: Option<DragSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drop: Option<DropSettings>,
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn with_drag(mut self, drag: DragSettings) -> Self {
        self.drag = Some(drag);
        self
    }

    pub fn with_drop(mut self, drop: DropSettings) -> Self {
        self.drop = Some(drop);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recognised_and_passthrough() {
        let settings = Settings::from_json(
            r#"{
                "drag": { "dragSelected": false, "handle": ".grip" },
                "drop": { "customDropArea": true, "accepts": ["Text", "Image"] }
            }"#,
        )
        .unwrap();

        let drag = settings.drag.unwrap();
        assert!(drag.locks_when_selected());
        assert_eq!(drag.options.get("handle"), Some(&Value::from(".grip")));
        assert!(!drag.options.contains_key("dragSelected"));

        let drop = settings.drop.unwrap();
        assert!(drop.custom_drop_area);
        assert!(drop.options.contains_key("accepts"));
    }

    #[test]
    fn test_forwarded_options_keep_recognised_keys() {
        let settings = Settings::from_json(
            r#"{
                "drag": { "dragSelected": false, "handle": ".grip" },
                "drop": { "accepts": ["Text"] }
            }"#,
        )
        .unwrap();

        let drag = settings.drag.unwrap().forwarded_options();
        assert_eq!(drag.get("dragSelected"), Some(&Value::Bool(false)));
        assert_eq!(drag.get("handle"), Some(&Value::from(".grip")));

        let drop = settings.drop.unwrap().forwarded_options();
        assert_eq!(drop.get("customDropArea"), Some(&Value::Bool(false)));
        assert!(drop.contains_key("accepts"));

        let bare = DragSettings::default().forwarded_options();
        assert!(bare.is_empty());
    }

    #[test]
    fn test_empty_settings() {
        let settings = Settings::from_json("{}").unwrap();
        assert!(settings.drag.is_none());
        assert!(settings.drop.is_none());
    }

    #[test]
    fn test_drag_selected_defaults_to_unlocked() {
        let settings = Settings::from_json(r#"{"drag":{}}"#).unwrap();
        assert!(!settings.drag.unwrap().locks_when_selected());
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(Settings::from_json(r#"{"drop":{"customDropArea":"yes"}}"#).is_err());
    }
}
