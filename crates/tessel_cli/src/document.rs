//! Element documents
//!
//! A document describes one element as the canvas would hand it over:
//!
//! ```json
//! {
//!   "element": { "id": "hero", "tag": "Section", "layout": { "desktop": { "top": 40 } } },
//!   "settings": { "drag": {}, "drop": { "customDropArea": false } },
//!   "animation": { "effect": "fadeIn", "duration": 300, "delay": 100 },
//!   "height": 120
//! }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tessel_animation::AnimationSpec;
use tessel_element::{ElementProps, ElementRecord, InteractionFlags, Settings, View};

fn default_height() -> f32 {
    100.0
}

/// One element with its settings and animation
#[derive(Debug, Deserialize, Serialize)]
pub struct ElementDocument {
    pub element: ElementRecord,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub animation: Option<AnimationSpec>,
    /// Rendered box height in pixels, used when simulating scrolls
    #[serde(default = "default_height")]
    pub height: f32,
    #[serde(default)]
    pub class_name: String,
    /// Text content placed inside the element
    #[serde(default)]
    pub content: Option<String>,
}

impl ElementDocument {
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let document: Self = serde_json::from_str(&source)
            .with_context(|| format!("invalid element document {}", path.display()))?;
        tracing::debug!(element = %document.element.id, "loaded document");
        Ok(document)
    }

    /// Props for rendering this element
    pub fn props(&self, display: &str, flags: InteractionFlags) -> ElementProps {
        let children = self
            .content
            .as_deref()
            .map(View::text)
            .unwrap_or_default();

        ElementProps::new(self.element.clone())
            .with_display(display)
            .with_settings(self.settings.clone())
            .with_class_name(self.class_name.clone())
            .with_animation(self.animation.clone())
            .with_flags(flags)
            .with_children(children)
    }
}
