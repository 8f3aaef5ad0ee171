//! Animation configuration

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque effect descriptor handed to the playback engine
///
/// Either a named effect (`"fadeIn"`, `"transition.slideUpIn"`) or an
/// arbitrary property map the engine understands.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnimationEffect {
    Named(String),
    Properties(serde_json::Map<String, Value>),
}

impl AnimationEffect {
    pub fn named(name: impl Into<String>) -> Self {
        AnimationEffect::Named(name.into())
    }

    /// Name of a named effect
    pub fn name(&self) -> Option<&str> {
        match self {
            AnimationEffect::Named(name) => Some(name),
            AnimationEffect::Properties(_) => None,
        }
    }
}

/// Entrance animation configured on an element
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationSpec {
    pub effect: AnimationEffect,
    /// Playback duration in milliseconds
    #[serde(default)]
    pub duration: u64,
    /// Delay between the trigger and playback start, in milliseconds
    #[serde(default)]
    pub delay: u64,
}

impl AnimationSpec {
    pub fn new(effect: AnimationEffect, duration: u64, delay: u64) -> Self {
        Self {
            effect,
            duration,
            delay,
        }
    }
}
