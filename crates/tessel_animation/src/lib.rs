//! Tessel Animation
//!
//! Entrance and editing-replay animation lifecycle for canvas elements.
//!
//! # Features
//!
//! - **AnimationSpec**: effect descriptor plus duration and delay
//! - **AnimationController**: `Idle → Scheduled → Triggered` per element,
//!   with a single superseding delay timer
//! - **Editing replays**: subscribe to the editor's broadcast and replay on
//!   every signal
//! - **AnimationPlayer**: seam to the external playback engine

pub mod controller;
pub mod player;
pub mod spec;

pub use controller::{
    is_pre_animation_hidden, AnimationController, AnimationHooks, AnimationPhase,
    WeakAnimationController,
};
pub use player::{AnimationPlayer, PlaybackOptions, PlaybackRecord, RecordingPlayer};
pub use spec::{AnimationEffect, AnimationSpec};
