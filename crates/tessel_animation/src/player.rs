//! Playback seam
//!
//! Effect playback (tweening opacity, transforms, ...) is done by an external
//! engine. The controller only tells it what to play on which node.

use std::cell::RefCell;

use tessel_core::NodeRef;

use crate::spec::AnimationEffect;

/// Options passed along with every playback request
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlaybackOptions {
    /// Playback duration in milliseconds
    pub duration: u64,
    /// Display value to apply while playing; `None` leaves it untouched
    pub display: Option<String>,
}

/// External animation engine entry point
///
/// Fire-and-forget: the controller does not observe completion.
pub trait AnimationPlayer {
    fn play(&self, target: &NodeRef, effect: &AnimationEffect, options: PlaybackOptions);
}

/// A recorded playback request
#[derive(Clone, Debug)]
pub struct PlaybackRecord {
    pub target: NodeRef,
    pub effect: AnimationEffect,
    pub options: PlaybackOptions,
}

/// Player that only records what it was asked to play
///
/// Used by headless hosts and tests.
#[derive(Debug, Default)]
pub struct RecordingPlayer {
    records: RefCell<Vec<PlaybackRecord>>,
}

impl RecordingPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn records(&self) -> Vec<PlaybackRecord> {
        self.records.borrow().clone()
    }

    pub fn last(&self) -> Option<PlaybackRecord> {
        self.records.borrow().last().cloned()
    }

    pub fn clear(&self) {
        self.records.borrow_mut().clear();
    }
}

impl AnimationPlayer for RecordingPlayer {
    fn play(&self, target: &NodeRef, effect: &AnimationEffect, options: PlaybackOptions) {
        tracing::debug!(?target, ?effect, duration = options.duration, "playback requested");
        self.records.borrow_mut().push(PlaybackRecord {
            target: target.clone(),
            effect: effect.clone(),
            options,
        });
    }
}
