//! Tessel Core Runtime
//!
//! Foundational primitives for Tessel canvas elements:
//!
//! - **Timers**: one-shot timers on a host-advanced clock, cancellable by handle
//! - **Channels**: host-owned publish/subscribe for scroll and broadcast signals
//! - **Host seams**: element boxes, window metrics and node references
//! - **Styles**: ordered, mergeable style patches
//!
//! Everything here is single-threaded: one UI event loop owns the scheduler
//! and the channels, and callbacks run to completion on that loop.

pub mod channel;
pub mod geometry;
pub mod host;
pub mod style;
pub mod timer;

pub use channel::{AnimateSignal, Channel, ScrollEvent, SubscriptionId};
pub use geometry::Rect;
pub use host::{HostNode, HostWindow, ManualNode, ManualWindow, NodeRef};
pub use style::{StylePatch, StyleValue};
pub use timer::{TimerHandle, TimerId, TimerScheduler};
