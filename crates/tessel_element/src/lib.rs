//! Tessel Element
//!
//! Controller for a single placeable element on a drag-and-drop page
//! building canvas.
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use tessel_element::prelude::*;
//!
//! let scheduler = TimerScheduler::new();
//! let env = Environment::new(
//!     scheduler.handle(),
//!     Rc::new(ManualWindow::new(800.0)),
//!     Rc::new(RecordingPlayer::new()),
//! );
//!
//! let element = ElementRecord::new("hero", "Text");
//! let props = ElementProps::new(element).with_editing(true);
//! let node = NodeRef::new(ManualNode::new("hero", Rect::new(0.0, 0.0, 40.0, 200.0)));
//!
//! let view = ElementView::mount(props, ElementCallbacks::new(), node, &env);
//! let rendered = view.render();
//! assert_eq!(rendered.find_tag().and_then(|t| t.id.as_deref()), Some("hero"));
//! ```
//!
//! # Modules
//!
//! - [`position`]: layout data and display mode to a style patch
//! - [`visibility`]: one-shot viewport entry detection
//! - [`interaction`]: debounced hover and click-to-select requests
//! - [`composition`]: which drag/drop boundaries wrap an element
//! - [`element`]: the composition root tying it all together

pub mod composition;
pub mod config;
pub mod element;
pub mod error;
pub mod event;
pub mod interaction;
pub mod position;
pub mod props;
pub mod record;
pub mod settings;
pub mod view;
pub mod visibility;

pub use composition::Composition;
pub use config::{ElementConfig, DEFAULT_HOVER_OUT_DEBOUNCE_MS};
pub use element::{ElementView, Environment};
pub use error::{ElementError, Result};
pub use event::{bubble_click, PointerEvent};
pub use interaction::{HoverSnapshot, InteractionController, InteractionHost, InteractionRequest};
pub use position::{resolve_position, DisplayMode};
pub use props::{ElementCallbacks, ElementProps, InteractionFlags};
pub use record::{ElementRecord, LayoutData, LayoutSet, Length, PositionKind};
pub use settings::{DragSettings, DropSettings, Settings};
pub use view::{
    Capabilities, DataCapabilities, DragDescriptor, DragKind, DraggableProps, DropDescriptor,
    DroppableProps, HighlightProps, PlaceholderOptions, PlaceholderProps, PlaceholderRenderer,
    TagView, View,
};
pub use visibility::{intersects_viewport, VisibilityWatcher};

/// Everything needed to mount and drive elements
pub mod prelude {
    pub use crate::{
        bubble_click, resolve_position, Capabilities, Composition, DataCapabilities,
        DragSettings, DropSettings, ElementCallbacks, ElementConfig, ElementProps,
        ElementRecord, ElementView, Environment, InteractionFlags, LayoutData, LayoutSet,
        Length, PointerEvent, PositionKind, Settings, View,
    };
    pub use tessel_animation::{AnimationEffect, AnimationPhase, AnimationSpec, RecordingPlayer};
    pub use tessel_core::{
        AnimateSignal, Channel, ManualNode, ManualWindow, NodeRef, Rect, ScrollEvent,
        StylePatch, StyleValue, TimerScheduler,
    };
}
