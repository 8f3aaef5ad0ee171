//! Caller inputs
//!
//! Everything an element renders from arrives as [`ElementProps`] each render
//! cycle. Shared state is never mutated here: the element asks its owner to
//! change it through [`ElementCallbacks`].

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tessel_animation::AnimationSpec;
use tessel_core::StylePatch;

use crate::record::ElementRecord;
use crate::settings::Settings;
use crate::view::View;

/// Interaction state owned by the element's collection
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InteractionFlags {
    /// Authoring-time rendering (as opposed to the published page)
    pub editing: bool,
    pub selected: bool,
    /// Pointer is over the element
    pub overed: bool,
    /// A drag is in progress anywhere on the canvas
    pub dragging: bool,
    /// The entrance animation has played
    pub animated: bool,
    /// An editing replay has been reset and not yet started
    pub animated_editing: bool,
    pub focused: bool,
    pub disable_selection: bool,
}

/// Per-render inputs of one element
#[derive(Clone, Debug)]
pub struct ElementProps {
    pub element: ElementRecord,
    /// Display mode name, e.g. `desktop`
    pub display: String,
    pub settings: Settings,
    pub position_in_parent: usize,
    pub html_tag: String,
    pub class_name: String,
    /// Base style; position is merged over it
    pub style: StylePatch,
    pub animation: Option<AnimationSpec>,
    pub flags: InteractionFlags,
    pub content_element_id: Option<String>,
    /// Interaction context tag of the canvas region
    pub context: String,
    pub children: View,
}

impl ElementProps {
    pub fn new(element: ElementRecord) -> Self {
        Self {
            element,
            display: "desktop".to_string(),
            settings: Settings::default(),
            position_in_parent: 0,
            html_tag: "div".to_string(),
            class_name: String::new(),
            style: StylePatch::new(),
            animation: None,
            flags: InteractionFlags::default(),
            content_element_id: None,
            context: "canvas".to_string(),
            children: View::Empty,
        }
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = display.into();
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_position_in_parent(mut self, position: usize) -> Self {
        self.position_in_parent = position;
        self
    }

    pub fn with_html_tag(mut self, tag: impl Into<String>) -> Self {
        self.html_tag = tag.into();
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    pub fn with_style(mut self, style: StylePatch) -> Self {
        self.style = style;
        self
    }

    pub fn with_animation(mut self, animation: Option<AnimationSpec>) -> Self {
        self.animation = animation;
        self
    }

    pub fn with_flags(mut self, flags: InteractionFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_editing(mut self, editing: bool) -> Self {
        self.flags.editing = editing;
        self
    }

    pub fn with_content_element_id(mut self, id: impl Into<String>) -> Self {
        self.content_element_id = Some(id.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    pub fn with_children(mut self, children: View) -> Self {
        self.children = children;
        self
    }
}

/// Request carrying an element id and its interaction context
pub type ElementRequest = Rc<dyn Fn(&str, &str)>;

/// Mutation requests the element sends to its owner
#[derive(Clone)]
pub struct ElementCallbacks {
    pub select_element: ElementRequest,
    pub over_element: ElementRequest,
    pub out_element: ElementRequest,
    pub start_animation: Rc<dyn Fn()>,
    pub reset_animation: Rc<dyn Fn()>,
    /// Called once when the element first enters the viewport
    pub on_enter_screen: Option<Rc<dyn Fn()>>,
}

impl Default for ElementCallbacks {
    fn default() -> Self {
        Self {
            select_element: Rc::new(|_, _| {}),
            over_element: Rc::new(|_, _| {}),
            out_element: Rc::new(|_, _| {}),
            start_animation: Rc::new(|| {}),
            reset_animation: Rc::new(|| {}),
            on_enter_screen: None,
        }
    }
}

impl ElementCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_select(mut self, f: impl Fn(&str, &str) + 'static) -> Self {
        self.select_element = Rc::new(f);
        self
    }

    pub fn on_over(mut self, f: impl Fn(&str, &str) + 'static) -> Self {
        self.over_element = Rc::new(f);
        self
    }

    pub fn on_out(mut self, f: impl Fn(&str, &str) + 'static) -> Self {
        self.out_element = Rc::new(f);
        self
    }

    pub fn on_start_animation(mut self, f: impl Fn() + 'static) -> Self {
        self.start_animation = Rc::new(f);
        self
    }

    pub fn on_reset_animation(mut self, f: impl Fn() + 'static) -> Self {
        self.reset_animation = Rc::new(f);
        self
    }

    pub fn on_enter_screen(mut self, f: impl Fn() + 'static) -> Self {
        self.on_enter_screen = Some(Rc::new(f));
        self
    }
}

impl fmt::Debug for ElementCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementCallbacks")
            .field("on_enter_screen", &self.on_enter_screen.is_some())
            .finish_non_exhaustive()
    }
}
