//! Rendered output
//!
//! Rendering an element produces a [`View`] tree: plain data describing the
//! element's tag, its style, and the capability boundaries wrapped around it.
//! The drag-and-drop engine, the empty placeholder and the highlight overlay
//! are external; they are reached through the [`Capabilities`] trait, whose
//! default methods emit the corresponding data nodes.
//!
//! ```text
//! Draggable            (editing + drag settings)
//! └── Tag              (html tag, id, style, pointer handlers)
//!     ├── Focused      (editing + focused)
//!     │   └── Droppable (editing + drop settings without a custom area)
//!     │       └── children
//!     └── Highlight    (editing + focused/selected/overed, not dragging)
//! ```

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tessel_core::{NodeRef, StylePatch};

use crate::record::ElementRecord;
use crate::settings::Settings;

/// Options the drop engine passes when previewing an insertion point
pub type PlaceholderOptions = Map<String, Value>;

/// A rendered node
#[derive(Clone, Debug, Default, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum View {
    #[default]
    Empty,
    Text {
        content: String,
    },
    Fragment {
        children: Vec<View>,
    },
    Tag(TagView),
    Draggable {
        props: DraggableProps,
        child: Box<View>,
    },
    Droppable {
        props: DroppableProps,
        child: Box<View>,
    },
    Focused {
        class_name: String,
        child: Box<View>,
    },
    Placeholder(PlaceholderProps),
    Highlight(HighlightProps),
}

impl View {
    pub fn text(content: impl Into<String>) -> Self {
        View::Text {
            content: content.into(),
        }
    }

    pub fn fragment(children: Vec<View>) -> Self {
        View::Fragment { children }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, View::Empty)
    }

    /// Direct children of this node
    pub fn children(&self) -> Vec<&View> {
        match self {
            View::Empty | View::Text { .. } | View::Placeholder(_) | View::Highlight(_) => {
                Vec::new()
            }
            View::Fragment { children } => children.iter().collect(),
            View::Tag(tag) => tag.children.iter().collect(),
            View::Draggable { child, .. }
            | View::Droppable { child, .. }
            | View::Focused { child, .. } => vec![child.as_ref()],
        }
    }

    /// This node and all of its descendants, pre-order
    pub fn descendants(&self) -> Vec<&View> {
        let mut out = vec![self];
        for child in self.children() {
            out.extend(child.descendants());
        }
        out
    }

    /// The first tag node in pre-order
    pub fn find_tag(&self) -> Option<&TagView> {
        self.descendants().into_iter().find_map(|view| match view {
            View::Tag(tag) => Some(tag),
            _ => None,
        })
    }
}

/// The element's own box
#[derive(Clone, Debug, Default, Serialize)]
pub struct TagView {
    /// Host tag name (`div`, `section`, ...)
    pub tag: String,
    /// Rendered identity; only set while editing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub class_name: String,
    pub style: StylePatch,
    /// Pointer enter/leave handlers are attached
    pub pointer_handlers: bool,
    /// The host should report this node through `capture_ref`
    pub captures_ref: bool,
    pub children: Vec<View>,
}

/// Kind of drag operation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragKind {
    #[default]
    Move,
}

/// What the drag engine picks up
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DragDescriptor {
    #[serde(rename = "type")]
    pub kind: DragKind,
    pub id: String,
    pub context: String,
    pub parent_id: Option<String>,
    pub position_in_parent: usize,
}

/// Input to the draggable boundary
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraggableProps {
    pub drag_info: DragDescriptor,
    /// A click handler is attached; clicks select the element
    pub on_click: bool,
    /// Element type (`ElementRecord::tag`)
    #[serde(rename = "type")]
    pub element_type: String,
    pub disabled: bool,
    /// Drag options from settings, forwarded as-is
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

/// Where dropped items land
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DropDescriptor {
    pub id: String,
    pub context: String,
}

/// Renders the empty marker previewing an insertion point
#[derive(Clone)]
pub struct PlaceholderRenderer(Rc<dyn Fn(&PlaceholderOptions) -> View>);

impl PlaceholderRenderer {
    pub fn new(render: impl Fn(&PlaceholderOptions) -> View + 'static) -> Self {
        Self(Rc::new(render))
    }

    pub fn render(&self, options: &PlaceholderOptions) -> View {
        (self.0)(options)
    }
}

impl fmt::Debug for PlaceholderRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PlaceholderRenderer")
    }
}

/// Input to the droppable boundary
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppableProps {
    pub drop_info: DropDescriptor,
    #[serde(rename = "type")]
    pub element_type: String,
    pub placeholder: bool,
    #[serde(skip)]
    pub placeholder_render: PlaceholderRenderer,
    /// Drop options from settings, forwarded as-is
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

/// Input to the empty-placeholder renderer
#[derive(Clone, Debug, Serialize)]
pub struct PlaceholderProps {
    /// Positioning and sizing from the drop engine
    #[serde(flatten)]
    pub options: PlaceholderOptions,
    pub settings: Settings,
    pub element: ElementRecord,
}

/// Input to the highlight overlay renderer
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightProps {
    pub element: ElementRecord,
    pub settings: Settings,
    pub selected: bool,
    pub focused: bool,
    pub content_element_id: Option<String>,
    #[serde(skip)]
    pub dom: NodeRef,
}

/// External capability boundaries
///
/// Hosts with a real drag-and-drop engine or overlay renderer implement this
/// and return whatever node their renderer needs; the defaults produce the
/// data nodes of [`View`].
pub trait Capabilities {
    fn draggable(&self, props: DraggableProps, child: View) -> View {
        View::Draggable {
            props,
            child: Box::new(child),
        }
    }

    fn droppable(&self, props: DroppableProps, child: View) -> View {
        View::Droppable {
            props,
            child: Box::new(child),
        }
    }

    fn placeholder(&self, props: PlaceholderProps) -> View {
        View::Placeholder(props)
    }

    fn highlight(&self, props: HighlightProps) -> View {
        View::Highlight(props)
    }
}

/// Capabilities that render plain data nodes
#[derive(Clone, Copy, Debug, Default)]
pub struct DataCapabilities;

impl Capabilities for DataCapabilities {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descendants_preorder() {
        let view = View::Focused {
            class_name: "focused".into(),
            child: Box::new(View::fragment(vec![View::text("a"), View::text("b")])),
        };
        let kinds: Vec<_> = view
            .descendants()
            .iter()
            .map(|v| match v {
                View::Focused { .. } => "focused",
                View::Fragment { .. } => "fragment",
                View::Text { content } => content.as_str(),
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, vec!["focused", "fragment", "a", "b"]);
    }

    #[test]
    fn test_serialize_tagged() {
        let view = View::Tag(TagView {
            tag: "div".into(),
            children: vec![View::text("hi")],
            ..Default::default()
        });
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["kind"], "tag");
        assert_eq!(json["tag"], "div");
        assert_eq!(json["children"][0]["kind"], "text");
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_drag_descriptor_json() {
        let descriptor = DragDescriptor {
            kind: DragKind::Move,
            id: "a".into(),
            context: "canvas".into(),
            parent_id: Some("body".into()),
            position_in_parent: 2,
        };
        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json["type"], "move");
        assert_eq!(json["parentId"], "body");
        assert_eq!(json["positionInParent"], 2);
    }
}
