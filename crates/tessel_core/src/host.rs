//! Host seams
//!
//! The element controller never touches a real document. It reads element
//! boxes and the window height through these traits, and passes [`NodeRef`]s
//! on to external collaborators (playback, highlight) untouched.
//!
//! `ManualNode` and `ManualWindow` are headless implementations whose values
//! the host (or a test) sets directly.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::geometry::Rect;

/// A rendered element box on the host side
pub trait HostNode {
    /// Bounding box relative to the viewport
    fn bounding_rect(&self) -> Rect;

    /// Host identifier used in logs
    fn debug_name(&self) -> String {
        String::from("node")
    }
}

/// The window the canvas lives in
pub trait HostWindow {
    /// Outer height of the browser window / viewport in pixels
    fn outer_height(&self) -> f32;
}

/// Shared reference to a host node
#[derive(Clone)]
pub struct NodeRef(Rc<dyn HostNode>);

impl NodeRef {
    pub fn new(node: impl HostNode + 'static) -> Self {
        Self(Rc::new(node))
    }

    pub fn from_rc(node: Rc<dyn HostNode>) -> Self {
        Self(node)
    }

    pub fn bounding_rect(&self) -> Rect {
        self.0.bounding_rect()
    }

    /// Whether two refs point at the same host node
    pub fn same_node(&self, other: &NodeRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeRef").field(&self.0.debug_name()).finish()
    }
}

/// Headless node with a settable bounding box
#[derive(Debug, Default)]
pub struct ManualNode {
    name: String,
    rect: Cell<Rect>,
}

impl ManualNode {
    pub fn new(name: impl Into<String>, rect: Rect) -> Self {
        Self {
            name: name.into(),
            rect: Cell::new(rect),
        }
    }

    pub fn set_rect(&self, rect: Rect) {
        self.rect.set(rect);
    }

    /// Move the box vertically, as a page scroll would
    pub fn scroll_by(&self, dy: f32) {
        self.rect.set(self.rect.get().translate_y(-dy));
    }
}

impl HostNode for ManualNode {
    fn bounding_rect(&self) -> Rect {
        self.rect.get()
    }

    fn debug_name(&self) -> String {
        self.name.clone()
    }
}

/// Headless window with a settable height
#[derive(Debug)]
pub struct ManualWindow {
    outer_height: Cell<f32>,
}

impl ManualWindow {
    pub fn new(outer_height: f32) -> Self {
        Self {
            outer_height: Cell::new(outer_height),
        }
    }

    pub fn resize(&self, outer_height: f32) {
        self.outer_height.set(outer_height);
    }
}

impl HostWindow for ManualWindow {
    fn outer_height(&self) -> f32 {
        self.outer_height.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_node_scroll() {
        let node = Rc::new(ManualNode::new("hero", Rect::from_xywh(0.0, 1000.0, 200.0, 100.0)));
        let node_ref = NodeRef::from_rc(node.clone());
        assert_eq!(format!("{node_ref:?}"), r#"NodeRef("hero")"#);

        node.scroll_by(600.0);
        assert_eq!(node_ref.bounding_rect().top, 400.0);
        assert_eq!(node_ref.bounding_rect().bottom, 500.0);
    }

    #[test]
    fn test_same_node() {
        let a = NodeRef::new(ManualNode::default());
        let b = a.clone();
        let c = NodeRef::new(ManualNode::default());
        assert!(a.same_node(&b));
        assert!(!a.same_node(&c));
    }
}
