//! Pointer events and click bubbling
//!
//! Canvas elements nest. A click is delivered to the deepest element first
//! and then to each ancestor in turn, until one of them stops propagation.
//! Every element stops a click it handles, so selection lands on exactly the
//! innermost clicked element.

use crate::element::ElementView;

/// A pointer event in flight through the element tree
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointerEvent {
    /// Viewport coordinates, if the host reports them
    pub x: f32,
    pub y: f32,
    propagation_stopped: bool,
}

impl PointerEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            propagation_stopped: false,
        }
    }

    /// Keep ancestors from receiving this event
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Dispatch a click from the deepest element outwards
///
/// `chain` lists the clicked element first, then its ancestors. Returns the
/// number of elements that received the click.
pub fn bubble_click<'a, I>(chain: I, event: &mut PointerEvent) -> usize
where
    I: IntoIterator<Item = &'a ElementView>,
{
    let mut delivered = 0;
    for view in chain {
        view.click(event);
        delivered += 1;
        if event.is_propagation_stopped() {
            break;
        }
    }
    tracing::trace!(delivered, "click bubbled");
    delivered
}
