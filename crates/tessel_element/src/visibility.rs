//! Viewport entry detection
//!
//! A [`VisibilityWatcher`] listens to the host's scroll channel and reports
//! the first time its node intersects the viewport. It checks once when
//! armed, so a node already in view does not wait for a scroll, and then on
//! every scroll event. After the first hit it unsubscribes and never fires
//! again for the life of the watcher.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tessel_core::{Channel, HostWindow, NodeRef, Rect, ScrollEvent, SubscriptionId};

/// Whether a box relative to the viewport is on screen
///
/// A box straddling the top edge counts, as does one whose top lies inside
/// the window. Boxes entirely above the viewport do not.
pub fn intersects_viewport(rect: &Rect, outer_height: f32) -> bool {
    (rect.top <= 0.0 && rect.bottom >= 0.0) || (rect.top > 0.0 && rect.top < outer_height)
}

type EnterCallback = Box<dyn FnOnce()>;

struct WatcherInner {
    scroll: Channel<ScrollEvent>,
    window: Rc<dyn HostWindow>,
    node: NodeRef,
    subscription: Cell<Option<SubscriptionId>>,
    on_enter: RefCell<Option<EnterCallback>>,
    fired: Cell<bool>,
}

impl WatcherInner {
    fn check(&self) -> bool {
        if self.fired.get() {
            return false;
        }

        let rect = self.node.bounding_rect();
        let outer_height = self.window.outer_height();
        if !intersects_viewport(&rect, outer_height) {
            tracing::trace!(node = ?self.node, top = rect.top, "not in viewport");
            return false;
        }

        self.fired.set(true);
        self.disarm();
        tracing::debug!(node = ?self.node, top = rect.top, outer_height, "entered viewport");

        let on_enter = self.on_enter.borrow_mut().take();
        if let Some(on_enter) = on_enter {
            on_enter();
        }
        true
    }

    fn disarm(&self) -> bool {
        let Some(id) = self.subscription.take() else {
            return false;
        };
        tracing::trace!(node = ?self.node, "viewport watch disarmed");
        self.scroll.unsubscribe(id)
    }
}

impl Drop for WatcherInner {
    fn drop(&mut self) {
        self.disarm();
    }
}

/// One-shot viewport entry watcher for a single node
pub struct VisibilityWatcher {
    inner: Rc<WatcherInner>,
}

impl VisibilityWatcher {
    pub fn new(scroll: Channel<ScrollEvent>, window: Rc<dyn HostWindow>, node: NodeRef) -> Self {
        Self {
            inner: Rc::new(WatcherInner {
                scroll,
                window,
                node,
                subscription: Cell::new(None),
                on_enter: RefCell::new(None),
                fired: Cell::new(false),
            }),
        }
    }

    /// Start watching if `should_watch`
    ///
    /// Performs the arm-time check immediately, so `on_enter` may run before
    /// this returns. Returns `true` if the watcher armed (or fired on the
    /// spot). Already armed or already fired watchers ignore the call.
    pub fn arm_if_needed<F>(&self, should_watch: bool, on_enter: F) -> bool
    where
        F: FnOnce() + 'static,
    {
        if !should_watch || self.is_armed() || self.has_fired() {
            return false;
        }

        *self.inner.on_enter.borrow_mut() = Some(Box::new(on_enter));

        let weak: Weak<WatcherInner> = Rc::downgrade(&self.inner);
        let id = self.inner.scroll.subscribe(move |_: &ScrollEvent| {
            if let Some(inner) = weak.upgrade() {
                inner.check();
            }
        });
        self.inner.subscription.set(Some(id));
        tracing::trace!(node = ?self.inner.node, "viewport watch armed");

        self.inner.check();
        true
    }

    /// Whether a scroll subscription is active
    pub fn is_armed(&self) -> bool {
        self.inner.subscription.get().is_some()
    }

    pub fn has_fired(&self) -> bool {
        self.inner.fired.get()
    }

    /// Drop the scroll subscription without firing; safe to repeat
    pub fn disarm(&self) -> bool {
        self.inner.on_enter.borrow_mut().take();
        self.inner.disarm()
    }
}
