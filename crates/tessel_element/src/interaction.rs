//! Hover and selection requests
//!
//! Pointer enter/leave and clicks turn into requests to the element's owner.
//! Hover-out is debounced: leaving starts a short timer, and entering again
//! before it fires cancels it, so moving between adjacent children does not
//! flicker. While a drag is in progress no hover request is made at all.
//!
//! The controller never caches interaction flags. It reads them from its
//! [`InteractionHost`] both when an event arrives and again when the
//! debounce timer fires, so a drag that starts during the grace window
//! suppresses the stale hover-out.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use tessel_core::{TimerHandle, TimerId};

use crate::event::PointerEvent;

/// Mutation the controller asks the owner to perform
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionRequest {
    /// Mark the element as hovered
    Over,
    /// Clear the element's hover mark
    Out,
    /// Select the element
    Select,
}

/// Interaction flags read at decision time
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HoverSnapshot {
    pub dragging: bool,
    pub overed: bool,
    pub selected: bool,
}

/// The element side of the interaction controller
pub trait InteractionHost {
    /// Current flags; `None` once the element is gone
    fn snapshot(&self) -> Option<HoverSnapshot>;

    /// Forward a request, with the element's id and context, to the owner
    fn request(&self, request: InteractionRequest);
}

/// Hover debounce and click-to-select for one element
pub struct InteractionController {
    timers: TimerHandle,
    host: Weak<dyn InteractionHost>,
    debounce_ms: u64,
    pending_out: Rc<Cell<Option<TimerId>>>,
}

impl InteractionController {
    pub fn new(timers: TimerHandle, host: Weak<dyn InteractionHost>, debounce_ms: u64) -> Self {
        Self {
            timers,
            host,
            debounce_ms,
            pending_out: Rc::new(Cell::new(None)),
        }
    }

    fn snapshot(&self) -> Option<(Rc<dyn InteractionHost>, HoverSnapshot)> {
        let host = self.host.upgrade()?;
        let snapshot = host.snapshot()?;
        Some((host, snapshot))
    }

    /// Pointer entered the element
    ///
    /// Returns `false` when ignored because a drag is in progress.
    pub fn pointer_enter(&self) -> bool {
        let Some((host, snapshot)) = self.snapshot() else {
            return false;
        };
        if snapshot.dragging {
            return false;
        }

        self.cancel_pending();
        if !snapshot.overed && !snapshot.selected {
            host.request(InteractionRequest::Over);
        }
        true
    }

    /// Pointer entered, with the host's event
    ///
    /// A handled enter stops propagation so only the innermost hovered
    /// element asks to be marked.
    pub fn pointer_enter_event(&self, event: &mut PointerEvent) -> bool {
        let handled = self.pointer_enter();
        if handled {
            event.stop_propagation();
        }
        handled
    }

    /// Pointer left the element; starts the hover-out grace window
    pub fn pointer_leave(&self) -> bool {
        let Some((_, snapshot)) = self.snapshot() else {
            return false;
        };
        if snapshot.dragging || !snapshot.overed {
            return false;
        }

        self.cancel_pending();

        let host = self.host.clone();
        let pending = Rc::clone(&self.pending_out);
        let scheduled = self.timers.schedule(self.debounce_ms, move || {
            pending.set(None);
            let Some(host) = host.upgrade() else {
                return;
            };
            match host.snapshot() {
                Some(now) if !now.dragging && now.overed => {
                    tracing::trace!("hover-out debounce elapsed");
                    host.request(InteractionRequest::Out);
                }
                _ => tracing::trace!("stale hover-out dropped"),
            }
        });
        self.pending_out.set(scheduled);
        tracing::trace!(debounce_ms = self.debounce_ms, "hover-out debounce started");
        scheduled.is_some()
    }

    /// Click on the element: select it and stop propagation
    pub fn click(&self, event: &mut PointerEvent) {
        event.stop_propagation();
        if let Some(host) = self.host.upgrade() {
            host.request(InteractionRequest::Select);
        }
    }

    pub fn has_pending_out(&self) -> bool {
        self.pending_out
            .get()
            .is_some_and(|id| self.timers.is_pending(id))
    }

    /// Cancel a pending hover-out, if any
    pub fn cancel_pending(&self) -> bool {
        let Some(id) = self.pending_out.take() else {
            return false;
        };
        let cancelled = self.timers.cancel(id);
        if cancelled {
            tracing::trace!("hover-out debounce cancelled");
        }
        cancelled
    }
}

impl Drop for InteractionController {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tessel_core::TimerScheduler;

    #[derive(Default)]
    struct TestHost {
        flags: Cell<HoverSnapshot>,
        requests: RefCell<Vec<InteractionRequest>>,
    }

    impl InteractionHost for TestHost {
        fn snapshot(&self) -> Option<HoverSnapshot> {
            Some(self.flags.get())
        }

        fn request(&self, request: InteractionRequest) {
            self.requests.borrow_mut().push(request);
            // Owner applies hover marks synchronously
            let mut flags = self.flags.get();
            match request {
                InteractionRequest::Over => flags.overed = true,
                InteractionRequest::Out => flags.overed = false,
                InteractionRequest::Select => flags.selected = true,
            }
            self.flags.set(flags);
        }
    }

    fn setup() -> (TimerScheduler, Rc<TestHost>, InteractionController) {
        let scheduler = TimerScheduler::new();
        let host = Rc::new(TestHost::default());
        let dyn_host: Rc<dyn InteractionHost> = host.clone();
        let controller = InteractionController::new(scheduler.handle(), Rc::downgrade(&dyn_host), 50);
        (scheduler, host, controller)
    }

    fn requests(host: &TestHost) -> Vec<InteractionRequest> {
        host.requests.borrow().clone()
    }

    #[test]
    fn test_enter_requests_over_once() {
        let (_scheduler, host, controller) = setup();
        assert!(controller.pointer_enter());
        assert!(controller.pointer_enter());
        assert_eq!(requests(&host), vec![InteractionRequest::Over]);
    }

    #[test]
    fn test_enter_on_selected_does_not_request() {
        let (_scheduler, host, controller) = setup();
        host.flags.set(HoverSnapshot {
            selected: true,
            ..Default::default()
        });
        controller.pointer_enter();
        assert!(requests(&host).is_empty());
    }

    #[test]
    fn test_leave_debounced() {
        let (scheduler, host, controller) = setup();
        controller.pointer_enter();
        assert!(controller.pointer_leave());
        assert!(controller.has_pending_out());

        scheduler.advance(49);
        assert_eq!(requests(&host), vec![InteractionRequest::Over]);
        scheduler.advance(1);
        assert_eq!(
            requests(&host),
            vec![InteractionRequest::Over, InteractionRequest::Out]
        );
        assert!(!controller.has_pending_out());
    }

    #[test]
    fn test_reenter_cancels_hover_out() {
        let (scheduler, host, controller) = setup();
        controller.pointer_enter();
        controller.pointer_leave();
        scheduler.advance(20);
        controller.pointer_enter();
        scheduler.advance(200);
        assert_eq!(requests(&host), vec![InteractionRequest::Over]);
    }

    #[test]
    fn test_leave_when_not_overed_is_noop() {
        let (scheduler, host, controller) = setup();
        assert!(!controller.pointer_leave());
        scheduler.advance(100);
        assert!(requests(&host).is_empty());
    }

    #[test]
    fn test_drag_started_during_grace_window() {
        let (scheduler, host, controller) = setup();
        controller.pointer_enter();
        controller.pointer_leave();

        let mut flags = host.flags.get();
        flags.dragging = true;
        host.flags.set(flags);

        scheduler.advance(100);
        assert_eq!(requests(&host), vec![InteractionRequest::Over]);
    }

    #[test]
    fn test_dragging_suppresses_everything() {
        let (scheduler, host, controller) = setup();
        host.flags.set(HoverSnapshot {
            dragging: true,
            overed: true,
            selected: false,
        });
        let mut event = PointerEvent::new();
        assert!(!controller.pointer_enter_event(&mut event));
        assert!(!event.is_propagation_stopped());
        assert!(!controller.pointer_leave());
        scheduler.advance(100);
        assert!(requests(&host).is_empty());
    }

    #[test]
    fn test_click_selects_and_stops() {
        let (_scheduler, host, controller) = setup();
        let mut event = PointerEvent::new();
        controller.click(&mut event);
        assert!(event.is_propagation_stopped());
        assert_eq!(requests(&host), vec![InteractionRequest::Select]);
    }

    #[test]
    fn test_drop_cancels_pending_out() {
        let (scheduler, host, controller) = setup();
        controller.pointer_enter();
        controller.pointer_leave();
        drop(controller);
        assert_eq!(scheduler.pending_count(), 0);
        scheduler.advance(100);
        assert_eq!(requests(&host), vec![InteractionRequest::Over]);
    }
}
