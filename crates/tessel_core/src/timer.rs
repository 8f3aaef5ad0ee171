//! Timer scheduler
//!
//! One-shot timers driven by a millisecond clock that the host advances.
//! Controllers never hold the scheduler itself, only a [`TimerHandle`]:
//! - `TimerScheduler` - owned by the host event loop, advances the clock
//! - `TimerHandle` - weak handle passed to controllers to schedule/cancel
//!
//! The clock is explicit so that hosts can map it onto their own event loop
//! (e.g. advance by the frame delta each tick) and tests can step simulated
//! time without sleeping.
//!
//! # Example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use tessel_core::timer::TimerScheduler;
//!
//! let scheduler = TimerScheduler::new();
//! let handle = scheduler.handle();
//!
//! let fired = Rc::new(Cell::new(false));
//! let flag = Rc::clone(&fired);
//! handle.schedule(50, move || flag.set(true));
//!
//! scheduler.advance(49);
//! assert!(!fired.get());
//! scheduler.advance(1);
//! assert!(fired.get());
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a pending timer
    pub struct TimerId;
}

type TimerCallback = Box<dyn FnOnce()>;

struct TimerEntry {
    due: u64,
    /// Schedule order, breaks ties between timers due at the same instant
    seq: u64,
    callback: TimerCallback,
}

struct TimerInner {
    now: u64,
    next_seq: u64,
    timers: SlotMap<TimerId, TimerEntry>,
    /// Pending timers ordered by `(due, seq)`; mirrors `timers`
    queue: BTreeMap<(u64, u64), TimerId>,
}

impl TimerInner {
    fn insert(&mut self, due: u64, callback: TimerCallback) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let id = self.timers.insert(TimerEntry { due, seq, callback });
        self.queue.insert((due, seq), id);
        id
    }

    fn remove(&mut self, id: TimerId) -> Option<TimerEntry> {
        let entry = self.timers.remove(id)?;
        self.queue.remove(&(entry.due, entry.seq));
        Some(entry)
    }

    /// Remove and return the earliest timer due at or before `deadline`
    fn pop_due(&mut self, deadline: u64) -> Option<(TimerId, TimerEntry)> {
        let (&(due, _), _) = self.queue.first_key_value()?;
        if due > deadline {
            return None;
        }
        let (_, id) = self.queue.pop_first()?;
        self.timers.remove(id).map(|entry| (id, entry))
    }
}

/// Owner of the clock and every pending timer
///
/// Dropping the scheduler drops all pending callbacks without running them;
/// outstanding [`TimerHandle`]s then become inert.
pub struct TimerScheduler {
    inner: Rc<RefCell<TimerInner>>,
}

impl TimerScheduler {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(TimerInner {
                now: 0,
                next_seq: 0,
                timers: SlotMap::with_key(),
                queue: BTreeMap::new(),
            })),
        }
    }

    /// Get a weak handle for scheduling timers
    pub fn handle(&self) -> TimerHandle {
        TimerHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Current clock value in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.inner.borrow().now
    }

    /// Advance the clock by `delta_ms`, firing every timer that comes due
    ///
    /// Returns the number of callbacks that ran.
    pub fn advance(&self, delta_ms: u64) -> usize {
        let target = self.now_ms().saturating_add(delta_ms);
        self.advance_to(target)
    }

    /// Advance the clock to an absolute time, firing due timers in order
    ///
    /// Timers fire in due-time order, ties broken by schedule order. The
    /// clock reads each timer's due time while its callback runs, so a
    /// callback that schedules a new timer measures from the right instant.
    /// A time earlier than the current clock only flushes already-due timers.
    pub fn advance_to(&self, target_ms: u64) -> usize {
        let mut fired = 0;
        loop {
            // The borrow must end before the callback runs: callbacks
            // schedule and cancel timers through their own handles.
            let next = {
                let mut inner = self.inner.borrow_mut();
                let deadline = target_ms.max(inner.now);
                let next = inner.pop_due(deadline);
                if let Some((_, entry)) = &next {
                    inner.now = inner.now.max(entry.due);
                }
                next
            };

            let Some((id, entry)) = next else {
                break;
            };
            tracing::trace!(?id, due = entry.due, "timer fired");
            (entry.callback)();
            fired += 1;
        }

        let mut inner = self.inner.borrow_mut();
        inner.now = inner.now.max(target_ms);
        fired
    }

    /// Fire timers that are already due without moving the clock
    ///
    /// Zero-delay timers never fire inside `schedule`; they run here.
    pub fn run_due(&self) -> usize {
        self.advance(0)
    }

    /// Number of timers that have neither fired nor been cancelled
    pub fn pending_count(&self) -> usize {
        self.inner.borrow().timers.len()
    }
}

impl Default for TimerScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// A weak handle to the timer scheduler
///
/// This is passed to controllers that need timers. It won't keep the
/// scheduler alive, and every operation is a no-op once it is gone.
#[derive(Clone)]
pub struct TimerHandle {
    inner: Weak<RefCell<TimerInner>>,
}

impl TimerHandle {
    /// Schedule `callback` to run `delay_ms` after the current clock
    ///
    /// Returns `None` if the scheduler has been dropped.
    pub fn schedule<F>(&self, delay_ms: u64, callback: F) -> Option<TimerId>
    where
        F: FnOnce() + 'static,
    {
        let inner = self.inner.upgrade()?;
        let mut inner = inner.borrow_mut();
        let due = inner.now.saturating_add(delay_ms);
        Some(inner.insert(due, Box::new(callback)))
    }

    /// Cancel a pending timer
    ///
    /// Returns `false` if the timer already fired, was already cancelled,
    /// or the scheduler is gone. Slot keys are generation-checked, so a
    /// stale id never cancels a newer timer.
    pub fn cancel(&self, id: TimerId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.borrow_mut().remove(id).is_some())
            .unwrap_or(false)
    }

    /// Check whether a timer is still pending
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.borrow().timers.contains_key(id))
            .unwrap_or(false)
    }

    /// Current clock value, `0` once the scheduler is gone
    pub fn now_ms(&self) -> u64 {
        self.inner
            .upgrade()
            .map(|inner| inner.borrow().now)
            .unwrap_or(0)
    }

    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl std::fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}
