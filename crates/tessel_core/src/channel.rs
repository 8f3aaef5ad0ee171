//! Host-owned publish/subscribe channels
//!
//! Ambient signals such as viewport scrolling or the editor's "animate
//! elements now" broadcast are modeled as explicit channels owned by the
//! host application. Controllers subscribe with a callback and keep the
//! returned [`SubscriptionId`]; teardown removes exactly that subscription.
//!
//! # Example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use tessel_core::channel::{AnimateSignal, Channel};
//!
//! let animate: Channel<AnimateSignal> = Channel::new("animate");
//! let hits = Rc::new(Cell::new(0));
//!
//! let h = Rc::clone(&hits);
//! let id = animate.subscribe(move |_| h.set(h.get() + 1));
//!
//! animate.publish(&AnimateSignal);
//! assert!(animate.unsubscribe(id));
//! animate.publish(&AnimateSignal);
//! assert_eq!(hits.get(), 1);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Handle identifying one subscription on a channel
    pub struct SubscriptionId;
}

/// Viewport scroll notification
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollEvent {
    /// Vertical scroll offset of the page
    pub scroll_y: f32,
}

/// Editor broadcast asking every mounted element to replay its animation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnimateSignal;

type Subscriber<T> = Rc<dyn Fn(&T)>;

struct ChannelInner<T> {
    name: &'static str,
    subscribers: SlotMap<SubscriptionId, Subscriber<T>>,
}

/// A publish/subscribe channel
///
/// Cloning yields another handle to the same channel.
pub struct Channel<T> {
    inner: Rc<RefCell<ChannelInner<T>>>,
}

impl<T: 'static> Channel<T> {
    /// Create a channel; `name` only appears in logs
    pub fn new(name: &'static str) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ChannelInner {
                name,
                subscribers: SlotMap::with_key(),
            })),
        }
    }

    pub fn name(&self) -> &'static str {
        self.inner.borrow().name
    }

    /// Register a subscriber
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = inner.subscribers.insert(Rc::new(callback));
        tracing::trace!(channel = inner.name, ?id, "subscribed");
        id
    }

    /// Remove a subscriber
    ///
    /// Returns `false` if the id was not (or no longer) subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let removed = inner.subscribers.remove(id).is_some();
        if removed {
            tracing::trace!(channel = inner.name, ?id, "unsubscribed");
        }
        removed
    }

    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.inner.borrow().subscribers.contains_key(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Deliver `event` to every subscriber
    ///
    /// Subscribers may subscribe or unsubscribe from inside their callback.
    /// A subscriber removed earlier in the same round is skipped; one added
    /// during the round first hears the next publish. Returns the number of
    /// subscribers that were called.
    pub fn publish(&self, event: &T) -> usize {
        let snapshot: SmallVec<[(SubscriptionId, Subscriber<T>); 8]> = self
            .inner
            .borrow()
            .subscribers
            .iter()
            .map(|(id, callback)| (id, Rc::clone(callback)))
            .collect();

        let mut delivered = 0;
        for (id, callback) in snapshot {
            if !self.is_subscribed(id) {
                continue;
            }
            callback(event);
            delivered += 1;
        }
        delivered
    }
}

impl<T> Clone for Channel<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for Channel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Channel")
            .field("name", &inner.name)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_publish_reaches_all_subscribers() {
        let channel: Channel<ScrollEvent> = Channel::new("scroll");
        let total = Rc::new(Cell::new(0.0));

        for _ in 0..3 {
            let total = Rc::clone(&total);
            channel.subscribe(move |event: &ScrollEvent| total.set(total.get() + event.scroll_y));
        }

        assert_eq!(channel.publish(&ScrollEvent { scroll_y: 2.0 }), 3);
        assert_eq!(total.get(), 6.0);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let channel: Channel<AnimateSignal> = Channel::new("animate");
        let id = channel.subscribe(|_| {});
        assert!(channel.is_subscribed(id));
        assert!(channel.unsubscribe(id));
        assert!(!channel.unsubscribe(id));
        assert_eq!(channel.subscriber_count(), 0);
    }

    #[test]
    fn test_self_unsubscribe_during_publish() {
        let channel: Channel<AnimateSignal> = Channel::new("animate");
        let calls = Rc::new(Cell::new(0));
        let slot: Rc<Cell<Option<SubscriptionId>>> = Rc::new(Cell::new(None));

        let ch = channel.clone();
        let c = Rc::clone(&calls);
        let s = Rc::clone(&slot);
        let id = channel.subscribe(move |_| {
            c.set(c.get() + 1);
            if let Some(id) = s.take() {
                ch.unsubscribe(id);
            }
        });
        slot.set(Some(id));

        channel.publish(&AnimateSignal);
        channel.publish(&AnimateSignal);
        assert_eq!(calls.get(), 1);
        assert_eq!(channel.subscriber_count(), 0);
    }

    #[test]
    fn test_removed_mid_round_is_skipped() {
        let channel: Channel<AnimateSignal> = Channel::new("animate");
        let second_calls = Rc::new(Cell::new(0));
        let victim: Rc<Cell<Option<SubscriptionId>>> = Rc::new(Cell::new(None));

        // Whichever subscriber runs first removes the other one
        let ch = channel.clone();
        let v = Rc::clone(&victim);
        let first = channel.subscribe(move |_| {
            if let Some(id) = v.take() {
                ch.unsubscribe(id);
            }
        });
        let c = Rc::clone(&second_calls);
        let second = channel.subscribe(move |_| c.set(c.get() + 1));
        victim.set(Some(second));

        let delivered = channel.publish(&AnimateSignal);
        assert!(channel.is_subscribed(first));
        assert!(!channel.is_subscribed(second));
        assert_eq!(delivered, 1 + second_calls.get());
    }
}
