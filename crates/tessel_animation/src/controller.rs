//! Per-element animation lifecycle
//!
//! An element moves through `Idle → Scheduled → Triggered`:
//!
//! ```text
//! trigger (viewport entry / editor broadcast)
//!     ↓
//! schedule(spec)      cancels any pending timer, starts a `spec.delay` timer
//!     ↓
//! timer fires         start_animation() requested, effect handed to the player
//! ```
//!
//! At most one schedule timer is in flight per controller. A new `schedule`
//! supersedes the pending one, so only the latest parameters are played.
//! While editing, every broadcast replays the animation: the host is asked to
//! reset its "animated" marks, then a fresh schedule starts.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tessel_core::{AnimateSignal, Channel, NodeRef, SubscriptionId, TimerHandle, TimerId};

use crate::player::{AnimationPlayer, PlaybackOptions};
use crate::spec::{AnimationEffect, AnimationSpec};

/// Lifecycle phase of one element's animation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnimationPhase {
    /// Nothing scheduled yet (or the pending schedule was cancelled)
    #[default]
    Idle,
    /// Delay timer running
    Scheduled,
    /// Playback requested; re-enterable through another schedule
    Triggered,
}

/// Mutation requests the controller makes to the element's owner
#[derive(Clone)]
pub struct AnimationHooks {
    /// Record that the element has now animated
    pub start_animation: Rc<dyn Fn()>,
    /// Clear the element's "animated" marks before an editing replay
    pub reset_animation: Rc<dyn Fn()>,
}

impl AnimationHooks {
    pub fn new(start_animation: impl Fn() + 'static, reset_animation: impl Fn() + 'static) -> Self {
        Self {
            start_animation: Rc::new(start_animation),
            reset_animation: Rc::new(reset_animation),
        }
    }

    /// Hooks that request nothing
    pub fn noop() -> Self {
        Self::new(|| {}, || {})
    }
}

impl std::fmt::Debug for AnimationHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationHooks").finish_non_exhaustive()
    }
}

/// Whether an element must render in its hidden pre-animation state
///
/// Outside editing, an element with an animation stays at zero opacity until
/// its owner marks it `animated`. While editing, the owner raises
/// `animated_editing` between a replay's reset and its start, and the
/// element stays hidden for that window. Editing never hides an element on
/// its own, with or without an animation.
pub fn is_pre_animation_hidden(
    editing: bool,
    animation_configured: bool,
    animated: bool,
    animated_editing: bool,
) -> bool {
    (editing && animated_editing) || (!editing && animation_configured && !animated)
}

struct ControllerInner {
    timers: TimerHandle,
    player: Rc<dyn AnimationPlayer>,
    target: NodeRef,
    hooks: AnimationHooks,
    display: RefCell<Option<String>>,
    phase: Cell<AnimationPhase>,
    pending: Cell<Option<TimerId>>,
    broadcast: RefCell<Option<(Channel<AnimateSignal>, SubscriptionId)>>,
}

impl ControllerInner {
    fn schedule(self: &Rc<Self>, spec: &AnimationSpec) {
        if let Some(previous) = self.pending.take() {
            if self.timers.cancel(previous) {
                tracing::debug!(target_node = ?self.target, "pending animation superseded");
            }
        }

        let weak: Weak<Self> = Rc::downgrade(self);
        let effect = spec.effect.clone();
        let duration = spec.duration;
        let scheduled = self.timers.schedule(spec.delay, move || {
            if let Some(inner) = weak.upgrade() {
                inner.fire(&effect, duration);
            }
        });

        match scheduled {
            Some(id) => {
                tracing::debug!(target_node = ?self.target, delay = spec.delay, "animation scheduled");
                self.pending.set(Some(id));
                self.phase.set(AnimationPhase::Scheduled);
            }
            None => tracing::warn!("timer scheduler dropped, animation not scheduled"),
        }
    }

    fn fire(&self, effect: &AnimationEffect, duration: u64) {
        self.pending.set(None);
        self.phase.set(AnimationPhase::Triggered);
        tracing::debug!(target_node = ?self.target, ?effect, duration, "animation triggered");

        let display = self.display.borrow().clone();
        (self.hooks.start_animation)();
        self.player
            .play(&self.target, effect, PlaybackOptions { duration, display });
    }

    fn cancel(&self) -> bool {
        let Some(id) = self.pending.take() else {
            return false;
        };
        if self.phase.get() == AnimationPhase::Scheduled {
            self.phase.set(AnimationPhase::Idle);
        }
        self.timers.cancel(id)
    }

    fn unsubscribe(&self) -> bool {
        match self.broadcast.borrow_mut().take() {
            Some((channel, id)) => channel.unsubscribe(id),
            None => false,
        }
    }
}

impl Drop for ControllerInner {
    fn drop(&mut self) {
        self.cancel();
        self.unsubscribe();
    }
}

/// Animation lifecycle for a single element instance
///
/// Timer and broadcast callbacks hold only weak references, so dropping the
/// controller cancels everything it registered. Clones share one lifecycle.
#[derive(Clone)]
pub struct AnimationController {
    inner: Rc<ControllerInner>,
}

/// Non-owning reference to an [`AnimationController`]
#[derive(Clone)]
pub struct WeakAnimationController {
    inner: Weak<ControllerInner>,
}

impl WeakAnimationController {
    pub fn upgrade(&self) -> Option<AnimationController> {
        self.inner
            .upgrade()
            .map(|inner| AnimationController { inner })
    }
}

impl AnimationController {
    pub fn new(
        timers: TimerHandle,
        player: Rc<dyn AnimationPlayer>,
        target: NodeRef,
        hooks: AnimationHooks,
    ) -> Self {
        Self {
            inner: Rc::new(ControllerInner {
                timers,
                player,
                target,
                hooks,
                display: RefCell::new(None),
                phase: Cell::new(AnimationPhase::Idle),
                pending: Cell::new(None),
                broadcast: RefCell::new(None),
            }),
        }
    }

    pub fn downgrade(&self) -> WeakAnimationController {
        WeakAnimationController {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Set the display value passed to the player
    pub fn set_display(&self, display: Option<String>) {
        *self.inner.display.borrow_mut() = display;
    }

    pub fn phase(&self) -> AnimationPhase {
        self.inner.phase.get()
    }

    /// Whether a delay timer is pending
    pub fn is_pending(&self) -> bool {
        self.inner
            .pending
            .get()
            .is_some_and(|id| self.inner.timers.is_pending(id))
    }

    /// Start the delay timer for `spec`, superseding any pending one
    pub fn schedule(&self, spec: &AnimationSpec) {
        self.inner.schedule(spec);
    }

    /// Editing-mode replay: reset the owner's marks, then schedule
    ///
    /// Does nothing when no animation is configured.
    pub fn replay(&self, spec: Option<&AnimationSpec>) {
        replay(&self.inner, spec);
    }

    /// Replay on every broadcast for as long as the controller lives
    ///
    /// `current_spec` is read at broadcast time, so later configuration
    /// changes are honored. Subscribing twice keeps the first subscription.
    pub fn subscribe_broadcast<F>(&self, channel: &Channel<AnimateSignal>, current_spec: F)
    where
        F: Fn() -> Option<AnimationSpec> + 'static,
    {
        let mut broadcast = self.inner.broadcast.borrow_mut();
        if broadcast.is_some() {
            return;
        }

        let weak = Rc::downgrade(&self.inner);
        let id = channel.subscribe(move |_: &AnimateSignal| {
            if let Some(inner) = weak.upgrade() {
                replay(&inner, current_spec().as_ref());
            }
        });
        *broadcast = Some((channel.clone(), id));
    }

    pub fn is_subscribed(&self) -> bool {
        self.inner.broadcast.borrow().is_some()
    }

    /// Cancel the pending delay timer, if any
    pub fn cancel(&self) -> bool {
        let cancelled = self.inner.cancel();
        if cancelled {
            tracing::debug!(target_node = ?self.inner.target, "pending animation cancelled");
        }
        cancelled
    }

    /// Release the timer and the broadcast subscription; safe to repeat
    pub fn teardown(&self) {
        self.cancel();
        self.inner.unsubscribe();
    }
}

fn replay(inner: &Rc<ControllerInner>, spec: Option<&AnimationSpec>) {
    let Some(spec) = spec else {
        return;
    };
    (inner.hooks.reset_animation)();
    inner.schedule(spec);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::RecordingPlayer;
    use tessel_core::{ManualNode, TimerScheduler};

    struct Fixture {
        scheduler: TimerScheduler,
        player: Rc<RecordingPlayer>,
        starts: Rc<Cell<u32>>,
        resets: Rc<Cell<u32>>,
        controller: AnimationController,
    }

    fn fixture() -> Fixture {
        let scheduler = TimerScheduler::new();
        let player = Rc::new(RecordingPlayer::new());
        let starts = Rc::new(Cell::new(0));
        let resets = Rc::new(Cell::new(0));

        let s = Rc::clone(&starts);
        let r = Rc::clone(&resets);
        let controller = AnimationController::new(
            scheduler.handle(),
            player.clone(),
            NodeRef::new(ManualNode::default()),
            AnimationHooks::new(move || s.set(s.get() + 1), move || r.set(r.get() + 1)),
        );

        Fixture {
            scheduler,
            player,
            starts,
            resets,
            controller,
        }
    }

    fn spec(effect: &str, duration: u64, delay: u64) -> AnimationSpec {
        AnimationSpec::new(AnimationEffect::named(effect), duration, delay)
    }

    #[test]
    fn test_schedule_fires_after_delay() {
        let f = fixture();
        f.controller.schedule(&spec("fade", 300, 100));
        assert_eq!(f.controller.phase(), AnimationPhase::Scheduled);
        assert!(f.controller.is_pending());

        f.scheduler.advance(99);
        assert_eq!(f.player.count(), 0);
        f.scheduler.advance(1);

        assert_eq!(f.controller.phase(), AnimationPhase::Triggered);
        assert_eq!(f.starts.get(), 1);
        let record = f.player.last().unwrap();
        assert_eq!(record.effect.name(), Some("fade"));
        assert_eq!(record.options.duration, 300);
        assert_eq!(record.options.display, None);
    }

    #[test]
    fn test_display_passed_to_player() {
        let f = fixture();
        f.controller.set_display(Some("block".into()));
        f.controller.schedule(&spec("fade", 300, 0));
        f.scheduler.run_due();
        assert_eq!(
            f.player.last().unwrap().options.display.as_deref(),
            Some("block")
        );
    }

    #[test]
    fn test_reschedule_supersedes_pending() {
        let f = fixture();
        f.controller.schedule(&spec("fade", 300, 100));
        f.scheduler.advance(50);
        f.controller.schedule(&spec("slide", 500, 100));

        f.scheduler.advance(1000);
        assert_eq!(f.player.count(), 1);
        assert_eq!(f.player.last().unwrap().effect.name(), Some("slide"));
        assert_eq!(f.player.last().unwrap().options.duration, 500);
        assert_eq!(f.scheduler.pending_count(), 0);
    }

    #[test]
    fn test_cancel_returns_to_idle() {
        let f = fixture();
        f.controller.schedule(&spec("fade", 300, 100));
        assert!(f.controller.cancel());
        assert!(!f.controller.cancel());
        assert_eq!(f.controller.phase(), AnimationPhase::Idle);

        f.scheduler.advance(1000);
        assert_eq!(f.player.count(), 0);
        assert_eq!(f.starts.get(), 0);
    }

    #[test]
    fn test_replay_without_spec_is_noop() {
        let f = fixture();
        f.controller.replay(None);
        assert_eq!(f.resets.get(), 0);
        assert_eq!(f.controller.phase(), AnimationPhase::Idle);
    }

    #[test]
    fn test_broadcast_replays_every_time() {
        let f = fixture();
        let channel: Channel<AnimateSignal> = Channel::new("animate");
        f.controller
            .subscribe_broadcast(&channel, || Some(spec("fade", 200, 0)));
        f.controller
            .subscribe_broadcast(&channel, || Some(spec("ignored", 1, 0)));
        assert_eq!(channel.subscriber_count(), 1);

        channel.publish(&AnimateSignal);
        f.scheduler.run_due();
        channel.publish(&AnimateSignal);
        f.scheduler.run_due();

        assert_eq!(f.resets.get(), 2);
        assert_eq!(f.starts.get(), 2);
        assert_eq!(f.player.count(), 2);
    }

    #[test]
    fn test_teardown_releases_everything() {
        let f = fixture();
        let channel: Channel<AnimateSignal> = Channel::new("animate");
        f.controller
            .subscribe_broadcast(&channel, || Some(spec("fade", 200, 10)));
        channel.publish(&AnimateSignal);

        f.controller.teardown();
        f.controller.teardown();
        assert_eq!(channel.subscriber_count(), 0);
        assert_eq!(f.scheduler.pending_count(), 0);

        f.scheduler.advance(100);
        assert_eq!(f.player.count(), 0);
    }

    #[test]
    fn test_drop_releases_everything() {
        let f = fixture();
        let channel: Channel<AnimateSignal> = Channel::new("animate");
        f.controller
            .subscribe_broadcast(&channel, || Some(spec("fade", 200, 10)));
        f.controller.schedule(&spec("fade", 200, 10));

        drop(f.controller);
        assert_eq!(channel.subscriber_count(), 0);
        assert_eq!(f.scheduler.pending_count(), 0);
    }

    #[test]
    fn test_weak_handle_does_not_keep_alive() {
        let f = fixture();
        let weak = f.controller.downgrade();
        weak.upgrade().unwrap().schedule(&spec("fade", 100, 5));
        assert!(f.controller.is_pending());

        drop(f.controller);
        assert!(weak.upgrade().is_none());
        assert_eq!(f.scheduler.pending_count(), 0);
    }

    #[test]
    fn test_hidden_pre_state_rule() {
        // Published page: hidden until animated, only when configured
        assert!(is_pre_animation_hidden(false, true, false, false));
        assert!(!is_pre_animation_hidden(false, true, true, false));
        assert!(!is_pre_animation_hidden(false, false, false, false));

        // Editing: only a pending replay hides the element
        assert!(is_pre_animation_hidden(true, true, false, true));
        assert!(is_pre_animation_hidden(true, false, false, true));
        assert!(!is_pre_animation_hidden(true, false, false, false));
        assert!(!is_pre_animation_hidden(true, true, false, false));
    }
}
