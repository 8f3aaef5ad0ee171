//! Element view
//!
//! [`ElementView`] is the composition root for one element instance. It
//! owns the instance's animation controller, viewport watcher and
//! interaction controller, and renders the element from its current props.
//!
//! Arming happens once, at mount:
//!
//! - the viewport watch when not editing and an animation is configured, or
//!   whenever an `on_enter_screen` callback is supplied;
//! - the editor's animate broadcast when editing.
//!
//! Later prop updates change what is rendered and which animation a trigger
//! plays, but never re-arm. `unmount` (or dropping the view) releases every
//! timer and subscription the instance registered.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tessel_animation::{
    is_pre_animation_hidden, AnimationController, AnimationHooks, AnimationPhase,
    AnimationPlayer, AnimationSpec,
};
use tessel_core::{
    AnimateSignal, Channel, HostWindow, NodeRef, ScrollEvent, StyleValue, TimerHandle,
};

use crate::composition::Composition;
use crate::config::ElementConfig;
use crate::event::PointerEvent;
use crate::interaction::{HoverSnapshot, InteractionController, InteractionHost, InteractionRequest};
use crate::position::resolve_position;
use crate::props::{ElementCallbacks, ElementProps};
use crate::view::{
    Capabilities, DataCapabilities, DragDescriptor, DragKind, DraggableProps, DropDescriptor,
    DroppableProps, HighlightProps, PlaceholderOptions, PlaceholderProps, PlaceholderRenderer,
    TagView, View,
};
use crate::visibility::VisibilityWatcher;

// ============================================================================
// Environment
// ============================================================================

/// Host services shared by every mounted element
#[derive(Clone)]
pub struct Environment {
    pub timers: TimerHandle,
    pub scroll: Channel<ScrollEvent>,
    pub animate: Channel<AnimateSignal>,
    pub window: Rc<dyn HostWindow>,
    pub player: Rc<dyn AnimationPlayer>,
    pub capabilities: Rc<dyn Capabilities>,
    pub config: ElementConfig,
}

impl Environment {
    /// Environment with fresh channels, data capabilities and default config
    pub fn new(
        timers: TimerHandle,
        window: Rc<dyn HostWindow>,
        player: Rc<dyn AnimationPlayer>,
    ) -> Self {
        Self {
            timers,
            scroll: Channel::new("scroll"),
            animate: Channel::new("animate"),
            window,
            player,
            capabilities: Rc::new(DataCapabilities),
            config: ElementConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ElementConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_capabilities(mut self, capabilities: Rc<dyn Capabilities>) -> Self {
        self.capabilities = capabilities;
        self
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("timers", &self.timers)
            .field("scroll", &self.scroll.name())
            .field("animate", &self.animate.name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Shared element state
// ============================================================================

struct ElementState {
    props: ElementProps,
    callbacks: ElementCallbacks,
    captured_ref: Option<NodeRef>,
}

/// State reachable from timer and subscription callbacks
///
/// Callbacks hold it weakly. Owner callbacks are cloned out before they are
/// invoked, so an owner may update the view from inside one.
struct ElementCell {
    state: RefCell<ElementState>,
}

impl ElementCell {
    fn animation(&self) -> Option<AnimationSpec> {
        self.state.borrow().props.animation.clone()
    }

    fn placeholder_props(&self, options: &PlaceholderOptions) -> PlaceholderProps {
        let state = self.state.borrow();
        PlaceholderProps {
            options: options.clone(),
            settings: state.props.settings.clone(),
            element: state.props.element.clone(),
        }
    }

    fn owner_hook(
        self: &Rc<Self>,
        pick: fn(&ElementCallbacks) -> Rc<dyn Fn()>,
    ) -> impl Fn() + 'static {
        let weak = Rc::downgrade(self);
        move || {
            if let Some(cell) = weak.upgrade() {
                let hook = pick(&cell.state.borrow().callbacks);
                hook();
            }
        }
    }
}

impl InteractionHost for ElementCell {
    fn snapshot(&self) -> Option<HoverSnapshot> {
        let flags = self.state.borrow().props.flags;
        Some(HoverSnapshot {
            dragging: flags.dragging,
            overed: flags.overed,
            selected: flags.selected,
        })
    }

    fn request(&self, request: InteractionRequest) {
        let (id, context, callback) = {
            let state = self.state.borrow();
            let callback = match request {
                InteractionRequest::Over => Rc::clone(&state.callbacks.over_element),
                InteractionRequest::Out => Rc::clone(&state.callbacks.out_element),
                InteractionRequest::Select => Rc::clone(&state.callbacks.select_element),
            };
            (
                state.props.element.id.clone(),
                state.props.context.clone(),
                callback,
            )
        };
        tracing::debug!(element = %id, %context, ?request, "interaction request");
        callback(&id, &context);
    }
}

// ============================================================================
// ElementView
// ============================================================================

/// One mounted canvas element
pub struct ElementView {
    cell: Rc<ElementCell>,
    capabilities: Rc<dyn Capabilities>,
    focus_class: String,
    animation: AnimationController,
    watcher: VisibilityWatcher,
    interaction: InteractionController,
    mounted: Cell<bool>,
}

impl ElementView {
    /// Mount an element rendered into `node`
    ///
    /// The viewport check runs immediately, so an element already in view
    /// schedules its animation (and calls `on_enter_screen`) before this
    /// returns.
    pub fn mount(
        props: ElementProps,
        callbacks: ElementCallbacks,
        node: NodeRef,
        env: &Environment,
    ) -> Self {
        let editing = props.flags.editing;
        let animation_configured = props.animation.is_some();
        let watches_entry = callbacks.on_enter_screen.is_some();
        let element_id = props.element.id.clone();

        let cell = Rc::new(ElementCell {
            state: RefCell::new(ElementState {
                props,
                callbacks,
                captured_ref: None,
            }),
        });

        let hooks = AnimationHooks {
            start_animation: Rc::new(cell.owner_hook(|c| Rc::clone(&c.start_animation))),
            reset_animation: Rc::new(cell.owner_hook(|c| Rc::clone(&c.reset_animation))),
        };
        let animation = AnimationController::new(
            env.timers.clone(),
            Rc::clone(&env.player),
            node.clone(),
            hooks,
        );
        animation.set_display(env.config.playback_display.clone());

        let watcher = VisibilityWatcher::new(env.scroll.clone(), Rc::clone(&env.window), node);

        let host: Rc<dyn InteractionHost> = cell.clone();
        let interaction = InteractionController::new(
            env.timers.clone(),
            Rc::downgrade(&host),
            env.config.hover_out_debounce_ms,
        );

        let view = Self {
            cell,
            capabilities: Rc::clone(&env.capabilities),
            focus_class: env.config.focus_class.clone(),
            animation,
            watcher,
            interaction,
            mounted: Cell::new(true),
        };

        let should_watch = (!editing && animation_configured) || watches_entry;
        view.arm_viewport_watch(should_watch);
        if editing {
            view.arm_broadcast(&env.animate);
        }

        tracing::debug!(
            element = %element_id,
            editing,
            watching = view.is_watching_viewport(),
            "element mounted"
        );
        view
    }

    fn arm_viewport_watch(&self, should_watch: bool) {
        let cell = Rc::downgrade(&self.cell);
        let animation = self.animation.downgrade();
        self.watcher.arm_if_needed(should_watch, move || {
            let Some(cell) = cell.upgrade() else {
                return;
            };
            let (editing, spec, on_enter) = {
                let state = cell.state.borrow();
                (
                    state.props.flags.editing,
                    state.props.animation.clone(),
                    state.callbacks.on_enter_screen.clone(),
                )
            };

            if !editing {
                if let (Some(spec), Some(animation)) = (spec, animation.upgrade()) {
                    animation.schedule(&spec);
                }
            }
            if let Some(on_enter) = on_enter {
                on_enter();
            }
        });
    }

    fn arm_broadcast(&self, animate: &Channel<AnimateSignal>) {
        let cell = Rc::downgrade(&self.cell);
        self.animation.subscribe_broadcast(animate, move || {
            cell.upgrade().and_then(|cell| cell.animation())
        });
    }

    /// Replace the props for the next render
    pub fn update(&self, props: ElementProps) {
        self.cell.state.borrow_mut().props = props;
    }

    pub fn set_callbacks(&self, callbacks: ElementCallbacks) {
        self.cell.state.borrow_mut().callbacks = callbacks;
    }

    pub fn props(&self) -> ElementProps {
        self.cell.state.borrow().props.clone()
    }

    pub fn element_id(&self) -> String {
        self.cell.state.borrow().props.element.id.clone()
    }

    /// Host reports the rendered tag node
    ///
    /// Only kept while editing; the highlight overlay needs it.
    pub fn capture_ref(&self, node: NodeRef) -> bool {
        let mut state = self.cell.state.borrow_mut();
        if !state.props.flags.editing {
            return false;
        }
        state.captured_ref = Some(node);
        true
    }

    pub fn has_captured_ref(&self) -> bool {
        self.cell.state.borrow().captured_ref.is_some()
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    pub fn render(&self) -> View {
        let (props, captured_ref) = {
            let state = self.cell.state.borrow();
            (state.props.clone(), state.captured_ref.clone())
        };
        let plan = Composition::plan(&props.flags, &props.settings);
        let tag = self.render_tag(&props, captured_ref, plan);

        match (plan.wraps_drag(), props.settings.drag.as_ref()) {
            (true, Some(drag)) => {
                let flags = props.flags;
                let draggable = DraggableProps {
                    drag_info: DragDescriptor {
                        kind: DragKind::Move,
                        id: props.element.id.clone(),
                        context: props.context.clone(),
                        parent_id: props.element.parent.clone(),
                        position_in_parent: props.position_in_parent,
                    },
                    on_click: true,
                    element_type: props.element.tag.clone(),
                    disabled: flags.disable_selection
                        || (flags.selected && drag.locks_when_selected()),
                    options: drag.forwarded_options(),
                };
                self.capabilities.draggable(draggable, tag)
            }
            _ => tag,
        }
    }

    fn render_tag(&self, props: &ElementProps, captured_ref: Option<NodeRef>, plan: Composition) -> View {
        let flags = props.flags;

        let mut style = props
            .style
            .merged(&resolve_position(&props.element, &props.display));
        if is_pre_animation_hidden(
            flags.editing,
            props.animation.is_some(),
            flags.animated,
            flags.animated_editing,
        ) {
            style.set("opacity", StyleValue::Number(0.0));
        }

        let mut children = vec![self.render_content(props, plan)];
        if let Some(highlight) = self.render_highlight(props, captured_ref) {
            children.push(highlight);
        }

        View::Tag(TagView {
            tag: props.html_tag.clone(),
            id: flags.editing.then(|| props.element.id.clone()),
            class_name: props.class_name.clone(),
            style,
            pointer_handlers: flags.editing && !flags.disable_selection,
            captures_ref: flags.editing,
            children,
        })
    }

    fn render_content(&self, props: &ElementProps, plan: Composition) -> View {
        let content = match (plan.wraps_drop(), props.settings.drop.as_ref()) {
            (true, Some(drop)) => {
                let droppable = DroppableProps {
                    drop_info: DropDescriptor {
                        id: props.element.id.clone(),
                        context: props.context.clone(),
                    },
                    element_type: props.element.tag.clone(),
                    placeholder: true,
                    placeholder_render: self.placeholder_renderer(),
                    options: drop.forwarded_options(),
                };
                self.capabilities
                    .droppable(droppable, props.children.clone())
            }
            _ => props.children.clone(),
        };

        if props.flags.editing && props.flags.focused {
            View::Focused {
                class_name: self.focus_class.clone(),
                child: Box::new(content),
            }
        } else {
            content
        }
    }

    fn render_highlight(&self, props: &ElementProps, captured_ref: Option<NodeRef>) -> Option<View> {
        let flags = props.flags;
        let wanted =
            flags.editing && (flags.focused || flags.selected || flags.overed) && !flags.dragging;
        if !wanted {
            return None;
        }

        let dom = captured_ref?;
        Some(self.capabilities.highlight(HighlightProps {
            element: props.element.clone(),
            settings: props.settings.clone(),
            selected: flags.selected,
            focused: flags.focused,
            content_element_id: props.content_element_id.clone(),
            dom,
        }))
    }

    fn placeholder_renderer(&self) -> PlaceholderRenderer {
        let cell = Rc::downgrade(&self.cell);
        let capabilities = Rc::clone(&self.capabilities);
        PlaceholderRenderer::new(move |options| match cell.upgrade() {
            Some(cell) => capabilities.placeholder(cell.placeholder_props(options)),
            None => View::Empty,
        })
    }

    /// Render the empty marker the drop engine previews insertions with
    pub fn render_placeholder(&self, options: &PlaceholderOptions) -> View {
        self.capabilities
            .placeholder(self.cell.placeholder_props(options))
    }

    // ========================================================================
    // Pointer input
    // ========================================================================

    fn handles_pointer(&self) -> bool {
        let flags = self.cell.state.borrow().props.flags;
        self.mounted.get() && flags.editing && !flags.disable_selection
    }

    pub fn pointer_enter(&self) -> bool {
        self.handles_pointer() && self.interaction.pointer_enter()
    }

    /// Pointer enter with the host's event; a handled enter stops propagation
    pub fn pointer_enter_event(&self, event: &mut PointerEvent) -> bool {
        self.handles_pointer() && self.interaction.pointer_enter_event(event)
    }

    pub fn pointer_leave(&self) -> bool {
        self.handles_pointer() && self.interaction.pointer_leave()
    }

    /// Click delivered to this element
    ///
    /// Only the draggable boundary carries a click handler. Without one the
    /// click is ignored and keeps bubbling.
    pub fn click(&self, event: &mut PointerEvent) -> bool {
        let handles = {
            let props = &self.cell.state.borrow().props;
            props.flags.editing && props.settings.drag.is_some()
        };
        if !self.mounted.get() || !handles {
            return false;
        }
        self.interaction.click(event);
        true
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Release every timer and subscription; safe to repeat
    pub fn unmount(&self) {
        if !self.mounted.replace(false) {
            return;
        }
        self.animation.teardown();
        self.watcher.disarm();
        self.interaction.cancel_pending();
        tracing::debug!(element = %self.element_id(), "element unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.get()
    }

    pub fn animation_phase(&self) -> AnimationPhase {
        self.animation.phase()
    }

    pub fn is_watching_viewport(&self) -> bool {
        self.watcher.is_armed()
    }

    pub fn has_entered_viewport(&self) -> bool {
        self.watcher.has_fired()
    }

    pub fn is_subscribed_to_broadcast(&self) -> bool {
        self.animation.is_subscribed()
    }

    pub fn has_pending_hover_out(&self) -> bool {
        self.interaction.has_pending_out()
    }
}

impl Drop for ElementView {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl fmt::Debug for ElementView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementView")
            .field("element", &self.element_id())
            .field("mounted", &self.mounted.get())
            .field("phase", &self.animation_phase())
            .finish_non_exhaustive()
    }
}
