#![forbid(unsafe_code)]

//! The reorder engine.
//!
//! [`Engine`] owns the registry, the host, and the listener, and runs one
//! drag session at a time:
//!
//! ```text
//! Idle ──lift──▶ Dragging ──drop──▶ Dropping ──transition end / timeout──▶ Idle
//!   │               │  ▲                                                  ▲
//!   │  (deferred)   │  └── move / snap / tick                              │
//!   └──▶ AwaitingStart ──resolve──▶ Dragging          cancel ─────────────┘
//! ```
//!
//! Every entry point mutates state first and collects visual [`Effect`]s and
//! listener notifications on the side; a single apply step then hands the
//! effects to the host and the notifications to the listener.
//!
//! # Invariants
//!
//! 1. At most one session exists; lifting while one exists fails with
//!    [`SortError::AlreadyActive`].
//! 2. A session that emitted start emits exactly one end, unless a listener
//!    error aborted it.
//! 3. `from`/`to` are positions in the item order captured at lift, and the
//!    end event's `to` is the final resting index.
//! 4. Item translates are only re-emitted when they change.
//! 5. `drop_item` and `cancel` are no-ops while idle or already dropping.
//!
//! # Failure Modes
//!
//! - The host has no rect for the lifted element: the lift fails with
//!   [`SortError::MissingGeometry`] and nothing is mounted.
//! - The host has no rect for a sibling: the sibling is skipped for collision
//!   and a warning is logged.
//! - The host never reports the proxy's transform transition end: the drop
//!   finishes in [`Engine::tick`] once the drop animation plus the grace
//!   period has elapsed.
//! - A listener returns an error: the session is torn down without further
//!   notifications and the error is returned.

use std::fmt;
use std::mem;

use reorder_core::easing::Transition;
use reorder_core::geometry::{Axis, Point, Rect, Vec2};
use reorder_core::target::{ElementId, EventTarget};
use web_time::Instant;

use crate::auto_scroll::AutoScroller;
use crate::backend::{BackendKind, SortDelegate};
use crate::config::{KeyBindings, PressDelay, SortConfig};
use crate::draggable::{Draggable, clone_fixups};
use crate::error::{Result, SortError};
use crate::events::{BeforeStart, BeforeStartOutcome, Motion, MoveEvent, SortEvent, SortListener};
use crate::host::{Effect, Host, TransitionProperty, TransitionTarget};
use crate::registry::{ItemHandle, Registry, SortableItem};

// ---------------------------------------------------------------------------
// Public state types
// ---------------------------------------------------------------------------

/// Lifecycle phase of a drag surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No gesture in progress.
    Idle,
    /// A backend holds a press that has not lifted yet (press or move delay).
    /// Reported by [`Sorter::phase`](crate::sorter::Sorter::phase); the
    /// engine itself never is in this phase.
    PendingLift,
    /// The before-start hook deferred its answer.
    AwaitingStart,
    Dragging,
    /// The proxy is animating into its slot.
    Dropping,
}

impl Phase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::PendingLift => "pending_lift",
            Self::AwaitingStart => "awaiting_start",
            Self::Dragging => "dragging",
            Self::Dropping => "dropping",
        }
    }
}

/// Result of a lift request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiftOutcome {
    /// The session started and `on_start` fired.
    Started,
    /// The before-start hook deferred; resolve it to continue.
    Deferred,
    /// The before-start hook (or its deferred answer) refused.
    Vetoed,
    /// A drop, cancel, or unregister arrived while the hook was pending.
    Abandoned,
    /// Nothing was awaiting resolution.
    Ignored,
}

/// Default eligibility check: presses on form controls or inside editable
/// regions keep their native behaviour.
#[must_use]
pub fn default_can_sort(target: &EventTarget) -> bool {
    let on_control = target.node().is_some_and(|node| node.kind.is_interactive());
    !on_control && !target.in_editable()
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct SessionItem {
    handle: ItemHandle,
    element: ElementId,
    /// Layout rect at lift, in viewport coordinates at the lift-time scroll.
    rect: Option<Rect>,
    /// Displacement currently applied by the engine.
    translate: Vec2,
}

#[derive(Debug, Clone)]
struct Session {
    item: ItemHandle,
    backend: BackendKind,
    motion: Motion,
    order: Vec<SessionItem>,
    from: usize,
    target: usize,
    draggable: Draggable,
    initial_scroll: Vec2,
    last_position: Option<Point>,
}

impl Session {
    /// Slot an item at position `p` currently occupies on screen.
    fn visual_slot(&self, p: usize) -> usize {
        if self.from < p && p <= self.target {
            p - 1
        } else if self.target <= p && p < self.from {
            p + 1
        } else {
            p
        }
    }

    /// Visual slot of the first non-active item whose on-screen rect holds
    /// `center` along `axis`.
    ///
    /// The active item's own slot (the gap at `target`) is tested first; while
    /// the centre stays inside it the target does not change, so siblings that
    /// only overlap along the enabled axis never steal it.
    fn collide(&self, center: Point, axis: Axis, scroll_delta: Vec2) -> Option<usize> {
        if let Some(gap) = self.order.get(self.target).and_then(|item| item.rect)
            && gap.translate(-scroll_delta).contains_along(center, axis)
        {
            return None;
        }
        self.order
            .iter()
            .enumerate()
            .filter(|&(p, _)| p != self.from)
            .find_map(|(p, item)| {
                let rect = item.rect?.translate(item.translate - scroll_delta);
                rect.contains_along(center, axis)
                    .then(|| self.visual_slot(p))
            })
    }

    /// Translate the item at `p` needs for the current target.
    fn displacement(&self, p: usize, axis: Axis) -> Vec2 {
        let neighbour = if self.from < p && p <= self.target {
            p - 1
        } else if self.target <= p && p < self.from {
            p + 1
        } else {
            return Vec2::ZERO;
        };

        if axis == Axis::XY
            && let (Some(own), Some(next)) = (self.order[p].rect, self.order[neighbour].rect)
        {
            return next.origin() - own.origin();
        }

        let step = self.draggable.slot_step();
        let sign = if neighbour < p { -1.0 } else { 1.0 };
        match axis {
            Axis::Y => Vec2::new(0.0, sign * step.y),
            Axis::X | Axis::XY => Vec2::new(sign * step.x, 0.0),
        }
    }

    /// Bring every item's translate in line with the current target.
    fn relayout(&mut self, axis: Axis, transition: Option<Transition>, effects: &mut Vec<Effect>) {
        for p in 0..self.order.len() {
            let translate = self.displacement(p, axis);
            let item = &mut self.order[p];
            if item.translate != translate {
                item.translate = translate;
                effects.push(Effect::TranslateItem {
                    element: item.element,
                    translate,
                    transition,
                });
            }
        }
    }

    /// Where the proxy's corner rests if dropped now.
    ///
    /// Moving forward aligns the proxy's far edge with the target item's far
    /// edge; otherwise the proxy takes the target item's origin.
    fn resting_position(&self, axis: Axis, scroll_delta: Vec2) -> Point {
        let Some(rect) = self.order.get(self.target).and_then(|item| item.rect) else {
            return self.draggable.initial() - scroll_delta;
        };
        let rect = rect.translate(-scroll_delta);
        if self.target <= self.from {
            return rect.origin();
        }
        let size = self.draggable.size();
        Point::new(
            if axis.horizontal() {
                rect.right() - size.width
            } else {
                rect.x
            },
            if axis.vertical() {
                rect.bottom() - size.height
            } else {
                rect.y
            },
        )
    }

    /// Drop a sibling from the session order, keeping `from` and `target`
    /// pointing at the same logical slots.
    fn remove(&mut self, handle: ItemHandle) -> bool {
        let Some(p) = self.order.iter().position(|item| item.handle == handle) else {
            return false;
        };
        let (from, target) = (self.from, self.target);
        self.order.remove(p);
        if p < from {
            self.from = from - 1;
        }
        if p < target || (p == target && target > from) {
            self.target = target - 1;
        }
        true
    }
}

#[derive(Debug, Clone)]
struct PendingStart {
    item: ItemHandle,
    position: Option<Point>,
    backend: BackendKind,
    /// Latest coalesced move while awaiting.
    latest: Option<Point>,
    abandoned: bool,
}

#[derive(Debug, Clone)]
enum State {
    Idle,
    Awaiting(PendingStart),
    Dragging(Session),
    /// `deadline` is `None` when the drop animation is too long to time out;
    /// only the proxy's transition end finishes such a drop.
    Dropping {
        session: Session,
        deadline: Option<Instant>,
    },
}

#[derive(Debug, Clone, Copy)]
enum Notice {
    Start(SortEvent),
    Move(MoveEvent),
    Over(SortEvent),
    End(SortEvent),
}

fn animated(transition: Transition) -> Option<Transition> {
    (!transition.is_instant()).then_some(transition)
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

type CanSort = Box<dyn Fn(&EventTarget) -> bool>;

/// Drag/reorder state machine for one surface.
pub struct Engine<H, L> {
    config: SortConfig,
    registry: Registry,
    host: H,
    listener: L,
    can_sort: CanSort,
    before_start: Option<Box<dyn BeforeStart>>,
    auto_scroller: AutoScroller,
    state: State,
    effects: Vec<Effect>,
    notices: Vec<Notice>,
}

impl<H, L> fmt::Debug for Engine<H, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("state", &self.state)
            .field("auto_scroller", &self.auto_scroller)
            .field("before_start", &self.before_start.is_some())
            .finish_non_exhaustive()
    }
}

impl<H: Host, L: SortListener> Engine<H, L> {
    /// Create an engine; fails if `config` does not validate.
    pub fn new(config: SortConfig, host: H, listener: L) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            registry: Registry::new(),
            host,
            listener,
            can_sort: Box::new(default_can_sort),
            before_start: None,
            auto_scroller: AutoScroller::new(),
            state: State::Idle,
            effects: Vec::new(),
            notices: Vec::new(),
        })
    }

    /// Replace the eligibility predicate (default: [`default_can_sort`]).
    #[must_use]
    pub fn with_can_sort(mut self, can_sort: impl Fn(&EventTarget) -> bool + 'static) -> Self {
        self.can_sort = Box::new(can_sort);
        self
    }

    #[must_use]
    pub fn with_before_start(mut self, hook: impl BeforeStart + 'static) -> Self {
        self.before_start = Some(Box::new(hook));
        self
    }

    // -- accessors ----------------------------------------------------------

    pub fn config(&self) -> &SortConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            State::Idle => Phase::Idle,
            State::Awaiting(_) => Phase::AwaitingStart,
            State::Dragging(_) => Phase::Dragging,
            State::Dropping { .. } => Phase::Dropping,
        }
    }

    /// Item being sorted (or awaiting its before-start answer).
    pub fn active_item(&self) -> Option<ItemHandle> {
        match &self.state {
            State::Idle => None,
            State::Awaiting(pending) => Some(pending.item),
            State::Dragging(session) | State::Dropping { session, .. } => Some(session.item),
        }
    }

    /// Current `(from, to)` of the running session.
    pub fn session_indices(&self) -> Option<(usize, usize)> {
        match &self.state {
            State::Dragging(session) | State::Dropping { session, .. } => {
                Some((session.from, session.target))
            }
            _ => None,
        }
    }

    /// Current proxy corner of the running session.
    pub fn proxy_position(&self) -> Option<Point> {
        match &self.state {
            State::Dragging(session) | State::Dropping { session, .. } => {
                Some(session.draggable.position())
            }
            _ => None,
        }
    }

    pub fn is_auto_scrolling(&self) -> bool {
        self.auto_scroller.is_active()
    }

    // -- registration -------------------------------------------------------

    pub fn register(&mut self, item: SortableItem) -> ItemHandle {
        let handle = self.registry.register(item);
        tracing::trace!(
            message = "sort.register",
            item = %handle,
            element = %item.element,
            index = item.index
        );
        handle
    }

    /// Remove an item. Removing the active item tears its session down like
    /// a pointer cancel; removing a sibling drops it from the session order.
    pub fn unregister(&mut self, handle: ItemHandle) -> Result<()> {
        let axis = self.config.axis;
        let transition = animated(self.config.out_of_the_way_animation);
        let mut teardown = false;
        match &mut self.state {
            State::Awaiting(pending) if pending.item == handle => pending.abandoned = true,
            State::Dragging(session) | State::Dropping { session, .. } if session.item == handle => {
                session.target = session.from;
                teardown = true;
            }
            State::Dragging(session) => {
                if session.remove(handle) {
                    session.relayout(axis, transition, &mut self.effects);
                    self.registry.set_pending_target(session.target);
                }
            }
            State::Dropping { session, .. } => {
                session.remove(handle);
            }
            _ => {}
        }

        self.registry.unregister(handle);
        if teardown {
            tracing::debug!(message = "sort.unregister_active", item = %handle);
            self.finish();
        }
        self.apply()
    }

    pub fn update_index(&mut self, handle: ItemHandle, index: usize) -> Result<()> {
        self.registry.update_index(handle, index)
    }

    pub fn update_disabled(&mut self, handle: ItemHandle, disabled: bool) -> Result<()> {
        self.registry.update_disabled(handle, disabled)
    }

    // -- lifting ------------------------------------------------------------

    /// Resolve an event target to a liftable item, or `None` when the press
    /// must not start a drag.
    pub fn resolve_lift(&self, target: &EventTarget, backend: BackendKind) -> Option<ItemHandle> {
        if !matches!(self.state, State::Idle) || !(self.can_sort)(target) {
            return None;
        }
        let (element, handle) = target.path().iter().find_map(|node| {
            self.registry
                .handle_for(node.element)
                .map(|handle| (node.element, handle))
        })?;
        if self.registry.get(handle).is_none_or(|item| item.disabled) {
            return None;
        }
        if self.config.with_handle
            && backend != BackendKind::Keyboard
            && !target.up_to(element).iter().any(|node| node.handle)
        {
            return None;
        }
        Some(handle)
    }

    /// Lift `item`. `position` is the input position used to compute the
    /// grab offset; `None` grabs the element at its top-left corner.
    pub fn lift(
        &mut self,
        item: ItemHandle,
        position: Option<Point>,
        backend: BackendKind,
        now: Instant,
    ) -> Result<LiftOutcome> {
        if let Some(active) = self.active_item() {
            return Err(SortError::AlreadyActive { active });
        }
        let order = self.registry.ordered_items();
        let from = order
            .iter()
            .position(|&(handle, _)| handle == item)
            .ok_or(SortError::NotRegistered(item))?;

        let motion = backend.motion();
        let event = SortEvent::new(from, from, motion);
        let outcome = match self.before_start.as_mut() {
            Some(hook) => hook.before_start(&event),
            None => BeforeStartOutcome::Proceed,
        };

        match outcome {
            BeforeStartOutcome::Veto => {
                tracing::debug!(message = "sort.veto", item = %item, from);
                Ok(LiftOutcome::Vetoed)
            }
            BeforeStartOutcome::Deferred => {
                tracing::debug!(message = "sort.defer", item = %item, from);
                self.state = State::Awaiting(PendingStart {
                    item,
                    position,
                    backend,
                    latest: None,
                    abandoned: false,
                });
                Ok(LiftOutcome::Deferred)
            }
            BeforeStartOutcome::Proceed => {
                self.begin(item, position, backend, now)?;
                self.apply()?;
                Ok(LiftOutcome::Started)
            }
        }
    }

    /// Answer a deferred before-start hook.
    pub fn resolve_before_start(&mut self, proceed: bool, now: Instant) -> Result<LiftOutcome> {
        if !matches!(self.state, State::Awaiting(_)) {
            return Ok(LiftOutcome::Ignored);
        }
        let State::Awaiting(pending) = mem::replace(&mut self.state, State::Idle) else {
            return Ok(LiftOutcome::Ignored);
        };

        if pending.abandoned || self.registry.get(pending.item).is_none() {
            tracing::debug!(message = "sort.abandon", item = %pending.item);
            return Ok(LiftOutcome::Abandoned);
        }
        if !proceed {
            tracing::debug!(message = "sort.veto", item = %pending.item);
            return Ok(LiftOutcome::Vetoed);
        }

        self.begin(pending.item, pending.position, pending.backend, now)?;
        if let Some(latest) = pending.latest {
            self.follow(latest, now);
        }
        self.apply()?;
        Ok(LiftOutcome::Started)
    }

    /// Measure geometry, mount the proxy, and enter `Dragging`.
    fn begin(
        &mut self,
        item: ItemHandle,
        position: Option<Point>,
        backend: BackendKind,
        _now: Instant,
    ) -> Result<()> {
        let element = self
            .registry
            .get(item)
            .ok_or(SortError::NotRegistered(item))?
            .element;
        let source_rect = self
            .host
            .item_rect(element)
            .ok_or(SortError::MissingGeometry { element })?;

        let order: Vec<SessionItem> = self
            .registry
            .ordered_items()
            .into_iter()
            .map(|(handle, entry)| {
                let rect = if handle == item {
                    Some(source_rect)
                } else {
                    self.host.item_rect(entry.element)
                };
                if rect.is_none() {
                    tracing::warn!(
                        message = "sort.geometry_missing",
                        element = %entry.element,
                        index = entry.index
                    );
                }
                SessionItem {
                    handle,
                    element: entry.element,
                    rect,
                    translate: Vec2::ZERO,
                }
            })
            .collect();
        let from = order
            .iter()
            .position(|entry| entry.handle == item)
            .ok_or(SortError::NotRegistered(item))?;

        let margins = self
            .host
            .item_margins(element)
            .item_spacing(self.host.container_gap());
        let pointer = position.unwrap_or_else(|| source_rect.origin());
        let draggable = Draggable::new(
            element,
            source_rect,
            pointer,
            self.host.container_rect(),
            margins,
            self.config.axis,
        )
        .with_lock_axis(self.config.lock_axis)
        .with_lock_to_edges(self.config.lock_to_container_edges);

        self.registry.activate(item)?;
        self.registry.set_pending_target(from);

        let motion = backend.motion();
        self.effects.push(Effect::MountProxy {
            source: element,
            container: self.config.helper_container,
            rect: source_rect,
            fixups: clone_fixups(&self.host.proxy_fields(element)),
            focus: motion == Motion::Snap,
        });
        if self.config.hide_ghost {
            self.effects.push(Effect::SetVisible {
                element,
                visible: false,
            });
        }

        self.auto_scroller.clear();
        self.state = State::Dragging(Session {
            item,
            backend,
            motion,
            order,
            from,
            target: from,
            draggable,
            initial_scroll: self.host.scroll_metrics().offset,
            last_position: None,
        });
        self.notices
            .push(Notice::Start(SortEvent::new(from, from, motion)));

        tracing::debug!(
            message = "sort.lift",
            item = %item,
            element = %element,
            from,
            backend = backend.as_str(),
            motion = motion.as_str()
        );
        Ok(())
    }

    // -- moving -------------------------------------------------------------

    /// Follow an input position (fluid sessions). While the before-start
    /// hook is pending the latest position is kept and applied on start.
    pub fn move_to(&mut self, position: Point, now: Instant) -> Result<()> {
        self.follow(position, now);
        self.apply()
    }

    fn follow(&mut self, position: Point, now: Instant) {
        let axis = self.config.axis;
        let session = match &mut self.state {
            State::Awaiting(pending) => {
                if !pending.abandoned {
                    pending.latest = Some(position);
                }
                return;
            }
            State::Dragging(session) if session.motion == Motion::Fluid => session,
            _ => return,
        };

        if let Some(last) = session.last_position {
            let unchanged = match axis {
                Axis::X => last.x == position.x,
                Axis::Y => last.y == position.y,
                Axis::XY => last == position,
            };
            if unchanged {
                return;
            }
        }
        session.last_position = Some(position);

        let proxy = session.draggable.follow(position);
        self.effects.push(Effect::MoveProxy {
            position: proxy,
            transition: None,
        });
        tracing::trace!(message = "sort.move", x = proxy.x, y = proxy.y);

        self.reindex();
        self.update_auto_scroll(now);

        if let State::Dragging(session) = &self.state {
            self.notices.push(Notice::Move(MoveEvent {
                position,
                proxy,
                to: session.target,
                motion: session.motion,
            }));
        }
    }

    /// Collision against siblings; retarget when the proxy centre entered a
    /// different slot.
    fn reindex(&mut self) {
        let State::Dragging(session) = &mut self.state else {
            return;
        };
        let axis = self.config.axis;
        let scroll_delta = self.host.scroll_metrics().offset - session.initial_scroll;
        let Some(slot) = session.collide(session.draggable.center(), axis, scroll_delta) else {
            return;
        };
        if slot == session.target {
            return;
        }

        session.target = slot;
        session.relayout(
            axis,
            animated(self.config.out_of_the_way_animation),
            &mut self.effects,
        );
        self.registry.set_pending_target(slot);
        self.notices.push(Notice::Over(SortEvent::new(
            session.from,
            slot,
            session.motion,
        )));
        tracing::debug!(message = "sort.over", from = session.from, to = slot);
    }

    fn update_auto_scroll(&mut self, now: Instant) {
        let State::Dragging(session) = &self.state else {
            return;
        };
        if self.config.disable_auto_scroll {
            self.auto_scroller.clear();
            return;
        }
        let was_active = self.auto_scroller.is_active();
        let metrics = self.host.scroll_metrics();
        let velocity = self.auto_scroller.update(
            session.draggable.position(),
            session.draggable.bounds(),
            session.draggable.size(),
            self.config.axis,
            &metrics,
            now,
        );
        if was_active != self.auto_scroller.is_active() {
            tracing::debug!(
                message = "sort.autoscroll",
                active = self.auto_scroller.is_active(),
                vx = velocity.x,
                vy = velocity.y
            );
        }
    }

    /// Move the active item one slot (keyboard). Returns `false` when the
    /// step would leave `[0, last]` or no snap session is running.
    pub fn snap(&mut self, step: isize, _now: Instant) -> Result<bool> {
        let axis = self.config.axis;
        let State::Dragging(session) = &mut self.state else {
            return Ok(false);
        };
        if session.motion != Motion::Snap {
            return Ok(false);
        }
        let last = session.order.len().saturating_sub(1);
        let Some(next) = session
            .target
            .checked_add_signed(step)
            .filter(|&next| next <= last && next != session.target)
        else {
            return Ok(false);
        };

        session.target = next;
        session.relayout(
            axis,
            animated(self.config.out_of_the_way_animation),
            &mut self.effects,
        );
        self.registry.set_pending_target(next);
        self.notices.push(Notice::Over(SortEvent::new(
            session.from,
            next,
            session.motion,
        )));

        let scroll_delta = self.host.scroll_metrics().offset - session.initial_scroll;
        let rest = session.resting_position(axis, scroll_delta);
        session.draggable.place(rest);
        if !self.config.disable_auto_scroll {
            let overflow = session.draggable.clamp_to_bounds();
            if !overflow.is_zero() {
                let applied = self.host.scroll_by(overflow);
                tracing::debug!(
                    message = "sort.autoscroll",
                    motion = "snap",
                    dx = applied.x,
                    dy = applied.y
                );
            }
        }
        self.effects.push(Effect::MoveProxy {
            position: session.draggable.position(),
            transition: animated(self.config.keyboard_transition),
        });
        tracing::debug!(message = "sort.over", from = session.from, to = next, motion = "snap");

        self.apply()?;
        Ok(true)
    }

    // -- dropping -----------------------------------------------------------

    /// Release the active item.
    ///
    /// Fluid sessions with a drop animation enter `Dropping` until the host
    /// reports the proxy's transform transition end (or the timeout in
    /// [`Engine::tick`] fires). Snap sessions finish immediately.
    pub fn drop_item(&mut self, now: Instant) -> Result<()> {
        let axis = self.config.axis;
        let drop_animation = self.config.drop_animation;
        let session = match &mut self.state {
            State::Awaiting(pending) => {
                pending.abandoned = true;
                tracing::debug!(message = "sort.abandon", item = %pending.item);
                return Ok(());
            }
            State::Dragging(session) => session,
            _ => return Ok(()),
        };
        self.auto_scroller.clear();

        tracing::debug!(
            message = "sort.drop",
            from = session.from,
            to = session.target,
            motion = session.motion.as_str()
        );

        if session.motion == Motion::Fluid && !drop_animation.is_instant() {
            let scroll_delta = self.host.scroll_metrics().offset - session.initial_scroll;
            let rest = session.resting_position(axis, scroll_delta);
            session.draggable.place(rest);
            self.effects.push(Effect::MoveProxy {
                position: rest,
                transition: Some(drop_animation),
            });
            let deadline = drop_animation
                .duration
                .checked_add(self.config.drop_timeout_grace)
                .and_then(|wait| now.checked_add(wait));
            if let State::Dragging(session) = mem::replace(&mut self.state, State::Idle) {
                self.state = State::Dropping { session, deadline };
            }
        } else {
            self.finish();
        }
        self.apply()
    }

    /// Host notification that a CSS transition finished.
    ///
    /// Only the proxy's transform transition ends a drop; other properties
    /// (opacity, say) and item transitions are ignored.
    pub fn transition_end(
        &mut self,
        target: TransitionTarget,
        property: TransitionProperty,
        _now: Instant,
    ) -> Result<()> {
        if matches!(self.state, State::Dropping { .. })
            && target == TransitionTarget::Proxy
            && property == TransitionProperty::Transform
        {
            self.finish();
            return self.apply();
        }
        Ok(())
    }

    /// Abort the gesture.
    ///
    /// Snap sessions step back to their origin (firing over) and drop; fluid
    /// sessions tear down immediately. Either way `on_end` fires with
    /// `from == to`.
    pub fn cancel(&mut self, now: Instant) -> Result<()> {
        let axis = self.config.axis;
        let session = match &mut self.state {
            State::Awaiting(pending) => {
                pending.abandoned = true;
                tracing::debug!(message = "sort.abandon", item = %pending.item);
                return Ok(());
            }
            State::Dragging(session) => session,
            _ => return Ok(()),
        };
        tracing::debug!(
            message = "sort.cancel",
            from = session.from,
            to = session.target,
            motion = session.motion.as_str()
        );

        if session.motion == Motion::Snap {
            if session.target != session.from {
                session.target = session.from;
                session.relayout(
                    axis,
                    animated(self.config.out_of_the_way_animation),
                    &mut self.effects,
                );
                self.registry.set_pending_target(session.from);
                self.notices.push(Notice::Over(SortEvent::new(
                    session.from,
                    session.from,
                    session.motion,
                )));
            }
            let scroll_delta = self.host.scroll_metrics().offset - session.initial_scroll;
            let origin = session.resting_position(axis, scroll_delta);
            session.draggable.place(origin);
            self.effects.push(Effect::MoveProxy {
                position: origin,
                transition: animated(self.config.keyboard_transition),
            });
            return self.drop_item(now);
        }

        session.target = session.from;
        self.finish();
        self.apply()
    }

    /// Advance time: auto-scroll steps and the drop timeout.
    pub fn tick(&mut self, now: Instant) -> Result<()> {
        match &self.state {
            State::Dropping { deadline, .. } => {
                if deadline.is_some_and(|deadline| now >= deadline) {
                    tracing::debug!(message = "sort.drop_timeout");
                    self.finish();
                    return self.apply();
                }
                Ok(())
            }
            State::Dragging(session) if session.motion == Motion::Fluid => {
                let Some(delta) = self.auto_scroller.poll(now) else {
                    return Ok(());
                };
                let applied = self.host.scroll_by(delta);
                if applied.is_zero() {
                    self.auto_scroller.clear();
                    tracing::debug!(message = "sort.autoscroll", active = false, reason = "edge");
                    return Ok(());
                }
                tracing::trace!(message = "sort.autoscroll", dx = applied.x, dy = applied.y);
                self.reindex();
                self.apply()
            }
            _ => Ok(()),
        }
    }

    /// Tear the session down and queue `on_end`.
    fn finish(&mut self) {
        let session = match mem::replace(&mut self.state, State::Idle) {
            State::Dragging(session) | State::Dropping { session, .. } => session,
            other => {
                self.state = other;
                return;
            }
        };
        self.teardown(&session);
        self.notices.push(Notice::End(SortEvent::new(
            session.from,
            session.target,
            session.motion,
        )));
        tracing::debug!(
            message = "sort.end",
            from = session.from,
            to = session.target,
            motion = session.motion.as_str()
        );
    }

    fn teardown(&mut self, session: &Session) {
        self.auto_scroller.clear();
        self.effects.push(Effect::UnmountProxy);
        let source = session.draggable.source();
        if self.config.hide_ghost {
            self.effects.push(Effect::SetVisible {
                element: source,
                visible: true,
            });
        }
        self.effects.extend(
            session
                .order
                .iter()
                .map(|item| Effect::ResetItem {
                    element: item.element,
                }),
        );
        if session.backend == BackendKind::Keyboard {
            self.effects.push(Effect::Focus { element: source });
        }
        self.registry.deactivate();
    }

    /// Tear down without notifying anyone (listener failure).
    fn abort(&mut self) {
        match mem::replace(&mut self.state, State::Idle) {
            State::Dragging(session) | State::Dropping { session, .. } => {
                self.teardown(&session);
                tracing::debug!(message = "sort.abort", from = session.from);
            }
            State::Awaiting(_) | State::Idle => {}
        }
        self.notices.clear();
        for effect in self.effects.drain(..) {
            self.host.apply(effect);
        }
    }

    /// Hand queued effects to the host, then queued notifications to the
    /// listener.
    fn apply(&mut self) -> Result<()> {
        for effect in self.effects.drain(..) {
            self.host.apply(effect);
        }
        let notices = mem::take(&mut self.notices);
        for notice in notices {
            let (result, ends) = match &notice {
                Notice::Start(event) => (self.listener.on_start(event), false),
                Notice::Move(event) => (self.listener.on_move(event), false),
                Notice::Over(event) => (self.listener.on_over(event), false),
                Notice::End(event) => (self.listener.on_end(event), true),
            };
            if let Err(error) = result {
                tracing::warn!(message = "sort.listener_error", error = %error, ends);
                if !ends {
                    self.abort();
                }
                return Err(SortError::Listener(error));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SortDelegate
// ---------------------------------------------------------------------------

impl<H: Host, L: SortListener> SortDelegate for Engine<H, L> {
    fn resolve_lift(&self, target: &EventTarget, backend: BackendKind) -> Option<ItemHandle> {
        Engine::resolve_lift(self, target, backend)
    }

    fn lift(
        &mut self,
        item: ItemHandle,
        position: Option<Point>,
        backend: BackendKind,
        now: Instant,
    ) -> Result<LiftOutcome> {
        Engine::lift(self, item, position, backend, now)
    }

    fn move_to(&mut self, position: Point, now: Instant) -> Result<()> {
        Engine::move_to(self, position, now)
    }

    fn snap(&mut self, step: isize, now: Instant) -> Result<bool> {
        Engine::snap(self, step, now)
    }

    fn drop_item(&mut self, now: Instant) -> Result<()> {
        Engine::drop_item(self, now)
    }

    fn cancel(&mut self, now: Instant) -> Result<()> {
        Engine::cancel(self, now)
    }

    fn press_delay(&self) -> PressDelay {
        self.config.press_delay
    }

    fn move_delay(&self) -> f32 {
        self.config.move_delay
    }

    fn key_bindings(&self) -> &KeyBindings {
        &self.config.key_bindings
    }

    fn sorting_backend(&self) -> Option<BackendKind> {
        match &self.state {
            State::Awaiting(pending) if !pending.abandoned => Some(pending.backend),
            State::Dragging(session) | State::Dropping { session, .. } => Some(session.backend),
            _ => None,
        }
    }
}
