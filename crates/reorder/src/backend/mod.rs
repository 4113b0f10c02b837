#![forbid(unsafe_code)]

//! Input backends.
//!
//! A backend turns one input family into lift/move/drop/cancel requests on a
//! [`SortDelegate`]. Backends hold only their own pending-press state; the
//! session lives in the engine, so swapping or adding a backend never touches
//! sorting logic.
//!
//! | Backend              | Motion | Lifts on                          |
//! |----------------------|--------|-----------------------------------|
//! | [`PointerBackend`]   | Fluid  | primary-button press              |
//! | [`TouchBackend`]     | Fluid  | touch start (first finger only)   |
//! | [`KeyboardBackend`]  | Snap   | lift key on the focused item      |
//!
//! # Failure Modes
//!
//! - The item is unregistered while a press is pending: the delayed lift is
//!   dropped and logged, not reported as an error.
//! - A backend sees input while another backend owns the session: it ignores
//!   it, except that the keyboard cancel key cancels any session.

mod keyboard;
mod pointer;
mod touch;

use std::fmt;

use reorder_core::event::InputEvent;
use reorder_core::geometry::Point;
use reorder_core::target::EventTarget;
use web_time::Instant;

use crate::config::{KeyBindings, PressDelay};
use crate::engine::LiftOutcome;
use crate::error::{Result, SortError};
use crate::events::Motion;
use crate::registry::ItemHandle;

pub use keyboard::KeyboardBackend;
pub use pointer::PointerBackend;
pub use touch::TouchBackend;

/// Which input family owns a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    Pointer,
    Touch,
    Keyboard,
}

impl BackendKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pointer => "pointer",
            Self::Touch => "touch",
            Self::Keyboard => "keyboard",
        }
    }

    /// Keyboard sessions snap slot by slot; the others follow the input.
    #[must_use]
    pub const fn motion(self) -> Motion {
        match self {
            Self::Keyboard => Motion::Snap,
            Self::Pointer | Self::Touch => Motion::Fluid,
        }
    }
}

/// What a backend did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventOutcome {
    /// The event drove the sorter.
    pub consumed: bool,
    /// The host should suppress the event's default action.
    pub prevent_default: bool,
}

impl EventOutcome {
    pub const IGNORED: Self = Self {
        consumed: false,
        prevent_default: false,
    };

    pub const CONSUMED: Self = Self {
        consumed: true,
        prevent_default: false,
    };

    /// Consumed with the default action suppressed.
    pub const HANDLED: Self = Self {
        consumed: true,
        prevent_default: true,
    };

    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self {
            consumed: self.consumed || other.consumed,
            prevent_default: self.prevent_default || other.prevent_default,
        }
    }
}

/// The sorting operations a backend may request.
pub trait SortDelegate {
    /// The registered item a press on `target` would lift, if any.
    fn resolve_lift(&self, target: &EventTarget, backend: BackendKind) -> Option<ItemHandle>;

    fn lift(
        &mut self,
        item: ItemHandle,
        position: Option<Point>,
        backend: BackendKind,
        now: Instant,
    ) -> Result<LiftOutcome>;

    fn move_to(&mut self, position: Point, now: Instant) -> Result<()>;

    /// Step the active item by `step` slots; `false` when out of range.
    fn snap(&mut self, step: isize, now: Instant) -> Result<bool>;

    fn drop_item(&mut self, now: Instant) -> Result<()>;

    fn cancel(&mut self, now: Instant) -> Result<()>;

    fn press_delay(&self) -> PressDelay;

    fn move_delay(&self) -> f32;

    fn key_bindings(&self) -> &KeyBindings;

    /// Backend owning the current (or awaiting) session.
    fn sorting_backend(&self) -> Option<BackendKind>;

    fn is_sorting(&self) -> bool {
        self.sorting_backend().is_some()
    }
}

/// One input family.
pub trait Backend: fmt::Debug {
    fn kind(&self) -> BackendKind;

    fn handle(
        &mut self,
        event: &InputEvent,
        now: Instant,
        delegate: &mut dyn SortDelegate,
    ) -> Result<EventOutcome>;

    /// Advance timers (press delay).
    fn tick(&mut self, _now: Instant, _delegate: &mut dyn SortDelegate) -> Result<()> {
        Ok(())
    }

    /// A press is held but has not lifted yet.
    fn has_pending(&self) -> bool {
        false
    }

    /// Forget any pending press.
    fn reset(&mut self) {}
}

// ---------------------------------------------------------------------------
// Pending press (shared by pointer and touch)
// ---------------------------------------------------------------------------

/// Whether a press lifts on contact (no press delay, no move delay).
pub(crate) fn lifts_on_press(press_delay: PressDelay, move_delay: f32) -> bool {
    !press_delay.is_set() && move_delay <= 0.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PressStep {
    Wait,
    Lift,
    Abort,
}

/// A press that has not lifted yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PendingPress {
    pub(crate) item: ItemHandle,
    pub(crate) origin: Point,
    pub(crate) latest: Point,
    pub(crate) pressed_at: Instant,
}

impl PendingPress {
    pub(crate) fn new(item: ItemHandle, origin: Point, now: Instant) -> Self {
        Self {
            item,
            origin,
            latest: origin,
            pressed_at: now,
        }
    }

    /// Movement while held. With a press delay, moving too far aborts;
    /// with a move delay, moving far enough lifts.
    pub(crate) fn on_move(&mut self, position: Point, press_delay: PressDelay, move_delay: f32) -> PressStep {
        self.latest = position;
        let distance = self.origin.distance(position);
        if press_delay.is_set() {
            if distance > press_delay.distance_threshold {
                PressStep::Abort
            } else {
                PressStep::Wait
            }
        } else if distance >= move_delay {
            PressStep::Lift
        } else {
            PressStep::Wait
        }
    }

    pub(crate) fn delay_elapsed(&self, now: Instant, press_delay: PressDelay) -> bool {
        press_delay.is_set() && now.saturating_duration_since(self.pressed_at) >= press_delay.time
    }

    /// Lift at the press origin, then catch up to the latest position.
    ///
    /// Returns whether a session now exists (started or awaiting).
    pub(crate) fn lift(
        self,
        kind: BackendKind,
        now: Instant,
        delegate: &mut dyn SortDelegate,
    ) -> Result<bool> {
        if delegate.is_sorting() {
            return Ok(false);
        }
        let outcome = match delegate.lift(self.item, Some(self.origin), kind, now) {
            Ok(outcome) => outcome,
            Err(SortError::NotRegistered(item)) => {
                tracing::debug!(
                    message = "sort.backend.abort",
                    backend = kind.as_str(),
                    item = %item,
                    reason = "unregistered"
                );
                return Ok(false);
            }
            Err(err) => return Err(err),
        };
        let lifted = matches!(outcome, LiftOutcome::Started | LiftOutcome::Deferred);
        if lifted && self.latest != self.origin {
            delegate.move_to(self.latest, now)?;
        }
        Ok(lifted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn press() -> PendingPress {
        PendingPress::new(ItemHandle::from_raw(1), Point::new(10.0, 10.0), Instant::now())
    }

    #[test]
    fn press_delay_aborts_on_movement_past_threshold() {
        let delay = PressDelay::new(Duration::from_millis(200), 5.0);
        let mut pending = press();
        assert_eq!(pending.on_move(Point::new(13.0, 10.0), delay, 0.0), PressStep::Wait);
        assert_eq!(pending.on_move(Point::new(16.0, 10.0), delay, 0.0), PressStep::Abort);
    }

    #[test]
    fn move_delay_lifts_past_distance() {
        let mut pending = press();
        let delay = PressDelay::default();
        assert_eq!(pending.on_move(Point::new(10.0, 15.0), delay, 8.0), PressStep::Wait);
        assert_eq!(pending.on_move(Point::new(10.0, 18.0), delay, 8.0), PressStep::Lift);
        assert_eq!(pending.latest, Point::new(10.0, 18.0));
    }

    #[test]
    fn delay_elapses_only_when_set() {
        let pending = press();
        let later = pending.pressed_at + Duration::from_millis(250);
        assert!(!pending.delay_elapsed(later, PressDelay::default()));
        let delay = PressDelay::new(Duration::from_millis(200), 5.0);
        assert!(pending.delay_elapsed(later, delay));
        assert!(!pending.delay_elapsed(pending.pressed_at, delay));
    }

    #[test]
    fn lifts_on_press_without_delays() {
        assert!(lifts_on_press(PressDelay::default(), 0.0));
        assert!(!lifts_on_press(PressDelay::default(), 4.0));
        assert!(!lifts_on_press(
            PressDelay::new(Duration::from_millis(1), 5.0),
            0.0
        ));
    }

    #[test]
    fn outcomes_merge() {
        assert_eq!(
            EventOutcome::IGNORED.merge(EventOutcome::HANDLED),
            EventOutcome::HANDLED
        );
        assert_eq!(BackendKind::Keyboard.motion(), Motion::Snap);
        assert_eq!(BackendKind::Touch.motion(), Motion::Fluid);
    }
}
