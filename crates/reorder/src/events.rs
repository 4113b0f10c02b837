#![forbid(unsafe_code)]

//! Lifecycle events and the host callbacks that receive them.
//!
//! Every session that fires `on_start` fires exactly one `on_end`, with any
//! number of `on_over` (and pass-through `on_move`) calls in between:
//!
//! ```text
//! start → (move | over)* → end
//! ```
//!
//! `from` and `to` are positions in the item order captured at lift. `to` in
//! `on_end` is the final resting index, so `array_move(list, from, to)`
//! reproduces what the user saw.

use reorder_core::geometry::Point;

use crate::error::ListenerError;

/// How the proxy travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motion {
    /// Follows a pointer or touch continuously.
    Fluid,
    /// Jumps one slot at a time (keyboard).
    Snap,
}

impl Motion {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fluid => "fluid",
            Self::Snap => "snap",
        }
    }
}

/// Payload of start, over, end, and before-start notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortEvent {
    pub from: usize,
    pub to: usize,
    pub motion: Motion,
}

impl SortEvent {
    #[must_use]
    pub const fn new(from: usize, to: usize, motion: Motion) -> Self {
        Self { from, to, motion }
    }

    /// The drag left the item where it started.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

/// Payload of the pass-through move notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveEvent {
    /// Input position that caused the move.
    pub position: Point,
    /// Proxy top-left after the move.
    pub proxy: Point,
    /// Current target slot.
    pub to: usize,
    pub motion: Motion,
}

pub type ListenerResult = Result<(), ListenerError>;

/// Receives lifecycle notifications.
///
/// Returning an error from any callback makes the engine tear the session
/// down (no further callbacks for it) and hand the error back to the caller
/// of the entry point that triggered it.
pub trait SortListener {
    fn on_start(&mut self, _event: &SortEvent) -> ListenerResult {
        Ok(())
    }

    fn on_move(&mut self, _event: &MoveEvent) -> ListenerResult {
        Ok(())
    }

    fn on_over(&mut self, _event: &SortEvent) -> ListenerResult {
        Ok(())
    }

    /// Mandatory: the host must persist the new order here.
    fn on_end(&mut self, event: &SortEvent) -> ListenerResult;
}

/// Decision of a before-start hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeforeStartOutcome {
    /// Lift now.
    Proceed,
    /// Do not lift; no events fire.
    Veto,
    /// The host will answer later through
    /// [`Sorter::resolve_before_start`](crate::sorter::Sorter::resolve_before_start).
    Deferred,
}

/// Runs before geometry is measured, so the host can re-render first.
pub trait BeforeStart {
    fn before_start(&mut self, event: &SortEvent) -> BeforeStartOutcome;
}

impl<F> BeforeStart for F
where
    F: FnMut(&SortEvent) -> BeforeStartOutcome,
{
    fn before_start(&mut self, event: &SortEvent) -> BeforeStartOutcome {
        self(event)
    }
}
