#![forbid(unsafe_code)]

//! Touch input.
//!
//! Only the finger that lifted an item drives it; other touches are ignored
//! until that finger ends. A touch cancel (the system took the gesture over)
//! drops rather than cancels, so the visible order is kept.

use reorder_core::event::{InputEvent, TouchEventKind, TouchId};
use web_time::Instant;

use super::{Backend, BackendKind, EventOutcome, PendingPress, PressStep, SortDelegate, lifts_on_press};
use crate::engine::LiftOutcome;
use crate::error::Result;

#[derive(Debug, Clone, Default)]
pub struct TouchBackend {
    pending: Option<(TouchId, PendingPress)>,
    active: Option<TouchId>,
}

impl TouchBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Finger currently driving a session.
    #[must_use]
    pub fn active_touch(&self) -> Option<TouchId> {
        self.active
    }
}

impl Backend for TouchBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Touch
    }

    fn handle(
        &mut self,
        event: &InputEvent,
        now: Instant,
        delegate: &mut dyn SortDelegate,
    ) -> Result<EventOutcome> {
        let InputEvent::Touch(event) = event else {
            return Ok(EventOutcome::IGNORED);
        };
        // The session may have ended through another path (cancel, unregister).
        if self.active.is_some() && delegate.sorting_backend() != Some(BackendKind::Touch) {
            self.active = None;
        }

        match event.kind {
            TouchEventKind::Start => {
                if self.active.is_some() || self.pending.is_some() || delegate.is_sorting() {
                    return Ok(EventOutcome::IGNORED);
                }
                let Some(item) = delegate.resolve_lift(&event.target, BackendKind::Touch) else {
                    return Ok(EventOutcome::IGNORED);
                };
                if lifts_on_press(delegate.press_delay(), delegate.move_delay()) {
                    let outcome = delegate.lift(item, Some(event.position), BackendKind::Touch, now)?;
                    if matches!(outcome, LiftOutcome::Started | LiftOutcome::Deferred) {
                        self.active = Some(event.id);
                    }
                } else {
                    self.pending = Some((event.id, PendingPress::new(item, event.position, now)));
                    tracing::debug!(
                        message = "sort.backend.press",
                        backend = "touch",
                        item = %item,
                        touch = event.id.0
                    );
                }
                Ok(EventOutcome::CONSUMED)
            }
            TouchEventKind::Move => {
                if self.active == Some(event.id) {
                    delegate.move_to(event.position, now)?;
                    // Keep the page from scrolling under the finger.
                    return Ok(EventOutcome::HANDLED);
                }
                let Some((id, pending)) = self.pending.as_mut() else {
                    return Ok(EventOutcome::IGNORED);
                };
                if *id != event.id {
                    return Ok(EventOutcome::IGNORED);
                }
                match pending.on_move(event.position, delegate.press_delay(), delegate.move_delay()) {
                    PressStep::Wait => Ok(EventOutcome::CONSUMED),
                    PressStep::Abort => {
                        self.pending = None;
                        tracing::debug!(
                            message = "sort.backend.abort",
                            backend = "touch",
                            reason = "moved"
                        );
                        Ok(EventOutcome::IGNORED)
                    }
                    PressStep::Lift => {
                        if let Some((id, pending)) = self.pending.take()
                            && pending.lift(BackendKind::Touch, now, delegate)?
                        {
                            self.active = Some(id);
                        }
                        Ok(EventOutcome::HANDLED)
                    }
                }
            }
            TouchEventKind::End | TouchEventKind::Cancel => {
                if self.pending.is_some_and(|(id, _)| id == event.id) {
                    self.pending = None;
                    tracing::debug!(
                        message = "sort.backend.abort",
                        backend = "touch",
                        reason = "released"
                    );
                }
                if self.active == Some(event.id) {
                    self.active = None;
                    delegate.drop_item(now)?;
                    return Ok(EventOutcome::CONSUMED);
                }
                Ok(EventOutcome::IGNORED)
            }
        }
    }

    fn tick(&mut self, now: Instant, delegate: &mut dyn SortDelegate) -> Result<()> {
        let due = self
            .pending
            .is_some_and(|(_, pending)| pending.delay_elapsed(now, delegate.press_delay()));
        if due
            && let Some((id, pending)) = self.pending.take()
            && pending.lift(BackendKind::Touch, now, delegate)?
        {
            self.active = Some(id);
        }
        Ok(())
    }

    fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn reset(&mut self) {
        self.pending = None;
        self.active = None;
    }
}
