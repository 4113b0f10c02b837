#![forbid(unsafe_code)]

//! Mouse and pen input.

use reorder_core::event::{InputEvent, MouseButton, PointerEventKind};
use reorder_core::target::NodeKind;
use web_time::Instant;

use super::{Backend, BackendKind, EventOutcome, PendingPress, PressStep, SortDelegate, lifts_on_press};
use crate::error::Result;

/// Fluid sorting driven by the primary pointer button.
#[derive(Debug, Clone, Default)]
pub struct PointerBackend {
    pending: Option<PendingPress>,
}

impl PointerBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for PointerBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Pointer
    }

    fn handle(
        &mut self,
        event: &InputEvent,
        now: Instant,
        delegate: &mut dyn SortDelegate,
    ) -> Result<EventOutcome> {
        let InputEvent::Pointer(event) = event else {
            return Ok(EventOutcome::IGNORED);
        };
        let owns_session = delegate.sorting_backend() == Some(BackendKind::Pointer);

        match event.kind {
            PointerEventKind::Down(MouseButton::Left) => {
                if delegate.is_sorting() {
                    return Ok(EventOutcome::IGNORED);
                }
                let Some(item) = delegate.resolve_lift(&event.target, BackendKind::Pointer) else {
                    return Ok(EventOutcome::IGNORED);
                };
                // Links would navigate or start a native drag.
                let prevent_default = event
                    .target
                    .node()
                    .is_some_and(|node| node.kind == NodeKind::Anchor);

                if lifts_on_press(delegate.press_delay(), delegate.move_delay()) {
                    delegate.lift(item, Some(event.position), BackendKind::Pointer, now)?;
                } else {
                    self.pending = Some(PendingPress::new(item, event.position, now));
                    tracing::debug!(
                        message = "sort.backend.press",
                        backend = "pointer",
                        item = %item
                    );
                }
                Ok(EventOutcome {
                    consumed: true,
                    prevent_default,
                })
            }
            PointerEventKind::Down(_) => Ok(EventOutcome::IGNORED),
            PointerEventKind::Move => {
                if owns_session {
                    delegate.move_to(event.position, now)?;
                    return Ok(EventOutcome::CONSUMED);
                }
                let Some(pending) = self.pending.as_mut() else {
                    return Ok(EventOutcome::IGNORED);
                };
                match pending.on_move(event.position, delegate.press_delay(), delegate.move_delay()) {
                    PressStep::Wait => Ok(EventOutcome::CONSUMED),
                    PressStep::Abort => {
                        self.pending = None;
                        tracing::debug!(
                            message = "sort.backend.abort",
                            backend = "pointer",
                            reason = "moved"
                        );
                        Ok(EventOutcome::IGNORED)
                    }
                    PressStep::Lift => {
                        if let Some(pending) = self.pending.take() {
                            pending.lift(BackendKind::Pointer, now, delegate)?;
                        }
                        Ok(EventOutcome::CONSUMED)
                    }
                }
            }
            PointerEventKind::Up(_) => {
                let had_pending = self.pending.take().is_some();
                if owns_session {
                    delegate.drop_item(now)?;
                    return Ok(EventOutcome::CONSUMED);
                }
                if had_pending {
                    tracing::debug!(
                        message = "sort.backend.abort",
                        backend = "pointer",
                        reason = "released"
                    );
                }
                Ok(EventOutcome::IGNORED)
            }
        }
    }

    fn tick(&mut self, now: Instant, delegate: &mut dyn SortDelegate) -> Result<()> {
        let due = self
            .pending
            .is_some_and(|pending| pending.delay_elapsed(now, delegate.press_delay()));
        if due && let Some(pending) = self.pending.take() {
            pending.lift(BackendKind::Pointer, now, delegate)?;
        }
        Ok(())
    }

    fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn reset(&mut self) {
        self.pending = None;
    }
}
