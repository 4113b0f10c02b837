#![forbid(unsafe_code)]

//! Keyboard input.
//!
//! The lift key on a focused item starts a snap session. While it runs the
//! up/down keys step the item, the drop key (or the lift key again) drops,
//! and the cancel key steps it back. Scrolling the wheel or pressing a mouse
//! button ends a keyboard session in place. A lift key held with Ctrl, Alt,
//! or Super is left to the host as a shortcut.

use reorder_core::event::{InputEvent, KeyEventKind, PointerEventKind};
use web_time::Instant;

use super::{Backend, BackendKind, EventOutcome, SortDelegate};
use crate::config::KeyAction;
use crate::error::Result;

#[derive(Debug, Clone, Copy, Default)]
pub struct KeyboardBackend;

impl KeyboardBackend {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Backend for KeyboardBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Keyboard
    }

    fn handle(
        &mut self,
        event: &InputEvent,
        now: Instant,
        delegate: &mut dyn SortDelegate,
    ) -> Result<EventOutcome> {
        let sorting = delegate.sorting_backend();
        let key = match event {
            InputEvent::Key(key) => key,
            InputEvent::Wheel(_) => {
                if sorting == Some(BackendKind::Keyboard) {
                    delegate.drop_item(now)?;
                }
                return Ok(EventOutcome::IGNORED);
            }
            InputEvent::Pointer(pointer) => {
                if matches!(pointer.kind, PointerEventKind::Down(_))
                    && sorting == Some(BackendKind::Keyboard)
                {
                    delegate.drop_item(now)?;
                }
                return Ok(EventOutcome::IGNORED);
            }
            InputEvent::Touch(_) => return Ok(EventOutcome::IGNORED),
        };
        if key.kind == KeyEventKind::Release {
            return Ok(EventOutcome::IGNORED);
        }

        match sorting {
            None => {
                if key.kind != KeyEventKind::Press
                    || key.modifiers.is_shortcut()
                    || delegate.key_bindings().action(key.code, false) != Some(KeyAction::Lift)
                {
                    return Ok(EventOutcome::IGNORED);
                }
                let Some(item) = delegate.resolve_lift(&key.target, BackendKind::Keyboard) else {
                    return Ok(EventOutcome::IGNORED);
                };
                delegate.lift(item, None, BackendKind::Keyboard, now)?;
                Ok(EventOutcome::HANDLED)
            }
            Some(BackendKind::Keyboard) => {
                match delegate.key_bindings().action(key.code, true) {
                    // Auto-repeat of the lift key must not drop right away.
                    Some(KeyAction::Drop) if key.kind == KeyEventKind::Press => {
                        delegate.drop_item(now)?;
                    }
                    Some(KeyAction::Drop) => {}
                    Some(KeyAction::Cancel) => delegate.cancel(now)?,
                    Some(KeyAction::Up) => {
                        delegate.snap(-1, now)?;
                    }
                    Some(KeyAction::Down) => {
                        delegate.snap(1, now)?;
                    }
                    Some(KeyAction::Lift) | None => return Ok(EventOutcome::IGNORED),
                }
                Ok(EventOutcome::HANDLED)
            }
            Some(_) => {
                if delegate.key_bindings().action(key.code, true) == Some(KeyAction::Cancel) {
                    delegate.cancel(now)?;
                    return Ok(EventOutcome::HANDLED);
                }
                Ok(EventOutcome::IGNORED)
            }
        }
    }
}
