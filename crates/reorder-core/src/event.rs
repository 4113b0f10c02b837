#![forbid(unsafe_code)]

//! Canonical input/event types.
//!
//! A host adapter translates its native events (DOM, winit, a test script)
//! into [`InputEvent`]s and feeds them to the sorter. Every backend sees every
//! event; each decides for itself what to react to.
//!
//! # Design Notes
//!
//! - Positions are viewport coordinates in CSS pixels.
//! - Pointer and touch events carry the [`EventTarget`] path of the node under
//!   the contact point. Move and release events may carry an empty target.
//! - `KeyEventKind` defaults to `Press` when the host cannot distinguish.
//! - `Modifiers` use bitflags for easy combination.

use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Vec2};
use crate::target::EventTarget;

/// Canonical input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Mouse or pen.
    Pointer(PointerEvent),

    /// A single touch point.
    Touch(TouchEvent),

    /// A keyboard event, targeted at the focused node.
    Key(KeyEvent),

    /// Wheel or trackpad scroll.
    Wheel(WheelEvent),
}

/// A mouse or pen event.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,

    /// Viewport position of the pointer.
    pub position: Point,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,

    /// Node path under the pointer.
    pub target: EventTarget,
}

impl PointerEvent {
    #[must_use]
    pub fn new(kind: PointerEventKind, position: Point) -> Self {
        Self {
            kind,
            position,
            modifiers: Modifiers::NONE,
            target: EventTarget::default(),
        }
    }

    #[must_use]
    pub fn with_target(mut self, target: EventTarget) -> Self {
        self.target = target;
        self
    }

    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// The type of pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// Button pressed.
    Down(MouseButton),

    /// Pointer moved, with or without a button held.
    Move,

    /// Button released.
    Up(MouseButton),
}

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button.
    Left,

    /// Secondary (context-menu) button.
    Right,

    /// Middle button (scroll wheel click).
    Middle,
}

/// Host-assigned identifier of one touch contact, stable for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TouchId(pub u64);

/// A touch event for a single contact point.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchEvent {
    pub kind: TouchEventKind,
    pub id: TouchId,
    pub position: Point,
    pub target: EventTarget,
}

impl TouchEvent {
    #[must_use]
    pub fn new(kind: TouchEventKind, id: TouchId, position: Point) -> Self {
        Self {
            kind,
            id,
            position,
            target: EventTarget::default(),
        }
    }

    #[must_use]
    pub fn with_target(mut self, target: EventTarget) -> Self {
        self.target = target;
        self
    }
}

/// The type of touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchEventKind {
    Start,
    Move,
    End,
    /// The platform interrupted the touch (e.g. a system gesture).
    Cancel,
}

/// A keyboard event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,

    /// The type of key event (press, repeat, or release).
    pub kind: KeyEventKind,

    /// Path of the focused node.
    pub target: EventTarget,
}

impl KeyEvent {
    /// Create a new key press with no modifiers and no target.
    #[must_use]
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
            target: EventTarget::default(),
        }
    }

    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: EventTarget) -> Self {
        self.target = target;
        self
    }
}

/// Key codes for keyboard events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum KeyCode {
    /// A regular character key.
    Char(char),
    Space,
    Enter,
    Escape,
    Tab,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
}

/// The type of key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Key was pressed (default when not distinguishable).
    #[default]
    Press,

    /// Key is being held (repeat event).
    Repeat,

    /// Key was released.
    Release,
}

bitflags! {
    /// Modifier keys that can be held during an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

impl Modifiers {
    /// Ctrl, Alt, or Super held: the press is meant as a shortcut.
    #[must_use]
    pub const fn is_shortcut(self) -> bool {
        self.intersects(Self::CTRL.union(Self::ALT).union(Self::SUPER))
    }
}

/// A wheel or trackpad scroll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEvent {
    pub delta: Vec2,
    pub position: Point,
}

impl WheelEvent {
    #[must_use]
    pub const fn new(delta: Vec2, position: Point) -> Self {
        Self { delta, position }
    }
}
