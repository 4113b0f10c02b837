#![forbid(unsafe_code)]

//! The host boundary.
//!
//! The engine never touches a UI toolkit. A host adapter (DOM bindings, a
//! native toolkit, a test double) implements [`Host`]: it answers geometry
//! queries and applies the [`Effect`]s the engine emits.
//!
//! # Contract
//!
//! - All rects are viewport coordinates of the element's layout box, without
//!   any transform the engine applied through [`Effect::TranslateItem`].
//! - Effects are emitted in one batch after the engine has updated its own
//!   state, so a host never observes a half-applied move.
//! - A host tolerates effects naming elements it no longer renders; an item
//!   can be unregistered while its effects are in flight.

use reorder_core::easing::Transition;
use reorder_core::geometry::{Point, Rect, Sides, Size, Vec2};
use reorder_core::target::ElementId;

use crate::config::HelperContainer;

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Scroll state of the sort container.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    /// Current scroll offset (`scrollLeft`, `scrollTop`).
    pub offset: Vec2,
    /// Full scrollable content size.
    pub content: Size,
    /// Visible client size.
    pub viewport: Size,
}

impl ScrollMetrics {
    #[must_use]
    pub const fn new(offset: Vec2, content: Size, viewport: Size) -> Self {
        Self {
            offset,
            content,
            viewport,
        }
    }

    /// Largest reachable offset on each axis.
    #[must_use]
    pub fn max_offset(&self) -> Vec2 {
        Vec2::new(
            (self.content.width - self.viewport.width).max(0.0),
            (self.content.height - self.viewport.height).max(0.0),
        )
    }

    #[must_use]
    pub fn at_top(&self) -> bool {
        self.offset.y <= 0.0
    }

    #[must_use]
    pub fn at_bottom(&self) -> bool {
        self.offset.y >= self.max_offset().y
    }

    #[must_use]
    pub fn at_left(&self) -> bool {
        self.offset.x <= 0.0
    }

    #[must_use]
    pub fn at_right(&self) -> bool {
        self.offset.x >= self.max_offset().x
    }
}

/// Kind of a form field inside a lifted element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    File,
    Checkbox,
    Radio,
    Select,
    Textarea,
    Canvas,
    /// A `contenteditable` region.
    Editable,
}

/// Live state of one field inside the element being lifted.
///
/// A cloned proxy loses live state (typed values, canvas bitmaps), so the
/// host reports it here and receives [`CloneFixup`]s to restore it.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    /// The field in the source element.
    pub element: ElementId,
    pub kind: FieldKind,
    /// Current value, for value-bearing fields.
    pub value: Option<String>,
    /// Form `name`, for radio groups.
    pub name: Option<String>,
    /// Bitmap size, for canvases.
    pub size: Size,
}

impl FieldInfo {
    #[must_use]
    pub fn new(element: ElementId, kind: FieldKind) -> Self {
        Self {
            element,
            kind,
            value: None,
            name: None,
            size: Size::default(),
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub const fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }
}

/// A correction the host applies to the proxy clone of a field.
///
/// `field` names the field in the source element; the host maps it to the
/// corresponding node in its clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloneFixup {
    /// Copy the live value.
    CopyValue { field: ElementId, value: String },
    /// Rename a cloned radio so it does not join the source's group.
    RenameRadio { field: ElementId, name: String },
    /// Draw the source canvas bitmap onto the cloned canvas.
    CopyCanvas { field: ElementId },
}

// ---------------------------------------------------------------------------
// Effects
// ---------------------------------------------------------------------------

/// Visual change requested by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Clone `source` into a fixed-position proxy inside `container`.
    MountProxy {
        source: ElementId,
        container: HelperContainer,
        /// Viewport rect of the source at lift; the proxy keeps this size.
        rect: Rect,
        fixups: Vec<CloneFixup>,
        /// Move keyboard focus to the proxy.
        focus: bool,
    },
    /// Place the proxy's top-left corner at `position` (viewport).
    MoveProxy {
        position: Point,
        transition: Option<Transition>,
    },
    UnmountProxy,
    /// Displace a list item from its layout position.
    TranslateItem {
        element: ElementId,
        translate: Vec2,
        transition: Option<Transition>,
    },
    /// Clear any transform and transition on an item.
    ResetItem { element: ElementId },
    SetVisible { element: ElementId, visible: bool },
    Focus { element: ElementId },
}

/// Which node finished a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionTarget {
    Proxy,
    Item(ElementId),
}

/// Which property finished transitioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionProperty {
    Transform,
    Opacity,
    Other,
}

// ---------------------------------------------------------------------------
// Host
// ---------------------------------------------------------------------------

/// The UI toolkit side of a sorter.
pub trait Host {
    /// Layout rect of `element` in viewport coordinates.
    fn item_rect(&self, element: ElementId) -> Option<Rect>;

    /// Outer margins of `element`.
    fn item_margins(&self, _element: ElementId) -> Sides {
        Sides::default()
    }

    /// Content box of the sort container (padding and border removed).
    fn container_rect(&self) -> Rect;

    /// Grid gap of the container; zero when it is not a grid.
    fn container_gap(&self) -> Vec2 {
        Vec2::ZERO
    }

    fn scroll_metrics(&self) -> ScrollMetrics;

    /// Form fields inside `element` whose live state a clone would lose.
    fn proxy_fields(&self, _element: ElementId) -> Vec<FieldInfo> {
        Vec::new()
    }

    /// Scroll the container by `delta`, returning the delta actually applied
    /// after clamping to the scrollable range.
    fn scroll_by(&mut self, delta: Vec2) -> Vec2;

    fn apply(&mut self, effect: Effect);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_metrics_edges() {
        let metrics = ScrollMetrics::new(
            Vec2::new(0.0, 100.0),
            Size::new(200.0, 400.0),
            Size::new(200.0, 300.0),
        );
        assert_eq!(metrics.max_offset(), Vec2::new(0.0, 100.0));
        assert!(metrics.at_bottom());
        assert!(!metrics.at_top());
        assert!(metrics.at_left());
        assert!(metrics.at_right());
    }

    #[test]
    fn content_smaller_than_viewport_is_fully_scrolled() {
        let metrics = ScrollMetrics::new(Vec2::ZERO, Size::new(50.0, 50.0), Size::new(100.0, 100.0));
        assert_eq!(metrics.max_offset(), Vec2::ZERO);
        assert!(metrics.at_top() && metrics.at_bottom());
    }
}
