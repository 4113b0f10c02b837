#![forbid(unsafe_code)]

//! The drag proxy.
//!
//! A [`Draggable`] tracks where the floating stand-in for the lifted item
//! is. The host renders it fixed-positioned at `(0, 0)` and the engine moves
//! it by setting its top-left corner, so proxy positions are viewport
//! coordinates throughout.
//!
//! # Invariants
//!
//! 1. The proxy keeps the source's size for the whole session.
//! 2. The grab offset (pointer to proxy corner) is fixed at lift, so the
//!    proxy never jumps under the pointer.
//! 3. Travel bounds are the container's content box shrunk by the proxy
//!    size. On a single-axis list the other axis is pinned to the lift
//!    position. Bounds only clamp when edge-locking is on; snap motion
//!    always uses them for auto-scroll.

use reorder_core::geometry::{Axis, Point, Rect, Size, Vec2};
use reorder_core::target::ElementId;

use crate::host::{CloneFixup, FieldInfo, FieldKind};

/// Prefix given to cloned radio groups so they do not steal the source's
/// checked state.
pub const RADIO_CLONE_PREFIX: &str = "__sortableClone__";

/// Position, bounds, and spacing of the drag proxy.
#[derive(Debug, Clone, PartialEq)]
pub struct Draggable {
    source: ElementId,
    size: Size,
    initial: Point,
    grab_offset: Vec2,
    position: Point,
    min: Point,
    max: Point,
    margins: Vec2,
    axis: Axis,
    lock_axis: bool,
    lock_to_edges: bool,
}

impl Draggable {
    /// Start a proxy over `source_rect`, grabbed at `pointer`.
    ///
    /// `margins` is the per-slot spacing from [`Sides::item_spacing`].
    ///
    /// [`Sides::item_spacing`]: reorder_core::geometry::Sides::item_spacing
    #[must_use]
    pub fn new(
        source: ElementId,
        source_rect: Rect,
        pointer: Point,
        container: Rect,
        margins: Vec2,
        axis: Axis,
    ) -> Self {
        let initial = source_rect.origin();
        let size = source_rect.size();

        let mut min = container.origin();
        let mut max = Point::new(container.right() - size.width, container.bottom() - size.height);
        match axis {
            Axis::Y => {
                min.x = initial.x;
                max.x = initial.x;
            }
            Axis::X => {
                min.y = initial.y;
                max.y = initial.y;
            }
            Axis::XY => {}
        }

        Self {
            source,
            size,
            initial,
            grab_offset: initial - pointer,
            position: initial,
            min,
            max,
            margins,
            axis,
            lock_axis: false,
            lock_to_edges: false,
        }
    }

    /// Pin the proxy on the axes the list does not sort along.
    #[must_use]
    pub fn with_lock_axis(mut self, lock: bool) -> Self {
        self.lock_axis = lock;
        self
    }

    /// Clamp every move into the travel bounds.
    #[must_use]
    pub fn with_lock_to_edges(mut self, lock: bool) -> Self {
        self.lock_to_edges = lock;
        self
    }

    /// Follow an input position; returns the new proxy corner.
    pub fn follow(&mut self, pointer: Point) -> Point {
        let mut position = pointer + self.grab_offset;
        if self.lock_axis {
            if !self.axis.horizontal() {
                position.x = self.initial.x;
            }
            if !self.axis.vertical() {
                position.y = self.initial.y;
            }
        }
        if self.lock_to_edges {
            position = position.clamp(self.min, self.max);
        }
        self.position = position;
        position
    }

    /// Put the proxy corner exactly at `position`.
    pub fn place(&mut self, position: Point) {
        self.position = position;
    }

    /// Clamp into the travel bounds along the sorting axes and return how
    /// far the proxy was pulled back (the amount to scroll instead).
    pub fn clamp_to_bounds(&mut self) -> Vec2 {
        let clamped = self.position.clamp(self.min, self.max);
        let overflow = (self.position - clamped).along(self.axis);
        self.position = self.position - overflow;
        overflow
    }

    #[must_use]
    pub const fn source(&self) -> ElementId {
        self.source
    }

    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    #[must_use]
    pub const fn initial(&self) -> Point {
        self.initial
    }

    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    #[must_use]
    pub fn center(&self) -> Point {
        self.rect().center()
    }

    /// Travel bounds of the proxy corner.
    #[must_use]
    pub const fn bounds(&self) -> (Point, Point) {
        (self.min, self.max)
    }

    /// Distance one displaced item moves along each axis.
    #[must_use]
    pub fn slot_step(&self) -> Vec2 {
        Vec2::new(
            self.size.width + self.margins.x,
            self.size.height + self.margins.y,
        )
    }
}

/// Fix-ups that make a clone of the source look like the live source.
///
/// File inputs keep their (empty) cloned value; radios are renamed so the
/// clone does not uncheck the original; canvases are copied only when they
/// have a drawable area.
#[must_use]
pub fn clone_fixups(fields: &[FieldInfo]) -> Vec<CloneFixup> {
    let mut fixups = Vec::new();
    for field in fields {
        match field.kind {
            FieldKind::File | FieldKind::Editable => {}
            FieldKind::Canvas => {
                if field.size.width > 0.0 && field.size.height > 0.0 {
                    fixups.push(CloneFixup::CopyCanvas {
                        field: field.element,
                    });
                }
            }
            FieldKind::Text
            | FieldKind::Checkbox
            | FieldKind::Radio
            | FieldKind::Select
            | FieldKind::Textarea => {
                if let Some(value) = &field.value {
                    fixups.push(CloneFixup::CopyValue {
                        field: field.element,
                        value: value.clone(),
                    });
                }
                if field.kind == FieldKind::Radio
                    && let Some(name) = field.name.as_deref().filter(|n| !n.is_empty())
                {
                    fixups.push(CloneFixup::RenameRadio {
                        field: field.element,
                        name: format!("{RADIO_CLONE_PREFIX}{name}"),
                    });
                }
            }
        }
    }
    fixups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertical() -> Draggable {
        Draggable::new(
            ElementId(1),
            Rect::new(10.0, 40.0, 100.0, 40.0),
            Point::new(20.0, 50.0),
            Rect::new(10.0, 0.0, 100.0, 200.0),
            Vec2::ZERO,
            Axis::Y,
        )
    }

    #[test]
    fn follow_keeps_grab_offset() {
        let mut proxy = vertical();
        assert_eq!(proxy.follow(Point::new(25.0, 95.0)), Point::new(15.0, 85.0));
        assert_eq!(proxy.center(), Point::new(65.0, 105.0));
    }

    #[test]
    fn lock_axis_pins_cross_axis() {
        let mut proxy = vertical().with_lock_axis(true);
        assert_eq!(proxy.follow(Point::new(80.0, 95.0)), Point::new(10.0, 85.0));
    }

    #[test]
    fn edge_lock_clamps_into_container() {
        let mut proxy = vertical().with_lock_to_edges(true);
        assert_eq!(proxy.follow(Point::new(20.0, 400.0)).y, 160.0);
        assert_eq!(proxy.follow(Point::new(20.0, -50.0)).y, 0.0);
        assert_eq!(proxy.bounds(), (Point::new(10.0, 0.0), Point::new(10.0, 160.0)));
    }

    #[test]
    fn clamp_to_bounds_reports_overflow_on_sorting_axis() {
        let mut proxy = vertical();
        proxy.place(Point::new(10.0, 190.0));
        assert_eq!(proxy.clamp_to_bounds(), Vec2::new(0.0, 30.0));
        assert_eq!(proxy.position(), Point::new(10.0, 160.0));
        assert_eq!(proxy.clamp_to_bounds(), Vec2::ZERO);
    }

    #[test]
    fn slot_step_adds_margins() {
        let proxy = Draggable::new(
            ElementId(1),
            Rect::new(0.0, 0.0, 50.0, 20.0),
            Point::ZERO,
            Rect::new(0.0, 0.0, 500.0, 500.0),
            Vec2::new(8.0, 4.0),
            Axis::XY,
        );
        assert_eq!(proxy.slot_step(), Vec2::new(58.0, 24.0));
    }

    #[test]
    fn fixups_follow_field_kinds() {
        let fields = vec![
            FieldInfo::new(ElementId(10), FieldKind::Text).with_value("hello"),
            FieldInfo::new(ElementId(11), FieldKind::File).with_value("C:\\fakepath"),
            FieldInfo::new(ElementId(12), FieldKind::Radio)
                .with_value("a")
                .with_name("choice"),
            FieldInfo::new(ElementId(13), FieldKind::Canvas).with_size(Size::new(0.0, 10.0)),
            FieldInfo::new(ElementId(14), FieldKind::Canvas).with_size(Size::new(5.0, 10.0)),
        ];
        assert_eq!(
            clone_fixups(&fields),
            vec![
                CloneFixup::CopyValue {
                    field: ElementId(10),
                    value: "hello".into()
                },
                CloneFixup::CopyValue {
                    field: ElementId(12),
                    value: "a".into()
                },
                CloneFixup::RenameRadio {
                    field: ElementId(12),
                    name: "__sortableClone__choice".into()
                },
                CloneFixup::CopyCanvas {
                    field: ElementId(14)
                },
            ]
        );
    }
}
